//! Headless command-line runner.
//!
//! Loads an iNES image, runs it for a number of frames (or single
//! instructions), and optionally prints an execution trace. Useful for
//! CPU test ROMs and for eyeballing what a cartridge does without a
//! display attached.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use fc_cpu_6502::{TraceEvent, TraceSink};
use fc_machine::Nes;

#[derive(Parser, Debug)]
#[command(name = "fc-runner")]
#[command(about = "Headless NES runner", long_about = None)]
struct Args {
    /// Path to the iNES ROM file
    rom: PathBuf,

    /// Number of frames to run
    #[arg(short, long, default_value = "60")]
    frames: u64,

    /// Run this many instructions instead of whole frames
    #[arg(short, long)]
    steps: Option<u64>,

    /// Print one line per instruction executed
    #[arg(short, long)]
    trace: bool,

    /// Override the reset vector with a hex address (e.g. C000)
    #[arg(short, long)]
    entry: Option<String>,

    /// Dump CPU state after execution
    #[arg(short = 'c', long)]
    dump_cpu: bool,
}

/// Prints every trace event to stdout.
struct StdoutSink;

impl TraceSink for StdoutSink {
    fn record(&mut self, event: TraceEvent) {
        println!("{event}");
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let data = match fs::read(&args.rom) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Failed to read {}: {e}", args.rom.display());
            return ExitCode::FAILURE;
        }
    };

    let mut nes = match Nes::from_ines(&data) {
        Ok(nes) => nes,
        Err(e) => {
            eprintln!("Failed to load {}: {e}", args.rom.display());
            return ExitCode::FAILURE;
        }
    };

    if let Some(entry) = &args.entry {
        match u16::from_str_radix(entry.trim_start_matches('$'), 16) {
            Ok(pc) => nes.set_pc(pc),
            Err(_) => {
                eprintln!("Invalid entry address: {entry}");
                return ExitCode::FAILURE;
            }
        }
    }

    if args.trace {
        nes.set_trace_sink(Box::new(StdoutSink));
    }

    let result = if let Some(steps) = args.steps {
        run_steps(&mut nes, steps)
    } else {
        run_frames(&mut nes, args.frames)
    };

    if let Err(e) = result {
        eprintln!("Execution stopped: {e}");
        if args.dump_cpu {
            dump_cpu_state(&nes);
        }
        return ExitCode::FAILURE;
    }

    if args.dump_cpu {
        dump_cpu_state(&nes);
    }
    ExitCode::SUCCESS
}

fn run_frames(nes: &mut Nes, frames: u64) -> Result<(), fc_cpu_6502::CpuError> {
    log::info!("running {frames} frames");
    for _ in 0..frames {
        nes.run_frame()?;
    }
    println!("Completed {} frames.", nes.frame_count());
    Ok(())
}

fn run_steps(nes: &mut Nes, steps: u64) -> Result<(), fc_cpu_6502::CpuError> {
    log::info!("running {steps} instructions");
    let mut executed = 0u64;
    for _ in 0..steps {
        if nes.step()? == 0 {
            break;
        }
        executed += 1;
    }
    println!("Executed {executed} instructions.");
    Ok(())
}

fn dump_cpu_state(nes: &Nes) {
    let regs = &nes.cpu().regs;
    println!("\nCPU State:");
    println!("  A:  ${:02X}", regs.a);
    println!("  X:  ${:02X}", regs.x);
    println!("  Y:  ${:02X}", regs.y);
    println!("  PC: ${:04X}", regs.pc);
    println!("  SP: ${:02X}", regs.s);
    println!("  P:  ${:02X}", regs.p.0);
    println!("  Cycles: {}", nes.cpu().cycles());
}
