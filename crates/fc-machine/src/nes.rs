//! Top-level system and scheduler.
//!
//! The CPU is the pacing component: each `step` runs one instruction and
//! then advances the PPU by three dots per consumed CPU cycle. The NMI the
//! PPU raises at VBlank is drained into the bus after the PPU catch-up, so
//! the CPU observes it at its next interrupt poll.

use fc_cpu_6502::{Cpu, CpuError, State, TraceEvent, TraceSink};

use crate::bus::NesBus;
use crate::cartridge::{Cartridge, CartridgeError};

/// CPU cycles per NTSC frame: 341 dots × 262 scanlines / 3.
pub const CPU_CYCLES_PER_FRAME: u64 = 29_780;

/// The assembled machine.
pub struct Nes {
    cpu: Cpu,
    bus: NesBus,
    frame_count: u64,
    trace: Option<Box<dyn TraceSink>>,
}

impl Nes {
    /// Build a machine around a parsed cartridge and run the reset
    /// sequence (PC from the reset vector).
    #[must_use]
    pub fn new(cartridge: Cartridge) -> Self {
        let mut bus = NesBus::new(cartridge);
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus);
        Self {
            cpu,
            bus,
            frame_count: 0,
            trace: None,
        }
    }

    /// Parse an iNES image and build the machine.
    pub fn from_ines(data: &[u8]) -> Result<Self, CartridgeError> {
        Ok(Self::new(Cartridge::parse(data)?))
    }

    /// Install a trace sink. Every subsequent `step` records a
    /// pre-execution snapshot of the instruction about to run.
    pub fn set_trace_sink(&mut self, sink: Box<dyn TraceSink>) {
        self.trace = Some(sink);
    }

    /// Remove and return the current trace sink.
    pub fn take_trace_sink(&mut self) -> Option<Box<dyn TraceSink>> {
        self.trace.take()
    }

    /// Override PC, for images without a meaningful reset vector.
    pub fn set_pc(&mut self, pc: u16) {
        self.cpu.regs.pc = pc;
    }

    /// Run one CPU instruction and bring the PPU up to date.
    ///
    /// Returns the CPU cycles consumed (0 once halted or errored).
    ///
    /// # Errors
    ///
    /// Propagates [`CpuError`]; the CPU is then in its terminal state and
    /// the machine stops advancing.
    pub fn step(&mut self) -> Result<u32, CpuError> {
        if let Some(sink) = self.trace.as_mut() {
            sink.record(TraceEvent::capture(&self.cpu, &self.bus));
        }

        let cycles = self.cpu.execute(&mut self.bus)?;
        self.bus.ppu.execute(cycles * 3);
        if self.bus.ppu.take_nmi() {
            self.bus.latch_nmi();
        }
        Ok(cycles)
    }

    /// Run until one frame's worth of CPU cycles has elapsed, stopping
    /// early if the CPU halts or errors. Returns the cycles consumed.
    pub fn run_frame(&mut self) -> Result<u64, CpuError> {
        let mut elapsed: u64 = 0;
        while elapsed < CPU_CYCLES_PER_FRAME {
            if self.cpu.state() != State::Running {
                break;
            }
            let cycles = self.step()?;
            if cycles == 0 {
                break;
            }
            elapsed += u64::from(cycles);
        }
        self.frame_count += 1;
        log::debug!("frame {}: {elapsed} CPU cycles", self.frame_count);
        Ok(elapsed)
    }

    /// Ask the CPU to stop at the next instruction boundary.
    pub fn request_halt(&mut self) {
        self.cpu.request_halt();
    }

    /// Framebuffer of NES colour indices, row-major 256×240.
    #[must_use]
    pub fn framebuffer(&self) -> &[u8] {
        self.bus.ppu.framebuffer()
    }

    /// Completed frame count.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    #[must_use]
    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    #[must_use]
    pub fn bus(&self) -> &NesBus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut NesBus {
        &mut self.bus
    }
}
