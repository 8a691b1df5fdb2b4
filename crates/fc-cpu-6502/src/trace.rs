//! Execution trace side-channel.
//!
//! A trace event is a snapshot taken immediately before an instruction
//! executes. Capture uses only side-effect-free `peek` reads, so tracing
//! never perturbs emulation state or timing.

use std::fmt;

use fc_core::Bus;

use crate::Cpu;
use crate::opcodes;

/// Pre-execution snapshot of one instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceEvent {
    /// Address of the opcode byte.
    pub pc: u16,
    /// The opcode byte itself.
    pub opcode: u8,
    /// Assembly mnemonic, `"???"` for bytes that do not decode.
    pub mnemonic: &'static str,
    pub a: u8,
    pub x: u8,
    pub y: u8,
    /// Raw status byte.
    pub p: u8,
    pub s: u8,
    /// CPU cycles consumed before this instruction.
    pub cycles: u64,
}

impl TraceEvent {
    /// Snapshot the instruction the CPU is about to execute.
    #[must_use]
    pub fn capture(cpu: &Cpu, bus: &impl Bus) -> Self {
        let pc = cpu.regs.pc;
        let opcode = bus.peek(pc);
        let mnemonic = opcodes::lookup(opcode).map_or("???", |entry| entry.mnemonic.name());
        Self {
            pc,
            opcode,
            mnemonic,
            a: cpu.regs.a,
            x: cpu.regs.x,
            y: cpu.regs.y,
            p: cpu.regs.p.0,
            s: cpu.regs.s,
            cycles: cpu.cycles(),
        }
    }
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04X}  {:02X}  {:<4} A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} CYC:{}",
            self.pc, self.opcode, self.mnemonic, self.a, self.x, self.y, self.p, self.s, self.cycles
        )
    }
}

/// Consumer of trace events.
pub trait TraceSink {
    fn record(&mut self, event: TraceEvent);
}

/// Collect events in memory (tests, batch inspection).
impl TraceSink for Vec<TraceEvent> {
    fn record(&mut self, event: TraceEvent) {
        self.push(event);
    }
}
