//! Instruction-stepped 6502 CPU core.
//!
//! The engine runs one instruction per `execute` call and reports the
//! cycles consumed, so a scheduler can advance other components in
//! lock-step. All 151 official opcodes and the stable illegal ones are
//! implemented; the unstable illegal group and the JAM bytes surface as
//! errors that halt execution.

pub mod flags;
pub mod opcodes;

mod cpu;
mod registers;
mod trace;

pub use cpu::{Cpu, CpuError, DMA_STALL_CYCLES, IRQ_VECTOR, NMI_VECTOR, RESET_VECTOR, State};
pub use flags::Status;
pub use registers::Registers;
pub use trace::{TraceEvent, TraceSink};
