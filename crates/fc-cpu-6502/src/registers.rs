//! 6502 CPU registers.

use crate::flags::{I, Status, U};

/// 6502 register set: accumulator, two index registers, stack pointer,
/// program counter, and the status flags. The stack pointer indexes into
/// page one ($0100-$01FF) and wraps within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registers {
    /// Accumulator.
    pub a: u8,
    /// X index register.
    pub x: u8,
    /// Y index register.
    pub y: u8,
    /// Stack pointer (next free slot in page one).
    pub s: u8,
    /// Program counter.
    pub pc: u16,
    /// Processor status flags.
    pub p: Status,
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

impl Registers {
    /// Registers in power-on state: S at $FD, I set, PC awaiting the reset
    /// vector. A, X and Y are undefined on hardware; they start at 0 here.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            s: 0xFD,
            pc: 0,
            p: Status(U | I),
        }
    }

    /// Claim the next stack slot for a push: returns the address to write
    /// and moves S down, wrapping within page one.
    pub fn push(&mut self) -> u16 {
        let addr = 0x0100 | u16::from(self.s);
        self.s = self.s.wrapping_sub(1);
        addr
    }

    /// Release the top stack slot for a pop: moves S up, wrapping within
    /// page one, and returns the address to read.
    pub fn pop(&mut self) -> u16 {
        self.s = self.s.wrapping_add(1);
        0x0100 | u16::from(self.s)
    }
}
