//! Core traits shared by the fc emulator crates.
//!
//! The CPU sees the machine exclusively through the [`Bus`] trait: plain
//! byte reads and writes, plus the interrupt and DMA lines the system bus
//! drives. Effective-address arithmetic lives here too, so the quirks of
//! 6502 addressing (zero-page wraparound, the `JMP (ind)` page defect) are
//! stated once and shared between the core and its tests.

mod bus;

pub use bus::{Bus, SimpleBus};
