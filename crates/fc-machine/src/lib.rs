//! NES-class machine assembly.
//!
//! The CPU runs at one third of the PPU dot rate, so the scheduler executes
//! one CPU instruction at a time and advances the PPU by three dots per
//! consumed cycle. One NTSC frame is 341 × 262 / 3 ≈ 29,780 CPU cycles.

mod bus;
mod cartridge;
mod controller;
mod nes;

pub use bus::NesBus;
pub use cartridge::{Cartridge, CartridgeError};
pub use controller::{Controller, button};
pub use nes::{CPU_CYCLES_PER_FRAME, Nes};
