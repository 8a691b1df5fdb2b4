//! Dot-stepped 2C02 picture processor.
//!
//! The frame walk is 341 dots per scanline across 262 scanlines, counted
//! from the pre-render line (−1) through 260. Rendering is simplified to
//! per-tile fetches and per-scanline sprite slots, but the externally
//! visible timing — VBlank at 241/1, clear at −1/1, sprite evaluation at
//! dot 256 — follows the hardware.

mod ppu;

pub use ppu::{FB_HEIGHT, FB_WIDTH, Ppu};

/// Nametable mirroring mode.
///
/// Writes fan out to the paired table so both addresses observe the same
/// byte: vertical pairs NT0↔NT1 and NT2↔NT3, horizontal pairs NT0↔NT2
/// and NT1↔NT3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mirroring {
    Vertical,
    Horizontal,
}
