//! 6502 processor status register (P).

/// Carry - set on carry out / no borrow.
pub const C: u8 = 0x01;

/// Zero - set when a result is zero.
pub const Z: u8 = 0x02;

/// Interrupt disable - when set, IRQ is ignored (NMI is not).
pub const I: u8 = 0x04;

/// Decimal mode - stored and restored but otherwise ignored; the 2A03
/// variant of the 6502 has no BCD circuitry.
pub const D: u8 = 0x08;

/// Break - not a physical flag; appears only in pushed copies of P.
/// Set when BRK/PHP push the status, clear when IRQ/NMI push it.
pub const B: u8 = 0x10;

/// Unused bit - always reads as 1.
pub const U: u8 = 0x20;

/// Overflow - signed arithmetic overflowed.
pub const V: u8 = 0x40;

/// Negative - bit 7 of the last result.
pub const N: u8 = 0x80;

/// Processor status register.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Status(pub u8);

impl Status {
    /// Status with only the unused bit set.
    #[must_use]
    pub const fn new() -> Self {
        Self(U)
    }

    /// Status restored from a pushed copy: B is discarded, U forced to 1.
    #[must_use]
    pub const fn from_pushed(value: u8) -> Self {
        Self((value | U) & !B)
    }

    /// Value pushed by BRK and PHP (B and U both set).
    #[must_use]
    pub const fn to_pushed_brk(self) -> u8 {
        self.0 | U | B
    }

    /// Value pushed by IRQ and NMI entry (U set, B clear).
    #[must_use]
    pub const fn to_pushed_irq(self) -> u8 {
        (self.0 | U) & !B
    }

    #[must_use]
    pub const fn is_set(self, flag: u8) -> bool {
        self.0 & flag != 0
    }

    pub fn set(&mut self, flag: u8) {
        self.0 |= flag;
    }

    pub fn clear(&mut self, flag: u8) {
        self.0 &= !flag;
    }

    /// Set or clear a flag based on a condition.
    pub fn set_if(&mut self, flag: u8, condition: bool) {
        if condition {
            self.set(flag);
        } else {
            self.clear(flag);
        }
    }

    /// Update N and Z from a result value.
    pub fn update_nz(&mut self, value: u8) {
        self.set_if(N, value & 0x80 != 0);
        self.set_if(Z, value == 0);
    }
}
