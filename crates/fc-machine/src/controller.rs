//! Standard controller serial port.
//!
//! The pad is a shift register behind $4016/$4017. Strobe high keeps the
//! register reloading from the live button state; dropping strobe latches
//! it, and each read then shifts one bit out (A, B, Select, Start, Up,
//! Down, Left, Right). Reads past the eighth bit return 1.

/// Button bit positions.
pub mod button {
    pub const A: u8 = 0;
    pub const B: u8 = 1;
    pub const SELECT: u8 = 2;
    pub const START: u8 = 3;
    pub const UP: u8 = 4;
    pub const DOWN: u8 = 5;
    pub const LEFT: u8 = 6;
    pub const RIGHT: u8 = 7;
}

/// One controller port.
pub struct Controller {
    buttons: u8,
    shift_register: u8,
    strobe: bool,
}

impl Controller {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buttons: 0,
            shift_register: 0,
            strobe: false,
        }
    }

    /// Press or release a button.
    pub fn set_button(&mut self, bit: u8, pressed: bool) {
        if pressed {
            self.buttons |= 1 << bit;
        } else {
            self.buttons &= !(1 << bit);
        }
        if self.strobe {
            self.shift_register = self.buttons;
        }
    }

    /// Serial read: one bit out, ones after the register empties.
    pub fn read(&mut self) -> u8 {
        if self.strobe {
            return self.buttons & 1;
        }
        let bit = self.shift_register & 1;
        self.shift_register = (self.shift_register >> 1) | 0x80;
        bit
    }

    /// Strobe write: the falling edge latches the button state.
    pub fn write(&mut self, value: u8) {
        let strobe = value & 1 != 0;
        if self.strobe && !strobe {
            self.shift_register = self.buttons;
        }
        self.strobe = strobe;
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}
