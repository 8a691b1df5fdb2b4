//! Memory and I/O bus interface.

/// Memory and I/O bus interface.
///
/// Components access memory and peripherals through this trait. The bus
/// handles address decoding and routing to the appropriate device.
///
/// The provided methods resolve the 6502's indirect and indexed addressing
/// modes, including the hardware's zero-page wraparound and the `JMP (ind)`
/// page-boundary defect. Modes whose index arithmetic can cross a page
/// report the crossing so the CPU can charge the extra cycle.
pub trait Bus {
    /// Read a byte from the given address.
    fn read(&mut self, addr: u16) -> u8;

    /// Write a byte to the given address.
    fn write(&mut self, addr: u16, value: u8);

    /// Read a byte without side effects (for tracing and inspection).
    fn peek(&self, addr: u16) -> u8;

    /// Drain the NMI line. Returns true once per asserted edge.
    fn take_nmi(&mut self) -> bool {
        false
    }

    /// Level of the IRQ line.
    fn irq_asserted(&self) -> bool {
        false
    }

    /// Drain a pending DMA stall request.
    fn take_dma_stall(&mut self) -> bool {
        false
    }

    /// Read a little-endian word.
    fn read_word(&mut self, addr: u16) -> u16 {
        let lo = self.read(addr);
        let hi = self.read(addr.wrapping_add(1));
        u16::from(lo) | (u16::from(hi) << 8)
    }

    /// Resolve a zero-page indexed operand. The sum wraps within page zero:
    /// base $FF with index 2 yields $0001, never $0101.
    fn zero_page_indexed(&mut self, base: u8, index: u8) -> u16 {
        u16::from(base.wrapping_add(index))
    }

    /// Resolve an absolute indexed address, reporting whether the index add
    /// crossed a page boundary.
    fn absolute_indexed(&mut self, base: u16, index: u8) -> (u16, bool) {
        let addr = base.wrapping_add(u16::from(index));
        (addr, addr & 0xFF00 != base & 0xFF00)
    }

    /// Resolve `JMP (ind)`. The high byte is fetched without carrying into
    /// the pointer's high byte, so a pointer at $xxFF wraps within its page.
    fn indirect(&mut self, ptr: u16) -> u16 {
        let lo = self.read(ptr);
        let hi = self.read((ptr & 0xFF00) | (ptr.wrapping_add(1) & 0x00FF));
        u16::from(lo) | (u16::from(hi) << 8)
    }

    /// Resolve `(zp,X)`. Both the pointer add and the high-byte fetch wrap
    /// within page zero.
    fn indexed_indirect(&mut self, base: u8, x: u8) -> u16 {
        let ptr = base.wrapping_add(x);
        let lo = self.read(u16::from(ptr));
        let hi = self.read(u16::from(ptr.wrapping_add(1)));
        u16::from(lo) | (u16::from(hi) << 8)
    }

    /// Resolve `(zp),Y`, reporting whether adding Y crossed a page.
    fn indirect_indexed(&mut self, base: u8, y: u8) -> (u16, bool) {
        let lo = self.read(u16::from(base));
        let hi = self.read(u16::from(base.wrapping_add(1)));
        let ptr = u16::from(lo) | (u16::from(hi) << 8);
        let addr = ptr.wrapping_add(u16::from(y));
        (addr, addr & 0xFF00 != ptr & 0xFF00)
    }
}

/// Flat 64K RAM bus for testing.
///
/// No address decoding: every address is RAM. The NMI and IRQ lines can be
/// driven directly so interrupt sequencing is testable without a machine.
pub struct SimpleBus {
    ram: [u8; 0x10000],
    nmi_line: bool,
    irq_line: bool,
}

impl SimpleBus {
    #[must_use]
    pub fn new() -> Self {
        Self {
            ram: [0; 0x10000],
            nmi_line: false,
            irq_line: false,
        }
    }

    /// Copy bytes into RAM starting at the given address.
    pub fn load(&mut self, addr: u16, data: &[u8]) {
        for (offset, &byte) in data.iter().enumerate() {
            self.ram[addr.wrapping_add(offset as u16) as usize] = byte;
        }
    }

    /// Assert the NMI line; the next `take_nmi` drains it.
    pub fn set_nmi(&mut self) {
        self.nmi_line = true;
    }

    /// Set the IRQ line level.
    pub fn set_irq(&mut self, asserted: bool) {
        self.irq_line = asserted;
    }
}

impl Default for SimpleBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for SimpleBus {
    fn read(&mut self, addr: u16) -> u8 {
        self.ram[addr as usize]
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.ram[addr as usize] = value;
    }

    fn peek(&self, addr: u16) -> u8 {
        self.ram[addr as usize]
    }

    fn take_nmi(&mut self) -> bool {
        let pending = self.nmi_line;
        self.nmi_line = false;
        pending
    }

    fn irq_asserted(&self) -> bool {
        self.irq_line
    }
}
