//! System bus: CPU address routing.
//!
//! The machine is fully memory-mapped: 2K internal RAM mirrored through
//! $1FFF, PPU registers every 8 bytes through $3FFF, the I/O range at
//! $4000-$401F, and cartridge PRG from $8000 up. The APU range is
//! unimplemented and reads as 0.

use fc_core::Bus;
use fc_ppu_2c02::Ppu;

use crate::cartridge::Cartridge;
use crate::controller::Controller;

const RAM_SIZE: usize = 2048;

/// The system bus seen by the CPU.
pub struct NesBus {
    /// 2K internal RAM ($0000-$07FF, mirrored to $1FFF).
    pub ram: [u8; RAM_SIZE],
    pub ppu: Ppu,
    pub controller1: Controller,
    pub controller2: Controller,
    cartridge: Cartridge,
    nmi_latch: bool,
    irq_line: bool,
    dma_stall: bool,
}

impl NesBus {
    #[must_use]
    pub fn new(mut cartridge: Cartridge) -> Self {
        let mut ppu = Ppu::new(cartridge.mirroring);
        ppu.load_chr(std::mem::take(&mut cartridge.chr), cartridge.chr_writable);
        Self {
            ram: [0; RAM_SIZE],
            ppu,
            controller1: Controller::new(),
            controller2: Controller::new(),
            cartridge,
            nmi_latch: false,
            irq_line: false,
            dma_stall: false,
        }
    }

    /// Latch an NMI edge for the CPU's next interrupt poll.
    pub fn latch_nmi(&mut self) {
        self.nmi_latch = true;
    }

    /// Drive the IRQ line level.
    pub fn set_irq(&mut self, asserted: bool) {
        self.irq_line = asserted;
    }

    /// $4014 write: copy a full CPU page into OAM and flag the stall.
    fn oam_dma(&mut self, page: u8) {
        let base = u16::from(page) << 8;
        let start = self.ppu.oam_addr();
        for i in 0..=255u8 {
            let value = self.read(base + u16::from(i));
            self.ppu.write_oam(start.wrapping_add(i), value);
        }
        self.dma_stall = true;
    }
}

impl Bus for NesBus {
    fn read(&mut self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x1FFF => self.ram[usize::from(addr) & 0x07FF],
            0x2000..=0x3FFF => self.ppu.read_register(addr & 0x0007),
            0x4016 => self.controller1.read(),
            0x4017 => self.controller2.read(),
            0x4000..=0x401F => 0, // APU and test-mode registers
            0x4020..=0x7FFF => 0, // open cartridge expansion space
            0x8000..=0xFFFF => self.cartridge.prg_read(addr),
        }
    }

    fn write(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x1FFF => self.ram[usize::from(addr) & 0x07FF] = value,
            0x2000..=0x3FFF => self.ppu.write_register(addr & 0x0007, value),
            0x4014 => self.oam_dma(value),
            0x4016 => {
                self.controller1.write(value);
                self.controller2.write(value);
            }
            0x4000..=0x401F => {} // APU range, unimplemented
            0x4020..=0xFFFF => {} // PRG ROM
        }
    }

    /// Side-effect-free read for tracing. PPU registers peek as 0 rather
    /// than perturbing latches.
    fn peek(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x1FFF => self.ram[usize::from(addr) & 0x07FF],
            0x8000..=0xFFFF => self.cartridge.prg_read(addr),
            _ => 0,
        }
    }

    fn take_nmi(&mut self) -> bool {
        let pending = self.nmi_latch;
        self.nmi_latch = false;
        pending
    }

    fn irq_asserted(&self) -> bool {
        self.irq_line
    }

    fn take_dma_stall(&mut self) -> bool {
        let pending = self.dma_stall;
        self.dma_stall = false;
        pending
    }
}
