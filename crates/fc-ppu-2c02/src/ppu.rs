//! 2C02 PPU core.
//!
//! One `tick` is one dot. Scanlines −1 (pre-render) through 239 are the
//! rendering region, 240 is idle, 241 opens VBlank at dot 1, and the frame
//! wraps after scanline 260. Background pixels come from a per-tile fetch
//! cache refreshed every 8 pixels; sprites come from 8 slots refilled in
//! place at dot 256 with the pattern rows for the next scanline.

use crate::Mirroring;

/// Framebuffer width in pixels.
pub const FB_WIDTH: usize = 256;
/// Framebuffer height in pixels.
pub const FB_HEIGHT: usize = 240;

const DOTS_PER_LINE: u16 = 341;
const PRE_RENDER_LINE: i16 = -1;
const LAST_LINE: i16 = 260;
const VBLANK_LINE: i16 = 241;

// CTRL ($2000) bits.
const CTRL_NMI: u8 = 0x80;
const CTRL_SPRITE_16: u8 = 0x20;
const CTRL_BG_TABLE: u8 = 0x10;
const CTRL_SPRITE_TABLE: u8 = 0x08;
const CTRL_INCREMENT_32: u8 = 0x04;
const CTRL_NAMETABLE: u8 = 0x03;

// MASK ($2001) bits.
const MASK_SHOW_BG: u8 = 0x08;
const MASK_SHOW_SPRITES: u8 = 0x10;

// STATUS ($2002) bits.
const STATUS_VBLANK: u8 = 0x80;
const STATUS_SPRITE0_HIT: u8 = 0x40;
const STATUS_OVERFLOW: u8 = 0x20;

/// Reverse the bit order of a byte (horizontal sprite flip).
#[must_use]
pub const fn flip_byte(value: u8) -> u8 {
    value.reverse_bits()
}

/// One of the 8 per-scanline sprite slots. Slots are reset in place at
/// every evaluation; `active` marks the filled ones.
#[derive(Debug, Clone, Copy, Default)]
struct SpriteSlot {
    active: bool,
    x: u8,
    pattern_lo: u8,
    pattern_hi: u8,
    /// Colours 1-3 of the sprite's palette, resolved at evaluation.
    palette: [u8; 3],
    is_sprite_zero: bool,
}

/// 2C02 picture processor.
pub struct Ppu {
    chr: Vec<u8>,
    chr_writable: bool,
    /// Four logical nametables; mirroring is applied on write.
    nametables: [u8; 0x1000],
    palette: [u8; 32],
    oam: [u8; 256],
    mirroring: Mirroring,

    ctrl: u8,
    mask: u8,
    status: u8,
    oam_addr: u8,
    scroll_x: u8,
    scroll_y: u8,
    /// Shared $2005/$2006 write phase: false = first write.
    write_toggle: bool,
    vram_addr: u16,
    /// Base nametable (0-3), latched from CTRL at pre-render dot 1.
    base_nametable: u8,

    scanline: i16,
    dot: u16,
    frame: u64,

    // Background tile cache, refreshed every 8 pixels.
    tile_lo: u8,
    tile_hi: u8,
    tile_palette: [u8; 3],

    slots: [SpriteSlot; 8],
    nmi_pending: bool,
    framebuffer: Vec<u8>,
}

impl Ppu {
    #[must_use]
    pub fn new(mirroring: Mirroring) -> Self {
        Self {
            chr: Vec::new(),
            chr_writable: false,
            nametables: [0; 0x1000],
            palette: [0; 32],
            oam: [0; 256],
            mirroring,
            ctrl: 0,
            mask: 0,
            status: 0,
            oam_addr: 0,
            scroll_x: 0,
            scroll_y: 0,
            write_toggle: false,
            vram_addr: 0,
            base_nametable: 0,
            scanline: PRE_RENDER_LINE,
            dot: 0,
            frame: 0,
            tile_lo: 0,
            tile_hi: 0,
            tile_palette: [0; 3],
            slots: [SpriteSlot::default(); 8],
            nmi_pending: false,
            framebuffer: vec![0; FB_WIDTH * FB_HEIGHT],
        }
    }

    /// Install pattern memory. `writable` marks CHR RAM.
    pub fn load_chr(&mut self, data: Vec<u8>, writable: bool) {
        self.chr = data;
        self.chr_writable = writable;
    }

    /// Current scanline, −1 (pre-render) through 260.
    #[must_use]
    pub fn scanline(&self) -> i16 {
        self.scanline
    }

    /// Current dot within the scanline, 0-340.
    #[must_use]
    pub fn dot(&self) -> u16 {
        self.dot
    }

    /// Completed frame count.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Framebuffer of NES colour indices, row-major 256×240.
    #[must_use]
    pub fn framebuffer(&self) -> &[u8] {
        &self.framebuffer
    }

    /// Drain the NMI latch. Returns true once per VBlank assertion.
    pub fn take_nmi(&mut self) -> bool {
        let pending = self.nmi_pending;
        self.nmi_pending = false;
        pending
    }

    #[must_use]
    pub fn oam_addr(&self) -> u8 {
        self.oam_addr
    }

    /// Direct OAM write, used by the DMA path.
    pub fn write_oam(&mut self, addr: u8, value: u8) {
        self.oam[usize::from(addr)] = value;
    }

    /// Advance the pipeline by the given number of dots.
    pub fn execute(&mut self, dots: u32) {
        for _ in 0..dots {
            self.tick();
        }
    }

    fn tick(&mut self) {
        match (self.scanline, self.dot) {
            (PRE_RENDER_LINE, 1) => {
                self.status &= !(STATUS_VBLANK | STATUS_SPRITE0_HIT | STATUS_OVERFLOW);
                self.base_nametable = self.ctrl & CTRL_NAMETABLE;
            }
            (VBLANK_LINE, 1) => {
                self.status |= STATUS_VBLANK;
                if self.ctrl & CTRL_NMI != 0 {
                    self.nmi_pending = true;
                }
            }
            _ => {}
        }

        if (0..=239).contains(&self.scanline) {
            if (1..=256).contains(&self.dot) {
                self.render_dot();
            }
            // Fill the slots for the scanline below this one.
            if self.dot == 256 {
                self.evaluate_sprites(self.scanline + 1);
            }
        }

        self.dot += 1;
        if self.dot == DOTS_PER_LINE {
            self.dot = 0;
            self.scanline += 1;
            if self.scanline > LAST_LINE {
                self.scanline = PRE_RENDER_LINE;
                self.frame += 1;
            }
        }
    }

    /// Render the pixel for the current dot (dots 1-256 map to x 0-255).
    fn render_dot(&mut self) {
        let x = usize::from(self.dot - 1);
        let y = self.scanline as usize;

        // Scroll-adjusted position in the 2×2 nametable plane.
        let base_x = usize::from(self.base_nametable & 1) * 256;
        let base_y = usize::from(self.base_nametable >> 1) * 240;
        let world_x = (x + usize::from(self.scroll_x) + base_x) % 512;
        let world_y = (y + usize::from(self.scroll_y) + base_y) % 480;

        if world_x % 8 == 0 || self.dot == 1 {
            self.fetch_tile(world_x, world_y);
        }

        let show_bg = self.mask & MASK_SHOW_BG != 0;
        let bit = 7 - (world_x % 8);
        let bg_index = if show_bg {
            ((self.tile_lo >> bit) & 1) | (((self.tile_hi >> bit) & 1) << 1)
        } else {
            0
        };

        let mut colour = if bg_index == 0 {
            self.palette[0]
        } else {
            self.tile_palette[usize::from(bg_index) - 1]
        };

        if self.mask & MASK_SHOW_SPRITES != 0 {
            for slot in self.slots {
                if !slot.active {
                    continue;
                }
                let sx = usize::from(slot.x);
                if x < sx || x >= sx + 8 {
                    continue;
                }
                let bit = 7 - (x - sx);
                let index =
                    ((slot.pattern_lo >> bit) & 1) | (((slot.pattern_hi >> bit) & 1) << 1);
                if index == 0 {
                    continue;
                }
                if slot.is_sprite_zero && bg_index != 0 {
                    self.status |= STATUS_SPRITE0_HIT;
                }
                // Opaque sprite pixels win over the background.
                colour = slot.palette[usize::from(index) - 1];
                break;
            }
        }

        self.framebuffer[y * FB_WIDTH + x] = colour;
    }

    /// Refresh the background tile cache for the tile containing
    /// (`world_x`, `world_y`).
    fn fetch_tile(&mut self, world_x: usize, world_y: usize) {
        let table = (world_y / 240) * 2 + world_x / 256;
        let tx = (world_x % 256) / 8;
        let ty = (world_y % 240) / 8;
        let fine_y = world_y % 8;
        let nt_base = table * 0x400;

        let tile = self.nametables[nt_base + ty * 32 + tx];
        let attr = self.nametables[nt_base + 0x3C0 + (ty / 4) * 8 + tx / 4];
        // 2-bit palette group for this tile's quadrant of the 4×4 block.
        let shift = (((ty / 2) % 2) * 2 + (tx / 2) % 2) * 2;
        let group = (attr >> shift) & 0x03;

        let bank = if self.ctrl & CTRL_BG_TABLE != 0 { 0x1000 } else { 0 };
        let pattern = bank + usize::from(tile) * 16 + fine_y;
        self.tile_lo = self.chr_byte(pattern);
        self.tile_hi = self.chr_byte(pattern + 8);
        self.tile_palette = self.palette_colours(group);
    }

    /// Refill the sprite slots with the sprites covering `line`.
    fn evaluate_sprites(&mut self, line: i16) {
        for slot in &mut self.slots {
            slot.active = false;
        }
        if !(0..=239).contains(&line) {
            return;
        }

        let height: i16 = if self.ctrl & CTRL_SPRITE_16 != 0 { 16 } else { 8 };
        let mut count = 0;
        for n in 0..64 {
            let entry = n * 4;
            let y = i16::from(self.oam[entry]);
            if line < y || line >= y + height {
                continue;
            }
            if count == 8 {
                self.status |= STATUS_OVERFLOW;
                break;
            }

            let tile = self.oam[entry + 1];
            let attr = self.oam[entry + 2];
            let mut row = (line - y) as usize;
            if attr & 0x80 != 0 {
                row = (height as usize - 1) - row; // vertical flip
            }

            let pattern = if height == 16 {
                // 8×16: bank from tile bit 0, bottom half is the next tile.
                let bank = usize::from(tile & 1) * 0x1000;
                bank + (usize::from(tile & 0xFE) + row / 8) * 16 + row % 8
            } else {
                let bank = if self.ctrl & CTRL_SPRITE_TABLE != 0 { 0x1000 } else { 0 };
                bank + usize::from(tile) * 16 + row
            };
            let mut lo = self.chr_byte(pattern);
            let mut hi = self.chr_byte(pattern + 8);
            if attr & 0x40 != 0 {
                lo = flip_byte(lo);
                hi = flip_byte(hi);
            }

            self.slots[count] = SpriteSlot {
                active: true,
                x: self.oam[entry + 3],
                pattern_lo: lo,
                pattern_hi: hi,
                palette: self.palette_colours(4 + (attr & 0x03)),
                is_sprite_zero: n == 0,
            };
            count += 1;
        }
    }

    /// Colours 1-3 of a palette group (0-3 background, 4-7 sprite).
    fn palette_colours(&self, group: u8) -> [u8; 3] {
        let base = 1 + usize::from(group) * 4;
        [
            self.palette[base],
            self.palette[base + 1],
            self.palette[base + 2],
        ]
    }

    fn chr_byte(&self, addr: usize) -> u8 {
        self.chr.get(addr).copied().unwrap_or(0)
    }

    /// CPU read of a PPU register (0-7, pre-masked by the bus).
    pub fn read_register(&mut self, reg: u16) -> u8 {
        match reg & 7 {
            2 => {
                let value = self.status;
                self.status &= !STATUS_VBLANK;
                self.write_toggle = false;
                value
            }
            4 => self.oam[usize::from(self.oam_addr)],
            7 => {
                let value = self.vram_read(self.vram_addr & 0x3FFF);
                self.advance_vram_addr();
                value
            }
            _ => 0,
        }
    }

    /// CPU write to a PPU register (0-7, pre-masked by the bus).
    pub fn write_register(&mut self, reg: u16, value: u8) {
        match reg & 7 {
            0 => self.ctrl = value,
            1 => self.mask = value,
            3 => self.oam_addr = value,
            4 => {
                self.oam[usize::from(self.oam_addr)] = value;
                self.oam_addr = self.oam_addr.wrapping_add(1);
            }
            5 => {
                if self.write_toggle {
                    self.scroll_y = value;
                } else {
                    self.scroll_x = value;
                }
                self.write_toggle = !self.write_toggle;
            }
            6 => {
                if self.write_toggle {
                    self.vram_addr = (self.vram_addr & 0xFF00) | u16::from(value);
                } else {
                    // First write is the high byte, masked to 14 bits.
                    self.vram_addr =
                        (self.vram_addr & 0x00FF) | (u16::from(value & 0x3F) << 8);
                }
                self.write_toggle = !self.write_toggle;
            }
            7 => {
                self.vram_write(self.vram_addr & 0x3FFF, value);
                self.advance_vram_addr();
            }
            _ => {} // $2002 is read-only
        }
    }

    fn advance_vram_addr(&mut self) {
        let step = if self.ctrl & CTRL_INCREMENT_32 != 0 { 32 } else { 1 };
        self.vram_addr = self.vram_addr.wrapping_add(step) & 0x3FFF;
    }

    fn vram_read(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x1FFF => self.chr_byte(usize::from(addr)),
            0x2000..=0x3EFF => self.nametables[usize::from(addr - 0x2000) & 0x0FFF],
            _ => self.palette[usize::from(addr & 0x1F)],
        }
    }

    fn vram_write(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x1FFF => {
                if self.chr_writable {
                    if let Some(byte) = self.chr.get_mut(usize::from(addr)) {
                        *byte = value;
                    }
                }
            }
            0x2000..=0x3EFF => self.nametable_write(usize::from(addr - 0x2000) & 0x0FFF, value),
            _ => self.palette_write(addr, value),
        }
    }

    /// Fan-out nametable write: the byte lands in the addressed table and
    /// its mirroring partner, so reads need no mapping.
    fn nametable_write(&mut self, offset: usize, value: u8) {
        self.nametables[offset] = value;
        let table = offset >> 10;
        let partner = match self.mirroring {
            Mirroring::Vertical => table ^ 1,
            Mirroring::Horizontal => table ^ 2,
        };
        self.nametables[(partner << 10) | (offset & 0x3FF)] = value;
    }

    /// Fan-out palette write: entry 0 of each group is shared between the
    /// background and sprite halves.
    fn palette_write(&mut self, addr: u16, value: u8) {
        let index = usize::from(addr & 0x1F);
        self.palette[index] = value;
        if index & 0x03 == 0 {
            self.palette[index ^ 0x10] = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_ppu() -> Ppu {
        let mut ppu = Ppu::new(Mirroring::Vertical);
        ppu.load_chr(vec![0; 8192], true);
        ppu
    }

    /// Step until the PPU sits at the given position.
    fn step_to(ppu: &mut Ppu, scanline: i16, dot: u16) {
        for _ in 0..341 * 262 * 2 {
            if ppu.scanline() == scanline && ppu.dot() == dot {
                return;
            }
            ppu.execute(1);
        }
        panic!("never reached scanline {scanline} dot {dot}");
    }

    /// Write a 14-bit VRAM address through $2006.
    fn set_addr(ppu: &mut Ppu, addr: u16) {
        ppu.write_register(6, (addr >> 8) as u8);
        ppu.write_register(6, addr as u8);
    }

    #[test]
    fn frame_geometry() {
        let mut ppu = make_ppu();
        assert_eq!(ppu.scanline(), -1);
        assert_eq!(ppu.dot(), 0);

        ppu.execute(341 * 262);
        assert_eq!(ppu.scanline(), -1, "one frame returns to the pre-render line");
        assert_eq!(ppu.dot(), 0);
        assert_eq!(ppu.frame(), 1, "exactly one frame elapsed");
    }

    #[test]
    fn vblank_window() {
        let mut ppu = make_ppu();

        step_to(&mut ppu, 241, 1);
        ppu.execute(1);
        assert_ne!(ppu.status & STATUS_VBLANK, 0, "VBlank sets at 241/1");

        step_to(&mut ppu, 260, 340);
        assert_ne!(ppu.status & STATUS_VBLANK, 0, "still set at end of frame");

        step_to(&mut ppu, -1, 1);
        ppu.execute(1);
        assert_eq!(ppu.status & STATUS_VBLANK, 0, "cleared at pre-render dot 1");
    }

    #[test]
    fn status_read_clears_vblank_and_latch() {
        let mut ppu = make_ppu();
        step_to(&mut ppu, 241, 2);

        let first = ppu.read_register(2);
        assert_ne!(first & STATUS_VBLANK, 0);
        let second = ppu.read_register(2);
        assert_eq!(second & STATUS_VBLANK, 0, "read clears the flag");
    }

    #[test]
    fn nmi_latched_only_when_enabled() {
        let mut ppu = make_ppu();
        step_to(&mut ppu, 241, 2);
        assert!(!ppu.take_nmi(), "CTRL bit 7 clear: no NMI");

        let mut ppu = make_ppu();
        ppu.write_register(0, CTRL_NMI);
        step_to(&mut ppu, 241, 2);
        assert!(ppu.take_nmi());
        assert!(!ppu.take_nmi(), "latch drains");
    }

    #[test]
    fn palette_fan_out() {
        let mut ppu = make_ppu();

        set_addr(&mut ppu, 0x3F10);
        ppu.write_register(7, 0x2A);
        set_addr(&mut ppu, 0x3F00);
        assert_eq!(ppu.read_register(7), 0x2A, "$3F10 mirrors to $3F00");

        set_addr(&mut ppu, 0x3F04);
        ppu.write_register(7, 0x15);
        set_addr(&mut ppu, 0x3F14);
        assert_eq!(ppu.read_register(7), 0x15, "$3F04 mirrors to $3F14");

        // Non-zero entries do not mirror.
        set_addr(&mut ppu, 0x3F01);
        ppu.write_register(7, 0x07);
        set_addr(&mut ppu, 0x3F11);
        assert_ne!(ppu.read_register(7), 0x07);
    }

    #[test]
    fn nametable_fan_out_vertical() {
        let mut ppu = Ppu::new(Mirroring::Vertical);
        set_addr(&mut ppu, 0x2000);
        ppu.write_register(7, 0x42);
        set_addr(&mut ppu, 0x2400);
        assert_eq!(ppu.read_register(7), 0x42, "NT0 pairs with NT1");

        set_addr(&mut ppu, 0x2800);
        ppu.write_register(7, 0x43);
        set_addr(&mut ppu, 0x2C00);
        assert_eq!(ppu.read_register(7), 0x43, "NT2 pairs with NT3");
    }

    #[test]
    fn nametable_fan_out_horizontal() {
        let mut ppu = Ppu::new(Mirroring::Horizontal);
        set_addr(&mut ppu, 0x2000);
        ppu.write_register(7, 0x42);
        set_addr(&mut ppu, 0x2800);
        assert_eq!(ppu.read_register(7), 0x42, "NT0 pairs with NT2");

        set_addr(&mut ppu, 0x2400);
        ppu.write_register(7, 0x43);
        set_addr(&mut ppu, 0x2C00);
        assert_eq!(ppu.read_register(7), 0x43, "NT1 pairs with NT3");
    }

    #[test]
    fn data_auto_increment() {
        let mut ppu = make_ppu();
        set_addr(&mut ppu, 0x2000);
        ppu.write_register(7, 0x11);
        ppu.write_register(7, 0x22);
        set_addr(&mut ppu, 0x2000);
        assert_eq!(ppu.read_register(7), 0x11);
        assert_eq!(ppu.read_register(7), 0x22);

        // CTRL bit 2 switches the stride to 32.
        ppu.write_register(0, CTRL_INCREMENT_32);
        set_addr(&mut ppu, 0x2000);
        ppu.write_register(7, 0x33);
        ppu.write_register(7, 0x44);
        set_addr(&mut ppu, 0x2020);
        assert_eq!(ppu.read_register(7), 0x44);
    }

    #[test]
    fn status_read_resets_addr_latch() {
        let mut ppu = make_ppu();
        ppu.write_register(6, 0x21); // first (high) write
        ppu.read_register(2); // resets the latch
        set_addr(&mut ppu, 0x2000);
        ppu.write_register(7, 0x55);
        set_addr(&mut ppu, 0x2000);
        assert_eq!(ppu.read_register(7), 0x55, "address formed from a clean latch");
    }

    #[test]
    fn oam_data_increments_addr() {
        let mut ppu = make_ppu();
        ppu.write_register(3, 0x10);
        ppu.write_register(4, 0xAA);
        ppu.write_register(4, 0xBB);
        ppu.write_register(3, 0x10);
        assert_eq!(ppu.read_register(4), 0xAA);
        assert_eq!(ppu.oam_addr(), 0x10, "OAMDATA reads do not increment");
    }

    #[test]
    fn flip_byte_works() {
        assert_eq!(flip_byte(0b1000_0000), 0b0000_0001);
        assert_eq!(flip_byte(0b1100_1010), 0b0101_0011);
        assert_eq!(flip_byte(0x00), 0x00);
        assert_eq!(flip_byte(0xFF), 0xFF);
    }

    /// Solid 8×8 tile: plane 0 all ones.
    fn load_solid_tile(ppu: &mut Ppu, tile: usize) {
        let mut chr = vec![0u8; 8192];
        for row in 0..8 {
            chr[tile * 16 + row] = 0xFF;
        }
        ppu.load_chr(chr, false);
    }

    #[test]
    fn sprite_renders_on_its_scanline() {
        let mut ppu = Ppu::new(Mirroring::Vertical);
        load_solid_tile(&mut ppu, 1);
        ppu.write_register(1, MASK_SHOW_BG | MASK_SHOW_SPRITES);

        // Sprite palette 0, colour 1.
        set_addr(&mut ppu, 0x3F11);
        ppu.write_register(7, 0x16);

        // Sprite 0: y=10, tile 1, no flip, x=20.
        ppu.write_oam(0, 10);
        ppu.write_oam(1, 1);
        ppu.write_oam(2, 0);
        ppu.write_oam(3, 20);

        ppu.execute(341 * 262);
        let fb = ppu.framebuffer();
        assert_eq!(fb[10 * FB_WIDTH + 20], 0x16, "sprite pixel");
        assert_eq!(fb[10 * FB_WIDTH + 19], 0x00, "backdrop left of sprite");
        assert_eq!(fb[9 * FB_WIDTH + 20], 0x00, "no sprite above its Y");
        assert_eq!(fb[17 * FB_WIDTH + 20], 0x16, "last covered line");
        assert_eq!(fb[18 * FB_WIDTH + 20], 0x00, "below the sprite");
    }

    #[test]
    fn sprite_zero_hit_on_opaque_overlap() {
        let mut ppu = Ppu::new(Mirroring::Vertical);
        load_solid_tile(&mut ppu, 1);
        ppu.write_register(1, MASK_SHOW_BG | MASK_SHOW_SPRITES);

        // Background tile at tile coords (2, 1) covers pixels (16-23, 8-15).
        set_addr(&mut ppu, 0x2000 + 32 + 2);
        ppu.write_register(7, 1);

        // Sprite 0 overlapping that tile.
        ppu.write_oam(0, 10);
        ppu.write_oam(1, 1);
        ppu.write_oam(2, 0);
        ppu.write_oam(3, 20);

        ppu.execute(341 * 262);
        assert_ne!(ppu.status & STATUS_SPRITE0_HIT, 0, "hit flag set");

        // Next pre-render clears it.
        ppu.execute(2);
        assert_eq!(ppu.status & STATUS_SPRITE0_HIT, 0);
    }

    #[test]
    fn sprite_overflow_flag() {
        let mut ppu = Ppu::new(Mirroring::Vertical);
        load_solid_tile(&mut ppu, 1);
        ppu.write_register(1, MASK_SHOW_SPRITES);

        // Nine sprites on scanline 50.
        for n in 0..9 {
            let base = (n * 4) as u8;
            ppu.write_oam(base, 50);
            ppu.write_oam(base + 1, 1);
            ppu.write_oam(base + 2, 0);
            ppu.write_oam(base + 3, (n * 8) as u8);
        }

        ppu.execute(341 * 262);
        assert_ne!(ppu.status & STATUS_OVERFLOW, 0);
    }

    #[test]
    fn horizontal_flip_mirrors_pattern() {
        let mut ppu = Ppu::new(Mirroring::Vertical);
        // Tile 1, plane 0 = $80: only the leftmost pixel set.
        let mut chr = vec![0u8; 8192];
        for row in 0..8 {
            chr[16 + row] = 0x80;
        }
        ppu.load_chr(chr, false);
        ppu.write_register(1, MASK_SHOW_SPRITES);
        set_addr(&mut ppu, 0x3F11);
        ppu.write_register(7, 0x16);

        // Flipped sprite at x=40: the set pixel moves to the right edge.
        ppu.write_oam(0, 10);
        ppu.write_oam(1, 1);
        ppu.write_oam(2, 0x40);
        ppu.write_oam(3, 40);

        ppu.execute(341 * 262);
        let fb = ppu.framebuffer();
        assert_eq!(fb[10 * FB_WIDTH + 47], 0x16, "rightmost pixel set");
        assert_eq!(fb[10 * FB_WIDTH + 40], 0x00, "leftmost pixel clear");
    }

    #[test]
    fn scroll_shifts_background() {
        let mut ppu = Ppu::new(Mirroring::Vertical);
        load_solid_tile(&mut ppu, 1);
        ppu.write_register(1, MASK_SHOW_BG);
        set_addr(&mut ppu, 0x3F01);
        ppu.write_register(7, 0x21);

        // Tile at the top-left of NT0.
        set_addr(&mut ppu, 0x2000);
        ppu.write_register(7, 1);

        // Scroll 8 pixels right: the tile leaves the visible origin.
        ppu.write_register(5, 8);
        ppu.write_register(5, 0);

        ppu.execute(341 * 262);
        let fb = ppu.framebuffer();
        assert_eq!(fb[0], 0x00, "tile scrolled out of column 0");

        // With vertical pairing NT1 mirrors NT0, so the tile reappears
        // 248 pixels later in the wrapped plane.
        assert_eq!(fb[248], 0x21);
    }
}
