//! Instruction-stepped 6502 execution engine.
//!
//! `execute` runs exactly one instruction (or one interrupt entry, or one
//! DMA stall) and reports the cycles it consumed. The scheduler uses that
//! count to advance the rest of the machine, so cycle arithmetic here —
//! page-cross penalties, branch costs, the constant DMA stall — is what
//! keeps the system in sync.

use fc_core::Bus;
use thiserror::Error;

use crate::flags::{self, Status};
use crate::opcodes::{self, Mnemonic, Mode, Opcode};
use crate::registers::Registers;

/// NMI vector address.
pub const NMI_VECTOR: u16 = 0xFFFA;
/// Reset vector address.
pub const RESET_VECTOR: u16 = 0xFFFC;
/// IRQ/BRK vector address.
pub const IRQ_VECTOR: u16 = 0xFFFE;

/// Cycles the CPU is stalled while OAM DMA runs.
pub const DMA_STALL_CYCLES: u32 = 513;

/// Fatal execution errors. Both leave the CPU in [`State::Error`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CpuError {
    /// Opcode byte with no decoding at all (a JAM byte on hardware).
    #[error("unknown opcode ${opcode:02X} at ${pc:04X}")]
    UnknownOpcode { opcode: u8, pc: u16 },
    /// Recognized opcode whose hardware behavior is analog-dependent and
    /// deliberately not modelled.
    #[error("unimplemented opcode ${opcode:02X} at ${pc:04X}")]
    UnimplementedOpcode { opcode: u8, pc: u16 },
}

/// Execution state. `Error` is terminal; `Halted` is entered at the next
/// instruction boundary after a halt request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum State {
    #[default]
    Running,
    Halted,
    Error,
}

/// 6502 CPU.
pub struct Cpu {
    pub regs: Registers,
    state: State,
    halt_requested: bool,
    cycles: u64,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    #[must_use]
    pub fn new() -> Self {
        Self {
            regs: Registers::new(),
            state: State::Running,
            halt_requested: false,
            cycles: 0,
        }
    }

    /// Reset to power-on state, loading PC from the reset vector.
    pub fn reset(&mut self, bus: &mut impl Bus) {
        self.regs = Registers::new();
        self.regs.pc = bus.read_word(RESET_VECTOR);
        self.state = State::Running;
        self.halt_requested = false;
    }

    #[must_use]
    pub fn state(&self) -> State {
        self.state
    }

    /// Total cycles consumed since power-on.
    #[must_use]
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Ask the CPU to stop. Takes effect at the next instruction boundary.
    pub fn request_halt(&mut self) {
        self.halt_requested = true;
    }

    /// Run one instruction atomically and return the cycles it consumed.
    ///
    /// Per call, in order: the halt request is honored; a pending OAM DMA
    /// stall consumes [`DMA_STALL_CYCLES`] with no instruction; a pending
    /// NMI, then IRQ (unless I is set), is serviced; otherwise one
    /// instruction is fetched and executed.
    ///
    /// # Errors
    ///
    /// [`CpuError`] on an unknown or unimplemented opcode. The CPU enters
    /// the terminal `Error` state and further calls return 0 cycles.
    pub fn execute(&mut self, bus: &mut impl Bus) -> Result<u32, CpuError> {
        match self.state {
            State::Running => {}
            State::Halted | State::Error => return Ok(0),
        }
        if self.halt_requested {
            self.halt_requested = false;
            self.state = State::Halted;
            return Ok(0);
        }

        if bus.take_dma_stall() {
            self.cycles += u64::from(DMA_STALL_CYCLES);
            return Ok(DMA_STALL_CYCLES);
        }

        if bus.take_nmi() {
            return Ok(self.service_interrupt(bus, NMI_VECTOR));
        }
        if bus.irq_asserted() && !self.regs.p.is_set(flags::I) {
            return Ok(self.service_interrupt(bus, IRQ_VECTOR));
        }

        let pc = self.regs.pc;
        let opcode = self.fetch(bus);
        let Some(entry) = opcodes::lookup(opcode) else {
            self.state = State::Error;
            return Err(CpuError::UnknownOpcode { opcode, pc });
        };
        if entry.mnemonic.is_unstable() {
            self.state = State::Error;
            return Err(CpuError::UnimplementedOpcode { opcode, pc });
        }

        let cycles = self.dispatch(bus, entry);
        self.cycles += u64::from(cycles);
        Ok(cycles)
    }

    /// Hardware interrupt entry: push PC and P (B clear), set I, load the
    /// vector. Costs 7 cycles.
    fn service_interrupt(&mut self, bus: &mut impl Bus, vector: u16) -> u32 {
        self.push16(bus, self.regs.pc);
        let p = self.regs.p.to_pushed_irq();
        self.push8(bus, p);
        self.regs.p.set(flags::I);
        self.regs.pc = bus.read_word(vector);
        self.cycles += 7;
        7
    }

    fn fetch(&mut self, bus: &mut impl Bus) -> u8 {
        let value = bus.read(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        value
    }

    fn fetch_word(&mut self, bus: &mut impl Bus) -> u16 {
        let lo = self.fetch(bus);
        let hi = self.fetch(bus);
        u16::from(lo) | (u16::from(hi) << 8)
    }

    fn push8(&mut self, bus: &mut impl Bus, value: u8) {
        let addr = self.regs.push();
        bus.write(addr, value);
    }

    fn push16(&mut self, bus: &mut impl Bus, value: u16) {
        self.push8(bus, (value >> 8) as u8);
        self.push8(bus, value as u8);
    }

    fn pop8(&mut self, bus: &mut impl Bus) -> u8 {
        let addr = self.regs.pop();
        bus.read(addr)
    }

    fn pop16(&mut self, bus: &mut impl Bus) -> u16 {
        let lo = self.pop8(bus);
        let hi = self.pop8(bus);
        u16::from(lo) | (u16::from(hi) << 8)
    }

    /// Resolve the operand address for a memory-addressed mode, reporting
    /// whether indexed arithmetic crossed a page.
    fn resolve(&mut self, bus: &mut impl Bus, mode: Mode) -> (u16, bool) {
        match mode {
            Mode::Immediate => {
                let addr = self.regs.pc;
                self.regs.pc = self.regs.pc.wrapping_add(1);
                (addr, false)
            }
            Mode::ZeroPage => (u16::from(self.fetch(bus)), false),
            Mode::ZeroPageX => {
                let base = self.fetch(bus);
                (bus.zero_page_indexed(base, self.regs.x), false)
            }
            Mode::ZeroPageY => {
                let base = self.fetch(bus);
                (bus.zero_page_indexed(base, self.regs.y), false)
            }
            Mode::Absolute => (self.fetch_word(bus), false),
            Mode::AbsoluteX => {
                let base = self.fetch_word(bus);
                bus.absolute_indexed(base, self.regs.x)
            }
            Mode::AbsoluteY => {
                let base = self.fetch_word(bus);
                bus.absolute_indexed(base, self.regs.y)
            }
            Mode::Indirect => {
                let ptr = self.fetch_word(bus);
                (bus.indirect(ptr), false)
            }
            Mode::IndexedIndirect => {
                let base = self.fetch(bus);
                (bus.indexed_indirect(base, self.regs.x), false)
            }
            Mode::IndirectIndexed => {
                let base = self.fetch(bus);
                bus.indirect_indexed(base, self.regs.y)
            }
            // No operand bytes to consume.
            Mode::Implied | Mode::Accumulator | Mode::Relative => (0, false),
        }
    }

    fn dispatch(&mut self, bus: &mut impl Bus, entry: &Opcode) -> u32 {
        use Mnemonic as M;
        let base = u32::from(entry.cycles);
        let p = self.regs.p;

        match entry.mnemonic {
            M::Jmp => {
                let target = if entry.mode == Mode::Indirect {
                    let ptr = self.fetch_word(bus);
                    bus.indirect(ptr)
                } else {
                    self.fetch_word(bus)
                };
                self.regs.pc = target;
                base
            }
            M::Jsr => {
                let target = self.fetch_word(bus);
                // Hardware pushes the address of the instruction's last
                // byte; RTS compensates by adding one.
                let ret = self.regs.pc.wrapping_sub(1);
                self.push16(bus, ret);
                self.regs.pc = target;
                base
            }
            M::Rts => {
                let addr = self.pop16(bus);
                self.regs.pc = addr.wrapping_add(1);
                base
            }
            M::Rti => {
                let status = self.pop8(bus);
                self.regs.p = Status::from_pushed(status);
                self.regs.pc = self.pop16(bus);
                base
            }
            M::Brk => {
                // The byte after BRK is padding; the pushed return address
                // skips it.
                self.regs.pc = self.regs.pc.wrapping_add(1);
                self.push16(bus, self.regs.pc);
                let status = self.regs.p.to_pushed_brk();
                self.push8(bus, status);
                self.regs.p.set(flags::I);
                self.regs.pc = bus.read_word(IRQ_VECTOR);
                base
            }

            M::Bpl => self.branch(bus, !p.is_set(flags::N)),
            M::Bmi => self.branch(bus, p.is_set(flags::N)),
            M::Bvc => self.branch(bus, !p.is_set(flags::V)),
            M::Bvs => self.branch(bus, p.is_set(flags::V)),
            M::Bcc => self.branch(bus, !p.is_set(flags::C)),
            M::Bcs => self.branch(bus, p.is_set(flags::C)),
            M::Bne => self.branch(bus, !p.is_set(flags::Z)),
            M::Beq => self.branch(bus, p.is_set(flags::Z)),

            M::Php => {
                let status = self.regs.p.to_pushed_brk();
                self.push8(bus, status);
                base
            }
            M::Plp => {
                let status = self.pop8(bus);
                self.regs.p = Status::from_pushed(status);
                base
            }
            M::Pha => {
                self.push8(bus, self.regs.a);
                base
            }
            M::Pla => {
                let value = self.pop8(bus);
                self.regs.a = value;
                self.regs.p.update_nz(value);
                base
            }

            M::Clc => {
                self.regs.p.clear(flags::C);
                base
            }
            M::Sec => {
                self.regs.p.set(flags::C);
                base
            }
            M::Cli => {
                self.regs.p.clear(flags::I);
                base
            }
            M::Sei => {
                self.regs.p.set(flags::I);
                base
            }
            M::Cld => {
                self.regs.p.clear(flags::D);
                base
            }
            M::Sed => {
                self.regs.p.set(flags::D);
                base
            }
            M::Clv => {
                self.regs.p.clear(flags::V);
                base
            }

            M::Tax => {
                self.regs.x = self.regs.a;
                self.regs.p.update_nz(self.regs.x);
                base
            }
            M::Tay => {
                self.regs.y = self.regs.a;
                self.regs.p.update_nz(self.regs.y);
                base
            }
            M::Txa => {
                self.regs.a = self.regs.x;
                self.regs.p.update_nz(self.regs.a);
                base
            }
            M::Tya => {
                self.regs.a = self.regs.y;
                self.regs.p.update_nz(self.regs.a);
                base
            }
            M::Tsx => {
                self.regs.x = self.regs.s;
                self.regs.p.update_nz(self.regs.x);
                base
            }
            // TXS is the one transfer that sets no flags.
            M::Txs => {
                self.regs.s = self.regs.x;
                base
            }

            M::Inx => {
                self.regs.x = self.regs.x.wrapping_add(1);
                self.regs.p.update_nz(self.regs.x);
                base
            }
            M::Dex => {
                self.regs.x = self.regs.x.wrapping_sub(1);
                self.regs.p.update_nz(self.regs.x);
                base
            }
            M::Iny => {
                self.regs.y = self.regs.y.wrapping_add(1);
                self.regs.p.update_nz(self.regs.y);
                base
            }
            M::Dey => {
                self.regs.y = self.regs.y.wrapping_sub(1);
                self.regs.p.update_nz(self.regs.y);
                base
            }

            M::Asl => self.shift_op(bus, entry, Self::do_asl),
            M::Lsr => self.shift_op(bus, entry, Self::do_lsr),
            M::Rol => self.shift_op(bus, entry, Self::do_rol),
            M::Ror => self.shift_op(bus, entry, Self::do_ror),

            M::Nop if entry.mode == Mode::Implied => base,

            _ => self.memory_op(bus, entry),
        }
    }

    /// Conditional branch: 2 cycles not taken, 3 taken, 4 taken across a
    /// page boundary (old vs. new PC high byte, after the operand fetch).
    fn branch(&mut self, bus: &mut impl Bus, taken: bool) -> u32 {
        let offset = self.fetch(bus) as i8;
        if !taken {
            return 2;
        }
        let target = self.regs.pc.wrapping_add(offset as u16);
        let crossed = target & 0xFF00 != self.regs.pc & 0xFF00;
        self.regs.pc = target;
        if crossed { 4 } else { 3 }
    }

    /// ASL/LSR/ROL/ROR: operate on A or read-modify-write memory.
    fn shift_op(&mut self, bus: &mut impl Bus, entry: &Opcode, f: fn(&mut Self, u8) -> u8) -> u32 {
        if entry.mode == Mode::Accumulator {
            let a = self.regs.a;
            self.regs.a = f(self, a);
        } else {
            let (addr, _) = self.resolve(bus, entry.mode);
            self.rmw(bus, addr, f);
        }
        u32::from(entry.cycles)
    }

    /// Instructions that take a memory (or immediate) operand.
    fn memory_op(&mut self, bus: &mut impl Bus, entry: &Opcode) -> u32 {
        use Mnemonic as M;
        let mut cycles = u32::from(entry.cycles);
        let (addr, crossed) = self.resolve(bus, entry.mode);
        if crossed && entry.page_penalty {
            cycles += 1;
        }

        match entry.mnemonic {
            M::Lda => {
                let value = bus.read(addr);
                self.regs.a = value;
                self.regs.p.update_nz(value);
            }
            M::Ldx => {
                let value = bus.read(addr);
                self.regs.x = value;
                self.regs.p.update_nz(value);
            }
            M::Ldy => {
                let value = bus.read(addr);
                self.regs.y = value;
                self.regs.p.update_nz(value);
            }
            M::Lax => {
                let value = bus.read(addr);
                self.regs.a = value;
                self.regs.x = value;
                self.regs.p.update_nz(value);
            }

            M::Sta => bus.write(addr, self.regs.a),
            M::Stx => bus.write(addr, self.regs.x),
            M::Sty => bus.write(addr, self.regs.y),
            M::Sax => bus.write(addr, self.regs.a & self.regs.x),

            M::Ora => {
                let value = bus.read(addr);
                self.regs.a |= value;
                self.regs.p.update_nz(self.regs.a);
            }
            M::And => {
                let value = bus.read(addr);
                self.regs.a &= value;
                self.regs.p.update_nz(self.regs.a);
            }
            M::Eor => {
                let value = bus.read(addr);
                self.regs.a ^= value;
                self.regs.p.update_nz(self.regs.a);
            }
            M::Adc => {
                let value = bus.read(addr);
                self.do_adc(value);
            }
            M::Sbc => {
                let value = bus.read(addr);
                self.do_sbc(value);
            }

            M::Cmp => {
                let value = bus.read(addr);
                self.do_cmp(self.regs.a, value);
            }
            M::Cpx => {
                let value = bus.read(addr);
                self.do_cmp(self.regs.x, value);
            }
            M::Cpy => {
                let value = bus.read(addr);
                self.do_cmp(self.regs.y, value);
            }
            M::Bit => {
                let value = bus.read(addr);
                self.regs.p.set_if(flags::Z, self.regs.a & value == 0);
                self.regs.p.set_if(flags::N, value & 0x80 != 0);
                self.regs.p.set_if(flags::V, value & 0x40 != 0);
            }

            M::Inc => {
                self.rmw(bus, addr, Self::do_inc);
            }
            M::Dec => {
                self.rmw(bus, addr, Self::do_dec);
            }

            M::Slo => {
                let result = self.rmw(bus, addr, Self::do_asl);
                self.regs.a |= result;
                self.regs.p.update_nz(self.regs.a);
            }
            M::Rla => {
                let result = self.rmw(bus, addr, Self::do_rol);
                self.regs.a &= result;
                self.regs.p.update_nz(self.regs.a);
            }
            M::Sre => {
                let result = self.rmw(bus, addr, Self::do_lsr);
                self.regs.a ^= result;
                self.regs.p.update_nz(self.regs.a);
            }
            M::Rra => {
                let result = self.rmw(bus, addr, Self::do_ror);
                self.do_adc(result);
            }
            M::Dcp => {
                let result = self.rmw(bus, addr, Self::do_dec);
                self.do_cmp(self.regs.a, result);
            }
            M::Isb => {
                let result = self.rmw(bus, addr, Self::do_inc);
                self.do_sbc(result);
            }

            // Multi-byte NOP: performs the operand read, discards it.
            M::Nop => {
                let _ = bus.read(addr);
            }

            other => unreachable!("{other:?} is not a memory operation"),
        }

        cycles
    }

    /// Read-modify-write: returns the written result.
    fn rmw(&mut self, bus: &mut impl Bus, addr: u16, f: fn(&mut Self, u8) -> u8) -> u8 {
        let value = bus.read(addr);
        let result = f(self, value);
        bus.write(addr, result);
        result
    }

    fn do_adc(&mut self, value: u8) {
        let a = self.regs.a;
        let carry = u16::from(self.regs.p.is_set(flags::C));
        let sum = u16::from(a) + u16::from(value) + carry;
        let result = sum as u8;
        self.regs.p.set_if(flags::C, sum > 0xFF);
        // Overflow: both operands agree in sign and the result disagrees.
        self.regs
            .p
            .set_if(flags::V, (a ^ result) & (value ^ result) & 0x80 != 0);
        self.regs.p.update_nz(result);
        self.regs.a = result;
    }

    /// Binary SBC is ADC of the one's complement.
    fn do_sbc(&mut self, value: u8) {
        self.do_adc(!value);
    }

    fn do_cmp(&mut self, register: u8, value: u8) {
        let result = register.wrapping_sub(value);
        self.regs.p.set_if(flags::C, register >= value);
        self.regs.p.update_nz(result);
    }

    fn do_asl(&mut self, value: u8) -> u8 {
        self.regs.p.set_if(flags::C, value & 0x80 != 0);
        let result = value << 1;
        self.regs.p.update_nz(result);
        result
    }

    fn do_lsr(&mut self, value: u8) -> u8 {
        self.regs.p.set_if(flags::C, value & 0x01 != 0);
        let result = value >> 1;
        self.regs.p.update_nz(result);
        result
    }

    fn do_rol(&mut self, value: u8) -> u8 {
        let carry_in = u8::from(self.regs.p.is_set(flags::C));
        self.regs.p.set_if(flags::C, value & 0x80 != 0);
        let result = (value << 1) | carry_in;
        self.regs.p.update_nz(result);
        result
    }

    fn do_ror(&mut self, value: u8) -> u8 {
        let carry_in = u8::from(self.regs.p.is_set(flags::C)) << 7;
        self.regs.p.set_if(flags::C, value & 0x01 != 0);
        let result = (value >> 1) | carry_in;
        self.regs.p.update_nz(result);
        result
    }

    fn do_inc(&mut self, value: u8) -> u8 {
        let result = value.wrapping_add(1);
        self.regs.p.update_nz(result);
        result
    }

    fn do_dec(&mut self, value: u8) -> u8 {
        let result = value.wrapping_sub(1);
        self.regs.p.update_nz(result);
        result
    }
}
