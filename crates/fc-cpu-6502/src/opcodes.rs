//! 6502 opcode decode table.
//!
//! All 256 opcode bytes are classified here. Official opcodes and the
//! stable illegal ones carry full decode information; the unstable illegal
//! group is recognized but refused at execution time; the JAM bytes (which
//! halt a real 6502) have no entry at all.

/// Addressing modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Implied,
    Accumulator,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    Indirect,
    IndexedIndirect,
    IndirectIndexed,
    Relative,
}

/// Instruction mnemonics, official and illegal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mnemonic {
    Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Brk, Bvc, Bvs,
    Clc, Cld, Cli, Clv, Cmp, Cpx, Cpy, Dec, Dex, Dey, Eor, Inc, Inx,
    Iny, Jmp, Jsr, Lda, Ldx, Ldy, Lsr, Nop, Ora, Pha, Php, Pla, Plp,
    Rol, Ror, Rti, Rts, Sbc, Sec, Sed, Sei, Sta, Stx, Sty, Tax, Tay,
    Tsx, Txa, Txs, Tya,
    // Stable illegal opcodes.
    Slo, Rla, Sre, Rra, Dcp, Isb, Lax, Sax,
    // Unstable illegal opcodes: decoded, never executed.
    Anc, Alr, Arr, Ane, Lxa, Sbx, Sha, Shx, Shy, Tas, Las,
}

impl Mnemonic {
    /// Assembly name, for trace output.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Adc => "ADC", Self::And => "AND", Self::Asl => "ASL",
            Self::Bcc => "BCC", Self::Bcs => "BCS", Self::Beq => "BEQ",
            Self::Bit => "BIT", Self::Bmi => "BMI", Self::Bne => "BNE",
            Self::Bpl => "BPL", Self::Brk => "BRK", Self::Bvc => "BVC",
            Self::Bvs => "BVS", Self::Clc => "CLC", Self::Cld => "CLD",
            Self::Cli => "CLI", Self::Clv => "CLV", Self::Cmp => "CMP",
            Self::Cpx => "CPX", Self::Cpy => "CPY", Self::Dec => "DEC",
            Self::Dex => "DEX", Self::Dey => "DEY", Self::Eor => "EOR",
            Self::Inc => "INC", Self::Inx => "INX", Self::Iny => "INY",
            Self::Jmp => "JMP", Self::Jsr => "JSR", Self::Lda => "LDA",
            Self::Ldx => "LDX", Self::Ldy => "LDY", Self::Lsr => "LSR",
            Self::Nop => "NOP", Self::Ora => "ORA", Self::Pha => "PHA",
            Self::Php => "PHP", Self::Pla => "PLA", Self::Plp => "PLP",
            Self::Rol => "ROL", Self::Ror => "ROR", Self::Rti => "RTI",
            Self::Rts => "RTS", Self::Sbc => "SBC", Self::Sec => "SEC",
            Self::Sed => "SED", Self::Sei => "SEI", Self::Sta => "STA",
            Self::Stx => "STX", Self::Sty => "STY", Self::Tax => "TAX",
            Self::Tay => "TAY", Self::Tsx => "TSX", Self::Txa => "TXA",
            Self::Txs => "TXS", Self::Tya => "TYA", Self::Slo => "SLO",
            Self::Rla => "RLA", Self::Sre => "SRE", Self::Rra => "RRA",
            Self::Dcp => "DCP", Self::Isb => "ISB", Self::Lax => "LAX",
            Self::Sax => "SAX", Self::Anc => "ANC", Self::Alr => "ALR",
            Self::Arr => "ARR", Self::Ane => "ANE", Self::Lxa => "LXA",
            Self::Sbx => "SBX", Self::Sha => "SHA", Self::Shx => "SHX",
            Self::Shy => "SHY", Self::Tas => "TAS", Self::Las => "LAS",
        }
    }

    /// True for the unstable illegal group whose results depend on analog
    /// chip behavior. These decode but refuse to execute.
    #[must_use]
    pub const fn is_unstable(self) -> bool {
        matches!(
            self,
            Self::Anc
                | Self::Alr
                | Self::Arr
                | Self::Ane
                | Self::Lxa
                | Self::Sbx
                | Self::Sha
                | Self::Shx
                | Self::Shy
                | Self::Tas
                | Self::Las
        )
    }
}

/// One decoded opcode.
#[derive(Debug, Clone, Copy)]
pub struct Opcode {
    pub mnemonic: Mnemonic,
    pub mode: Mode,
    /// Base cycle count, before page-cross and branch adjustments.
    pub cycles: u8,
    /// Whether an indexed read across a page boundary costs one more cycle.
    pub page_penalty: bool,
}

/// Look up an opcode byte. `None` for the JAM bytes.
#[must_use]
pub fn lookup(opcode: u8) -> Option<&'static Opcode> {
    TABLE[opcode as usize].as_ref()
}

const fn op(mnemonic: Mnemonic, mode: Mode, cycles: u8) -> Option<Opcode> {
    Some(Opcode {
        mnemonic,
        mode,
        cycles,
        page_penalty: false,
    })
}

/// Like `op`, for indexed reads that pay the page-cross cycle.
const fn opp(mnemonic: Mnemonic, mode: Mode, cycles: u8) -> Option<Opcode> {
    Some(Opcode {
        mnemonic,
        mode,
        cycles,
        page_penalty: true,
    })
}

/// Full decode table, indexed by opcode byte.
pub static TABLE: [Option<Opcode>; 256] = {
    use Mnemonic::*;
    use Mode::*;

    let mut t: [Option<Opcode>; 256] = [None; 256];

    t[0x00] = op(Brk, Implied, 7);
    t[0x01] = op(Ora, IndexedIndirect, 6);
    t[0x03] = op(Slo, IndexedIndirect, 8);
    t[0x04] = op(Nop, ZeroPage, 3);
    t[0x05] = op(Ora, ZeroPage, 3);
    t[0x06] = op(Asl, ZeroPage, 5);
    t[0x07] = op(Slo, ZeroPage, 5);
    t[0x08] = op(Php, Implied, 3);
    t[0x09] = op(Ora, Immediate, 2);
    t[0x0A] = op(Asl, Accumulator, 2);
    t[0x0B] = op(Anc, Immediate, 2);
    t[0x0C] = op(Nop, Absolute, 4);
    t[0x0D] = op(Ora, Absolute, 4);
    t[0x0E] = op(Asl, Absolute, 6);
    t[0x0F] = op(Slo, Absolute, 6);

    t[0x10] = op(Bpl, Relative, 2);
    t[0x11] = opp(Ora, IndirectIndexed, 5);
    t[0x13] = op(Slo, IndirectIndexed, 8);
    t[0x14] = op(Nop, ZeroPageX, 4);
    t[0x15] = op(Ora, ZeroPageX, 4);
    t[0x16] = op(Asl, ZeroPageX, 6);
    t[0x17] = op(Slo, ZeroPageX, 6);
    t[0x18] = op(Clc, Implied, 2);
    t[0x19] = opp(Ora, AbsoluteY, 4);
    t[0x1A] = op(Nop, Implied, 2);
    t[0x1B] = op(Slo, AbsoluteY, 7);
    t[0x1C] = opp(Nop, AbsoluteX, 4);
    t[0x1D] = opp(Ora, AbsoluteX, 4);
    t[0x1E] = op(Asl, AbsoluteX, 7);
    t[0x1F] = op(Slo, AbsoluteX, 7);

    t[0x20] = op(Jsr, Absolute, 6);
    t[0x21] = op(And, IndexedIndirect, 6);
    t[0x23] = op(Rla, IndexedIndirect, 8);
    t[0x24] = op(Bit, ZeroPage, 3);
    t[0x25] = op(And, ZeroPage, 3);
    t[0x26] = op(Rol, ZeroPage, 5);
    t[0x27] = op(Rla, ZeroPage, 5);
    t[0x28] = op(Plp, Implied, 4);
    t[0x29] = op(And, Immediate, 2);
    t[0x2A] = op(Rol, Accumulator, 2);
    t[0x2B] = op(Anc, Immediate, 2);
    t[0x2C] = op(Bit, Absolute, 4);
    t[0x2D] = op(And, Absolute, 4);
    t[0x2E] = op(Rol, Absolute, 6);
    t[0x2F] = op(Rla, Absolute, 6);

    t[0x30] = op(Bmi, Relative, 2);
    t[0x31] = opp(And, IndirectIndexed, 5);
    t[0x33] = op(Rla, IndirectIndexed, 8);
    t[0x34] = op(Nop, ZeroPageX, 4);
    t[0x35] = op(And, ZeroPageX, 4);
    t[0x36] = op(Rol, ZeroPageX, 6);
    t[0x37] = op(Rla, ZeroPageX, 6);
    t[0x38] = op(Sec, Implied, 2);
    t[0x39] = opp(And, AbsoluteY, 4);
    t[0x3A] = op(Nop, Implied, 2);
    t[0x3B] = op(Rla, AbsoluteY, 7);
    t[0x3C] = opp(Nop, AbsoluteX, 4);
    t[0x3D] = opp(And, AbsoluteX, 4);
    t[0x3E] = op(Rol, AbsoluteX, 7);
    t[0x3F] = op(Rla, AbsoluteX, 7);

    t[0x40] = op(Rti, Implied, 6);
    t[0x41] = op(Eor, IndexedIndirect, 6);
    t[0x43] = op(Sre, IndexedIndirect, 8);
    t[0x44] = op(Nop, ZeroPage, 3);
    t[0x45] = op(Eor, ZeroPage, 3);
    t[0x46] = op(Lsr, ZeroPage, 5);
    t[0x47] = op(Sre, ZeroPage, 5);
    t[0x48] = op(Pha, Implied, 3);
    t[0x49] = op(Eor, Immediate, 2);
    t[0x4A] = op(Lsr, Accumulator, 2);
    t[0x4B] = op(Alr, Immediate, 2);
    t[0x4C] = op(Jmp, Absolute, 3);
    t[0x4D] = op(Eor, Absolute, 4);
    t[0x4E] = op(Lsr, Absolute, 6);
    t[0x4F] = op(Sre, Absolute, 6);

    t[0x50] = op(Bvc, Relative, 2);
    t[0x51] = opp(Eor, IndirectIndexed, 5);
    t[0x53] = op(Sre, IndirectIndexed, 8);
    t[0x54] = op(Nop, ZeroPageX, 4);
    t[0x55] = op(Eor, ZeroPageX, 4);
    t[0x56] = op(Lsr, ZeroPageX, 6);
    t[0x57] = op(Sre, ZeroPageX, 6);
    t[0x58] = op(Cli, Implied, 2);
    t[0x59] = opp(Eor, AbsoluteY, 4);
    t[0x5A] = op(Nop, Implied, 2);
    t[0x5B] = op(Sre, AbsoluteY, 7);
    t[0x5C] = opp(Nop, AbsoluteX, 4);
    t[0x5D] = opp(Eor, AbsoluteX, 4);
    t[0x5E] = op(Lsr, AbsoluteX, 7);
    t[0x5F] = op(Sre, AbsoluteX, 7);

    t[0x60] = op(Rts, Implied, 6);
    t[0x61] = op(Adc, IndexedIndirect, 6);
    t[0x63] = op(Rra, IndexedIndirect, 8);
    t[0x64] = op(Nop, ZeroPage, 3);
    t[0x65] = op(Adc, ZeroPage, 3);
    t[0x66] = op(Ror, ZeroPage, 5);
    t[0x67] = op(Rra, ZeroPage, 5);
    t[0x68] = op(Pla, Implied, 4);
    t[0x69] = op(Adc, Immediate, 2);
    t[0x6A] = op(Ror, Accumulator, 2);
    t[0x6B] = op(Arr, Immediate, 2);
    t[0x6C] = op(Jmp, Indirect, 5);
    t[0x6D] = op(Adc, Absolute, 4);
    t[0x6E] = op(Ror, Absolute, 6);
    t[0x6F] = op(Rra, Absolute, 6);

    t[0x70] = op(Bvs, Relative, 2);
    t[0x71] = opp(Adc, IndirectIndexed, 5);
    t[0x73] = op(Rra, IndirectIndexed, 8);
    t[0x74] = op(Nop, ZeroPageX, 4);
    t[0x75] = op(Adc, ZeroPageX, 4);
    t[0x76] = op(Ror, ZeroPageX, 6);
    t[0x77] = op(Rra, ZeroPageX, 6);
    t[0x78] = op(Sei, Implied, 2);
    t[0x79] = opp(Adc, AbsoluteY, 4);
    t[0x7A] = op(Nop, Implied, 2);
    t[0x7B] = op(Rra, AbsoluteY, 7);
    t[0x7C] = opp(Nop, AbsoluteX, 4);
    t[0x7D] = opp(Adc, AbsoluteX, 4);
    t[0x7E] = op(Ror, AbsoluteX, 7);
    t[0x7F] = op(Rra, AbsoluteX, 7);

    t[0x80] = op(Nop, Immediate, 2);
    t[0x81] = op(Sta, IndexedIndirect, 6);
    t[0x82] = op(Nop, Immediate, 2);
    t[0x83] = op(Sax, IndexedIndirect, 6);
    t[0x84] = op(Sty, ZeroPage, 3);
    t[0x85] = op(Sta, ZeroPage, 3);
    t[0x86] = op(Stx, ZeroPage, 3);
    t[0x87] = op(Sax, ZeroPage, 3);
    t[0x88] = op(Dey, Implied, 2);
    t[0x89] = op(Nop, Immediate, 2);
    t[0x8A] = op(Txa, Implied, 2);
    t[0x8B] = op(Ane, Immediate, 2);
    t[0x8C] = op(Sty, Absolute, 4);
    t[0x8D] = op(Sta, Absolute, 4);
    t[0x8E] = op(Stx, Absolute, 4);
    t[0x8F] = op(Sax, Absolute, 4);

    t[0x90] = op(Bcc, Relative, 2);
    t[0x91] = op(Sta, IndirectIndexed, 6);
    t[0x93] = op(Sha, IndirectIndexed, 6);
    t[0x94] = op(Sty, ZeroPageX, 4);
    t[0x95] = op(Sta, ZeroPageX, 4);
    t[0x96] = op(Stx, ZeroPageY, 4);
    t[0x97] = op(Sax, ZeroPageY, 4);
    t[0x98] = op(Tya, Implied, 2);
    t[0x99] = op(Sta, AbsoluteY, 5);
    t[0x9A] = op(Txs, Implied, 2);
    t[0x9B] = op(Tas, AbsoluteY, 5);
    t[0x9C] = op(Shy, AbsoluteX, 5);
    t[0x9D] = op(Sta, AbsoluteX, 5);
    t[0x9E] = op(Shx, AbsoluteY, 5);
    t[0x9F] = op(Sha, AbsoluteY, 5);

    t[0xA0] = op(Ldy, Immediate, 2);
    t[0xA1] = op(Lda, IndexedIndirect, 6);
    t[0xA2] = op(Ldx, Immediate, 2);
    t[0xA3] = op(Lax, IndexedIndirect, 6);
    t[0xA4] = op(Ldy, ZeroPage, 3);
    t[0xA5] = op(Lda, ZeroPage, 3);
    t[0xA6] = op(Ldx, ZeroPage, 3);
    t[0xA7] = op(Lax, ZeroPage, 3);
    t[0xA8] = op(Tay, Implied, 2);
    t[0xA9] = op(Lda, Immediate, 2);
    t[0xAA] = op(Tax, Implied, 2);
    t[0xAB] = op(Lxa, Immediate, 2);
    t[0xAC] = op(Ldy, Absolute, 4);
    t[0xAD] = op(Lda, Absolute, 4);
    t[0xAE] = op(Ldx, Absolute, 4);
    t[0xAF] = op(Lax, Absolute, 4);

    t[0xB0] = op(Bcs, Relative, 2);
    t[0xB1] = opp(Lda, IndirectIndexed, 5);
    t[0xB3] = opp(Lax, IndirectIndexed, 5);
    t[0xB4] = op(Ldy, ZeroPageX, 4);
    t[0xB5] = op(Lda, ZeroPageX, 4);
    t[0xB6] = op(Ldx, ZeroPageY, 4);
    t[0xB7] = op(Lax, ZeroPageY, 4);
    t[0xB8] = op(Clv, Implied, 2);
    t[0xB9] = opp(Lda, AbsoluteY, 4);
    t[0xBA] = op(Tsx, Implied, 2);
    t[0xBB] = opp(Las, AbsoluteY, 4);
    t[0xBC] = opp(Ldy, AbsoluteX, 4);
    t[0xBD] = opp(Lda, AbsoluteX, 4);
    t[0xBE] = opp(Ldx, AbsoluteY, 4);
    t[0xBF] = opp(Lax, AbsoluteY, 4);

    t[0xC0] = op(Cpy, Immediate, 2);
    t[0xC1] = op(Cmp, IndexedIndirect, 6);
    t[0xC2] = op(Nop, Immediate, 2);
    t[0xC3] = op(Dcp, IndexedIndirect, 8);
    t[0xC4] = op(Cpy, ZeroPage, 3);
    t[0xC5] = op(Cmp, ZeroPage, 3);
    t[0xC6] = op(Dec, ZeroPage, 5);
    t[0xC7] = op(Dcp, ZeroPage, 5);
    t[0xC8] = op(Iny, Implied, 2);
    t[0xC9] = op(Cmp, Immediate, 2);
    t[0xCA] = op(Dex, Implied, 2);
    t[0xCB] = op(Sbx, Immediate, 2);
    t[0xCC] = op(Cpy, Absolute, 4);
    t[0xCD] = op(Cmp, Absolute, 4);
    t[0xCE] = op(Dec, Absolute, 6);
    t[0xCF] = op(Dcp, Absolute, 6);

    t[0xD0] = op(Bne, Relative, 2);
    t[0xD1] = opp(Cmp, IndirectIndexed, 5);
    t[0xD3] = op(Dcp, IndirectIndexed, 8);
    t[0xD4] = op(Nop, ZeroPageX, 4);
    t[0xD5] = op(Cmp, ZeroPageX, 4);
    t[0xD6] = op(Dec, ZeroPageX, 6);
    t[0xD7] = op(Dcp, ZeroPageX, 6);
    t[0xD8] = op(Cld, Implied, 2);
    t[0xD9] = opp(Cmp, AbsoluteY, 4);
    t[0xDA] = op(Nop, Implied, 2);
    t[0xDB] = op(Dcp, AbsoluteY, 7);
    t[0xDC] = opp(Nop, AbsoluteX, 4);
    t[0xDD] = opp(Cmp, AbsoluteX, 4);
    t[0xDE] = op(Dec, AbsoluteX, 7);
    t[0xDF] = op(Dcp, AbsoluteX, 7);

    t[0xE0] = op(Cpx, Immediate, 2);
    t[0xE1] = op(Sbc, IndexedIndirect, 6);
    t[0xE2] = op(Nop, Immediate, 2);
    t[0xE3] = op(Isb, IndexedIndirect, 8);
    t[0xE4] = op(Cpx, ZeroPage, 3);
    t[0xE5] = op(Sbc, ZeroPage, 3);
    t[0xE6] = op(Inc, ZeroPage, 5);
    t[0xE7] = op(Isb, ZeroPage, 5);
    t[0xE8] = op(Inx, Implied, 2);
    t[0xE9] = op(Sbc, Immediate, 2);
    t[0xEA] = op(Nop, Implied, 2);
    t[0xEB] = op(Sbc, Immediate, 2);
    t[0xEC] = op(Cpx, Absolute, 4);
    t[0xED] = op(Sbc, Absolute, 4);
    t[0xEE] = op(Inc, Absolute, 6);
    t[0xEF] = op(Isb, Absolute, 6);

    t[0xF0] = op(Beq, Relative, 2);
    t[0xF1] = opp(Sbc, IndirectIndexed, 5);
    t[0xF3] = op(Isb, IndirectIndexed, 8);
    t[0xF4] = op(Nop, ZeroPageX, 4);
    t[0xF5] = op(Sbc, ZeroPageX, 4);
    t[0xF6] = op(Inc, ZeroPageX, 6);
    t[0xF7] = op(Isb, ZeroPageX, 6);
    t[0xF8] = op(Sed, Implied, 2);
    t[0xF9] = opp(Sbc, AbsoluteY, 4);
    t[0xFA] = op(Nop, Implied, 2);
    t[0xFB] = op(Isb, AbsoluteY, 7);
    t[0xFC] = opp(Nop, AbsoluteX, 4);
    t[0xFD] = opp(Sbc, AbsoluteX, 4);
    t[0xFE] = op(Inc, AbsoluteX, 7);
    t[0xFF] = op(Isb, AbsoluteX, 7);

    t
};
