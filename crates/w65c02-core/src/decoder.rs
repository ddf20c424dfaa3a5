//! Opcode decoding for the WDC 65C02 instruction set.
//!
//! Decoding is total: every byte maps to either a defined instruction or
//! [`Instruction::Undefined`], which executes as a one-byte no-op.

/// Operation selected by an opcode, independent of addressing mode.
///
/// `Rmb`/`Smb`/`Bbr`/`Bbs` take their bit number from opcode bits 6..4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Mnemonic {
    Adc,
    And,
    Asl,
    Bbr,
    Bbs,
    Bcc,
    Bcs,
    Beq,
    Bit,
    Bmi,
    Bne,
    Bpl,
    Bra,
    Brk,
    Bvc,
    Bvs,
    Clc,
    Cld,
    Cli,
    Clv,
    Cmp,
    Cpx,
    Cpy,
    Dec,
    Dex,
    Dey,
    Eor,
    Inc,
    Inx,
    Iny,
    Jmp,
    Jsr,
    Lda,
    Ldx,
    Ldy,
    Lsr,
    Nop,
    Ora,
    Pha,
    Php,
    Phx,
    Phy,
    Pla,
    Plp,
    Plx,
    Ply,
    Rmb,
    Rol,
    Ror,
    Rti,
    Rts,
    Sbc,
    Sec,
    Sed,
    Sei,
    Smb,
    Sta,
    Stp,
    Stx,
    Sty,
    Stz,
    Tax,
    Tay,
    Trb,
    Tsb,
    Tsx,
    Txa,
    Txs,
    Tya,
    Wai,
}

/// Operand addressing modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressingMode {
    /// No operand.
    Implied,
    /// Operates on the accumulator.
    Accumulator,
    /// `#nn`
    Immediate,
    /// `nn`
    ZeroPage,
    /// `nn,X` (wraps within page zero)
    ZeroPageX,
    /// `nn,Y` (wraps within page zero)
    ZeroPageY,
    /// `nnnn`
    Absolute,
    /// `nnnn,X`
    AbsoluteX,
    /// `nnnn,Y`
    AbsoluteY,
    /// `(nnnn)`, `JMP` only.
    Indirect,
    /// `(nnnn,X)`, `JMP` only.
    AbsoluteIndexedIndirect,
    /// `(nn)`
    ZeroPageIndirect,
    /// `(nn,X)`
    ZeroPageXIndirect,
    /// `(nn),Y`
    ZeroPageIndirectY,
    /// Signed 8-bit branch offset.
    Relative,
    /// `nn,rel` for `BBR`/`BBS`.
    ZeroPageRelative,
}

impl AddressingMode {
    /// Number of operand bytes following the opcode.
    #[must_use]
    pub const fn operand_len(self) -> u16 {
        match self {
            Self::Implied | Self::Accumulator => 0,
            Self::Immediate
            | Self::ZeroPage
            | Self::ZeroPageX
            | Self::ZeroPageY
            | Self::ZeroPageIndirect
            | Self::ZeroPageXIndirect
            | Self::ZeroPageIndirectY
            | Self::Relative => 1,
            Self::Absolute
            | Self::AbsoluteX
            | Self::AbsoluteY
            | Self::Indirect
            | Self::AbsoluteIndexedIndirect
            | Self::ZeroPageRelative => 2,
        }
    }
}

/// Handler family responsible for executing a mnemonic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum HandlerCategory {
    Arithmetic,
    Branch,
    Compare,
    Flags,
    IncDec,
    Interrupts,
    Jump,
    Load,
    Logical,
    Shift,
    Stack,
    Store,
    Transfer,
    Nop,
    Stop,
}

impl Mnemonic {
    /// Returns the handler family for this operation.
    #[must_use]
    pub const fn category(self) -> HandlerCategory {
        match self {
            Self::Adc | Self::Sbc => HandlerCategory::Arithmetic,
            Self::Bcc
            | Self::Bcs
            | Self::Beq
            | Self::Bmi
            | Self::Bne
            | Self::Bpl
            | Self::Bra
            | Self::Bvc
            | Self::Bvs
            | Self::Bbr
            | Self::Bbs => HandlerCategory::Branch,
            Self::Cmp | Self::Cpx | Self::Cpy => HandlerCategory::Compare,
            Self::Clc | Self::Cld | Self::Cli | Self::Clv | Self::Sec | Self::Sed | Self::Sei => {
                HandlerCategory::Flags
            }
            Self::Inc | Self::Dec | Self::Inx | Self::Iny | Self::Dex | Self::Dey => {
                HandlerCategory::IncDec
            }
            Self::Brk | Self::Rti | Self::Wai => HandlerCategory::Interrupts,
            Self::Jmp | Self::Jsr | Self::Rts => HandlerCategory::Jump,
            Self::Lda | Self::Ldx | Self::Ldy => HandlerCategory::Load,
            Self::And
            | Self::Ora
            | Self::Eor
            | Self::Bit
            | Self::Trb
            | Self::Tsb
            | Self::Rmb
            | Self::Smb => HandlerCategory::Logical,
            Self::Asl | Self::Lsr | Self::Rol | Self::Ror => HandlerCategory::Shift,
            Self::Pha
            | Self::Php
            | Self::Phx
            | Self::Phy
            | Self::Pla
            | Self::Plp
            | Self::Plx
            | Self::Ply => HandlerCategory::Stack,
            Self::Sta | Self::Stx | Self::Sty | Self::Stz => HandlerCategory::Store,
            Self::Tax | Self::Tay | Self::Tsx | Self::Txa | Self::Txs | Self::Tya => {
                HandlerCategory::Transfer
            }
            Self::Nop => HandlerCategory::Nop,
            Self::Stp => HandlerCategory::Stop,
        }
    }
}

/// Decoded form of one opcode byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instruction {
    /// A documented 65C02 instruction.
    Defined {
        /// Operation.
        mnemonic: Mnemonic,
        /// Operand addressing.
        mode: AddressingMode,
    },
    /// Unassigned opcode; behaves as a one-byte `NOP`.
    Undefined,
}

impl Instruction {
    /// Encoded length in bytes, opcode included.
    #[must_use]
    pub const fn encoded_len(self) -> u16 {
        match self {
            // BRK skips a signature byte.
            Self::Defined {
                mnemonic: Mnemonic::Brk,
                ..
            } => 2,
            Self::Defined { mode, .. } => 1 + mode.operand_len(),
            Self::Undefined => 1,
        }
    }

    /// Returns the mnemonic, or `None` for undefined opcodes.
    #[must_use]
    pub const fn mnemonic(self) -> Option<Mnemonic> {
        match self {
            Self::Defined { mnemonic, .. } => Some(mnemonic),
            Self::Undefined => None,
        }
    }
}

use AddressingMode as M;
use Mnemonic as I;

/// Single source of truth for the defined instruction set.
///
/// Any opcode byte not listed here decodes to [`Instruction::Undefined`].
pub const OPCODE_TABLE: &[(u8, Mnemonic, AddressingMode)] = &[
    (0x00, I::Brk, M::Implied),
    (0x01, I::Ora, M::ZeroPageXIndirect),
    (0x04, I::Tsb, M::ZeroPage),
    (0x05, I::Ora, M::ZeroPage),
    (0x06, I::Asl, M::ZeroPage),
    (0x07, I::Rmb, M::ZeroPage),
    (0x08, I::Php, M::Implied),
    (0x09, I::Ora, M::Immediate),
    (0x0A, I::Asl, M::Accumulator),
    (0x0C, I::Tsb, M::Absolute),
    (0x0D, I::Ora, M::Absolute),
    (0x0E, I::Asl, M::Absolute),
    (0x0F, I::Bbr, M::ZeroPageRelative),
    (0x10, I::Bpl, M::Relative),
    (0x11, I::Ora, M::ZeroPageIndirectY),
    (0x12, I::Ora, M::ZeroPageIndirect),
    (0x14, I::Trb, M::ZeroPage),
    (0x15, I::Ora, M::ZeroPageX),
    (0x16, I::Asl, M::ZeroPageX),
    (0x17, I::Rmb, M::ZeroPage),
    (0x18, I::Clc, M::Implied),
    (0x19, I::Ora, M::AbsoluteY),
    (0x1A, I::Inc, M::Accumulator),
    (0x1C, I::Trb, M::Absolute),
    (0x1D, I::Ora, M::AbsoluteX),
    (0x1E, I::Asl, M::AbsoluteX),
    (0x1F, I::Bbr, M::ZeroPageRelative),
    (0x20, I::Jsr, M::Absolute),
    (0x21, I::And, M::ZeroPageXIndirect),
    (0x24, I::Bit, M::ZeroPage),
    (0x25, I::And, M::ZeroPage),
    (0x26, I::Rol, M::ZeroPage),
    (0x27, I::Rmb, M::ZeroPage),
    (0x28, I::Plp, M::Implied),
    (0x29, I::And, M::Immediate),
    (0x2A, I::Rol, M::Accumulator),
    (0x2C, I::Bit, M::Absolute),
    (0x2D, I::And, M::Absolute),
    (0x2E, I::Rol, M::Absolute),
    (0x2F, I::Bbr, M::ZeroPageRelative),
    (0x30, I::Bmi, M::Relative),
    (0x31, I::And, M::ZeroPageIndirectY),
    (0x32, I::And, M::ZeroPageIndirect),
    (0x34, I::Bit, M::ZeroPageX),
    (0x35, I::And, M::ZeroPageX),
    (0x36, I::Rol, M::ZeroPageX),
    (0x37, I::Rmb, M::ZeroPage),
    (0x38, I::Sec, M::Implied),
    (0x39, I::And, M::AbsoluteY),
    (0x3A, I::Dec, M::Accumulator),
    (0x3C, I::Bit, M::AbsoluteX),
    (0x3D, I::And, M::AbsoluteX),
    (0x3E, I::Rol, M::AbsoluteX),
    (0x3F, I::Bbr, M::ZeroPageRelative),
    (0x40, I::Rti, M::Implied),
    (0x41, I::Eor, M::ZeroPageXIndirect),
    (0x45, I::Eor, M::ZeroPage),
    (0x46, I::Lsr, M::ZeroPage),
    (0x47, I::Rmb, M::ZeroPage),
    (0x48, I::Pha, M::Implied),
    (0x49, I::Eor, M::Immediate),
    (0x4A, I::Lsr, M::Accumulator),
    (0x4C, I::Jmp, M::Absolute),
    (0x4D, I::Eor, M::Absolute),
    (0x4E, I::Lsr, M::Absolute),
    (0x4F, I::Bbr, M::ZeroPageRelative),
    (0x50, I::Bvc, M::Relative),
    (0x51, I::Eor, M::ZeroPageIndirectY),
    (0x52, I::Eor, M::ZeroPageIndirect),
    (0x55, I::Eor, M::ZeroPageX),
    (0x56, I::Lsr, M::ZeroPageX),
    (0x57, I::Rmb, M::ZeroPage),
    (0x58, I::Cli, M::Implied),
    (0x59, I::Eor, M::AbsoluteY),
    (0x5A, I::Phy, M::Implied),
    (0x5D, I::Eor, M::AbsoluteX),
    (0x5E, I::Lsr, M::AbsoluteX),
    (0x5F, I::Bbr, M::ZeroPageRelative),
    (0x60, I::Rts, M::Implied),
    (0x61, I::Adc, M::ZeroPageXIndirect),
    (0x64, I::Stz, M::ZeroPage),
    (0x65, I::Adc, M::ZeroPage),
    (0x66, I::Ror, M::ZeroPage),
    (0x67, I::Rmb, M::ZeroPage),
    (0x68, I::Pla, M::Implied),
    (0x69, I::Adc, M::Immediate),
    (0x6A, I::Ror, M::Accumulator),
    (0x6C, I::Jmp, M::Indirect),
    (0x6D, I::Adc, M::Absolute),
    (0x6E, I::Ror, M::Absolute),
    (0x6F, I::Bbr, M::ZeroPageRelative),
    (0x70, I::Bvs, M::Relative),
    (0x71, I::Adc, M::ZeroPageIndirectY),
    (0x72, I::Adc, M::ZeroPageIndirect),
    (0x74, I::Stz, M::ZeroPageX),
    (0x75, I::Adc, M::ZeroPageX),
    (0x76, I::Ror, M::ZeroPageX),
    (0x77, I::Rmb, M::ZeroPage),
    (0x78, I::Sei, M::Implied),
    (0x79, I::Adc, M::AbsoluteY),
    (0x7A, I::Ply, M::Implied),
    (0x7C, I::Jmp, M::AbsoluteIndexedIndirect),
    (0x7D, I::Adc, M::AbsoluteX),
    (0x7E, I::Ror, M::AbsoluteX),
    (0x7F, I::Bbr, M::ZeroPageRelative),
    (0x80, I::Bra, M::Relative),
    (0x81, I::Sta, M::ZeroPageXIndirect),
    (0x84, I::Sty, M::ZeroPage),
    (0x85, I::Sta, M::ZeroPage),
    (0x86, I::Stx, M::ZeroPage),
    (0x87, I::Smb, M::ZeroPage),
    (0x88, I::Dey, M::Implied),
    (0x89, I::Bit, M::Immediate),
    (0x8A, I::Txa, M::Implied),
    (0x8C, I::Sty, M::Absolute),
    (0x8D, I::Sta, M::Absolute),
    (0x8E, I::Stx, M::Absolute),
    (0x8F, I::Bbs, M::ZeroPageRelative),
    (0x90, I::Bcc, M::Relative),
    (0x91, I::Sta, M::ZeroPageIndirectY),
    (0x92, I::Sta, M::ZeroPageIndirect),
    (0x94, I::Sty, M::ZeroPageX),
    (0x95, I::Sta, M::ZeroPageX),
    (0x96, I::Stx, M::ZeroPageY),
    (0x97, I::Smb, M::ZeroPage),
    (0x98, I::Tya, M::Implied),
    (0x99, I::Sta, M::AbsoluteY),
    (0x9A, I::Txs, M::Implied),
    (0x9C, I::Stz, M::Absolute),
    (0x9D, I::Sta, M::AbsoluteX),
    (0x9E, I::Stz, M::AbsoluteX),
    (0x9F, I::Bbs, M::ZeroPageRelative),
    (0xA0, I::Ldy, M::Immediate),
    (0xA1, I::Lda, M::ZeroPageXIndirect),
    (0xA2, I::Ldx, M::Immediate),
    (0xA4, I::Ldy, M::ZeroPage),
    (0xA5, I::Lda, M::ZeroPage),
    (0xA6, I::Ldx, M::ZeroPage),
    (0xA7, I::Smb, M::ZeroPage),
    (0xA8, I::Tay, M::Implied),
    (0xA9, I::Lda, M::Immediate),
    (0xAA, I::Tax, M::Implied),
    (0xAC, I::Ldy, M::Absolute),
    (0xAD, I::Lda, M::Absolute),
    (0xAE, I::Ldx, M::Absolute),
    (0xAF, I::Bbs, M::ZeroPageRelative),
    (0xB0, I::Bcs, M::Relative),
    (0xB1, I::Lda, M::ZeroPageIndirectY),
    (0xB2, I::Lda, M::ZeroPageIndirect),
    (0xB4, I::Ldy, M::ZeroPageX),
    (0xB5, I::Lda, M::ZeroPageX),
    (0xB6, I::Ldx, M::ZeroPageY),
    (0xB7, I::Smb, M::ZeroPage),
    (0xB8, I::Clv, M::Implied),
    (0xB9, I::Lda, M::AbsoluteY),
    (0xBA, I::Tsx, M::Implied),
    (0xBC, I::Ldy, M::AbsoluteX),
    (0xBD, I::Lda, M::AbsoluteX),
    (0xBE, I::Ldx, M::AbsoluteY),
    (0xBF, I::Bbs, M::ZeroPageRelative),
    (0xC0, I::Cpy, M::Immediate),
    (0xC1, I::Cmp, M::ZeroPageXIndirect),
    (0xC4, I::Cpy, M::ZeroPage),
    (0xC5, I::Cmp, M::ZeroPage),
    (0xC6, I::Dec, M::ZeroPage),
    (0xC7, I::Smb, M::ZeroPage),
    (0xC8, I::Iny, M::Implied),
    (0xC9, I::Cmp, M::Immediate),
    (0xCA, I::Dex, M::Implied),
    (0xCB, I::Wai, M::Implied),
    (0xCC, I::Cpy, M::Absolute),
    (0xCD, I::Cmp, M::Absolute),
    (0xCE, I::Dec, M::Absolute),
    (0xCF, I::Bbs, M::ZeroPageRelative),
    (0xD0, I::Bne, M::Relative),
    (0xD1, I::Cmp, M::ZeroPageIndirectY),
    (0xD2, I::Cmp, M::ZeroPageIndirect),
    (0xD5, I::Cmp, M::ZeroPageX),
    (0xD6, I::Dec, M::ZeroPageX),
    (0xD7, I::Smb, M::ZeroPage),
    (0xD8, I::Cld, M::Implied),
    (0xD9, I::Cmp, M::AbsoluteY),
    (0xDA, I::Phx, M::Implied),
    (0xDB, I::Stp, M::Implied),
    (0xDD, I::Cmp, M::AbsoluteX),
    (0xDE, I::Dec, M::AbsoluteX),
    (0xDF, I::Bbs, M::ZeroPageRelative),
    (0xE0, I::Cpx, M::Immediate),
    (0xE1, I::Sbc, M::ZeroPageXIndirect),
    (0xE4, I::Cpx, M::ZeroPage),
    (0xE5, I::Sbc, M::ZeroPage),
    (0xE6, I::Inc, M::ZeroPage),
    (0xE7, I::Smb, M::ZeroPage),
    (0xE8, I::Inx, M::Implied),
    (0xE9, I::Sbc, M::Immediate),
    (0xEA, I::Nop, M::Implied),
    (0xEC, I::Cpx, M::Absolute),
    (0xED, I::Sbc, M::Absolute),
    (0xEE, I::Inc, M::Absolute),
    (0xEF, I::Bbs, M::ZeroPageRelative),
    (0xF0, I::Beq, M::Relative),
    (0xF1, I::Sbc, M::ZeroPageIndirectY),
    (0xF2, I::Sbc, M::ZeroPageIndirect),
    (0xF5, I::Sbc, M::ZeroPageX),
    (0xF6, I::Inc, M::ZeroPageX),
    (0xF7, I::Smb, M::ZeroPage),
    (0xF8, I::Sed, M::Implied),
    (0xF9, I::Sbc, M::AbsoluteY),
    (0xFA, I::Plx, M::Implied),
    (0xFD, I::Sbc, M::AbsoluteX),
    (0xFE, I::Inc, M::AbsoluteX),
    (0xFF, I::Bbs, M::ZeroPageRelative),
];

/// Number of defined opcodes in the WDC 65C02 instruction set.
pub const DEFINED_OPCODE_COUNT: usize = 212;

const DECODE_TABLE: [Instruction; 256] = build_decode_table();

const fn build_decode_table() -> [Instruction; 256] {
    assert!(
        OPCODE_TABLE.len() == DEFINED_OPCODE_COUNT,
        "opcode table must list every defined opcode"
    );

    let mut table = [Instruction::Undefined; 256];
    let mut index = 0;
    while index < OPCODE_TABLE.len() {
        let (opcode, mnemonic, mode) = OPCODE_TABLE[index];
        assert!(
            matches!(table[opcode as usize], Instruction::Undefined),
            "opcode listed twice"
        );
        table[opcode as usize] = Instruction::Defined { mnemonic, mode };
        index += 1;
    }
    table
}

/// Decodes one opcode byte. Total over all inputs.
#[must_use]
pub const fn decode(opcode: u8) -> Instruction {
    DECODE_TABLE[opcode as usize]
}

/// Bit number encoded in `RMB`/`SMB`/`BBR`/`BBS` opcodes.
#[must_use]
pub const fn bit_index(opcode: u8) -> u8 {
    (opcode >> 4) & 0x07
}
