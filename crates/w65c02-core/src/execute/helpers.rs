//! Operand resolution shared by the handler families.

use super::context::ExecContext;
use crate::decoder::AddressingMode;

/// Where an instruction's data operand lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// The accumulator.
    Accumulator,
    /// An immediate byte already consumed from the instruction stream.
    Immediate(u8),
    /// A memory location.
    Memory(u16),
}

/// Consumes operand bytes for `mode` and locates the data operand.
///
/// `Implied`, `Relative` and `ZeroPageRelative` carry no data operand and
/// resolve to the accumulator; their handlers never call this.
pub fn resolve_operand(ctx: &mut ExecContext<'_>, mode: AddressingMode) -> Operand {
    match mode {
        AddressingMode::Implied
        | AddressingMode::Accumulator
        | AddressingMode::Relative
        | AddressingMode::ZeroPageRelative => Operand::Accumulator,
        AddressingMode::Immediate => Operand::Immediate(ctx.next_byte()),
        _ => Operand::Memory(effective_address(ctx, mode)),
    }
}

/// Consumes operand bytes and computes the effective address for a memory
/// addressing mode. Pointer fetches are traced bus reads.
pub fn effective_address(ctx: &mut ExecContext<'_>, mode: AddressingMode) -> u16 {
    match mode {
        AddressingMode::ZeroPage => u16::from(ctx.next_byte()),
        AddressingMode::ZeroPageX => {
            let base = ctx.next_byte();
            u16::from(base.wrapping_add(ctx.regs().x()))
        }
        AddressingMode::ZeroPageY => {
            let base = ctx.next_byte();
            u16::from(base.wrapping_add(ctx.regs().y()))
        }
        AddressingMode::Absolute => ctx.next_word(),
        AddressingMode::AbsoluteX => {
            let base = ctx.next_word();
            base.wrapping_add(u16::from(ctx.regs().x()))
        }
        AddressingMode::AbsoluteY => {
            let base = ctx.next_word();
            base.wrapping_add(u16::from(ctx.regs().y()))
        }
        AddressingMode::Indirect => {
            let ptr = ctx.next_word();
            ctx.read_word(ptr)
        }
        AddressingMode::AbsoluteIndexedIndirect => {
            let ptr = ctx.next_word().wrapping_add(u16::from(ctx.regs().x()));
            ctx.read_word(ptr)
        }
        AddressingMode::ZeroPageIndirect => {
            let ptr = ctx.next_byte();
            ctx.read_zero_page_word(ptr)
        }
        AddressingMode::ZeroPageXIndirect => {
            let ptr = ctx.next_byte().wrapping_add(ctx.regs().x());
            ctx.read_zero_page_word(ptr)
        }
        AddressingMode::ZeroPageIndirectY => {
            let ptr = ctx.next_byte();
            let base = ctx.read_zero_page_word(ptr);
            base.wrapping_add(u16::from(ctx.regs().y()))
        }
        AddressingMode::Implied
        | AddressingMode::Accumulator
        | AddressingMode::Immediate
        | AddressingMode::Relative
        | AddressingMode::ZeroPageRelative => {
            debug_assert!(false, "{mode:?} has no effective address");
            0
        }
    }
}

/// Reads the value of a resolved operand.
pub fn load(ctx: &mut ExecContext<'_>, operand: Operand) -> u8 {
    match operand {
        Operand::Accumulator => ctx.regs().a(),
        Operand::Immediate(value) => value,
        Operand::Memory(addr) => ctx.read(addr),
    }
}

/// Writes back to a resolved operand. Immediate operands are read-only and
/// are never the target of a store.
pub fn store(ctx: &mut ExecContext<'_>, operand: Operand, value: u8) {
    match operand {
        Operand::Accumulator => ctx.regs_mut().set_a(value),
        Operand::Immediate(_) => debug_assert!(false, "store to immediate operand"),
        Operand::Memory(addr) => {
            ctx.write(addr, value);
        }
    }
}

/// Read-modify-write helper for shifts, inc/dec and bit set/reset.
pub fn modify(
    ctx: &mut ExecContext<'_>,
    mode: AddressingMode,
    op: impl FnOnce(&mut ExecContext<'_>, u8) -> u8,
) {
    let operand = resolve_operand(ctx, mode);
    let value = load(ctx, operand);
    let result = op(ctx, value);
    store(ctx, operand, result);
}
