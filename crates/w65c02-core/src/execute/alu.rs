//! Arithmetic, compare, logical, shift and increment/decrement handlers.

use super::context::ExecContext;
use super::helpers::{load, modify, resolve_operand, Operand};
use crate::decoder::{bit_index, AddressingMode, Mnemonic};
use crate::StatusFlags;

pub(super) fn arithmetic(ctx: &mut ExecContext<'_>, mnemonic: Mnemonic, mode: AddressingMode) {
    let operand = resolve_operand(ctx, mode);
    let value = load(ctx, operand);
    let regs = ctx.regs_mut();
    let a = regs.a();
    let carry = regs.flag_is_set(StatusFlags::CARRY);
    let decimal = regs.flag_is_set(StatusFlags::DECIMAL);

    let sum = match (mnemonic, decimal) {
        (Mnemonic::Adc, false) => add_binary(a, value, carry),
        (Mnemonic::Adc, true) => add_decimal(a, value, carry),
        (_, false) => add_binary(a, !value, carry),
        (_, true) => subtract_decimal(a, value, carry),
    };

    regs.set_a(sum.result);
    regs.set_nz(sum.result);
    regs.set_flag(StatusFlags::CARRY, sum.carry);
    regs.set_flag(StatusFlags::OVERFLOW, sum.overflow);
}

/// Result of an `ADC`/`SBC` before it is committed to the register file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Sum {
    result: u8,
    carry: bool,
    overflow: bool,
}

fn add_binary(a: u8, b: u8, carry: bool) -> Sum {
    let wide = u16::from(a) + u16::from(b) + u16::from(carry);
    let [result, high] = wide.to_le_bytes();
    Sum {
        result,
        carry: high != 0,
        overflow: (!(a ^ b) & (a ^ result) & 0x80) != 0,
    }
}

// Nibble-wise BCD add. N/Z come from the corrected result; V from the
// signed high-nibble sum before the final adjust.
#[allow(clippy::cast_possible_wrap)]
fn add_decimal(a: u8, b: u8, carry: bool) -> Sum {
    let mut low = (a & 0x0F) + (b & 0x0F) + u8::from(carry);
    if low >= 0x0A {
        low = ((low + 0x06) & 0x0F) + 0x10;
    }

    let signed = i16::from((a & 0xF0) as i8) + i16::from((b & 0xF0) as i8) + i16::from(low);
    let mut wide = u16::from(a & 0xF0) + u16::from(b & 0xF0) + u16::from(low);
    if wide >= 0xA0 {
        wide += 0x60;
    }

    Sum {
        result: wide.to_le_bytes()[0],
        carry: wide >= 0x100,
        overflow: !(-128..=127).contains(&signed),
    }
}

// Carry and overflow match the binary subtraction.
fn subtract_decimal(a: u8, b: u8, carry: bool) -> Sum {
    let binary = add_binary(a, !b, carry);
    let borrow_in = i16::from(carry) - 1;

    let low = i16::from(a & 0x0F) - i16::from(b & 0x0F) + borrow_in;
    let mut wide = i16::from(a) - i16::from(b) + borrow_in;
    if wide < 0 {
        wide -= 0x60;
    }
    if low < 0 {
        wide -= 0x06;
    }

    Sum {
        result: wide.to_le_bytes()[0],
        ..binary
    }
}

pub(super) fn compare(ctx: &mut ExecContext<'_>, mnemonic: Mnemonic, mode: AddressingMode) {
    let operand = resolve_operand(ctx, mode);
    let value = load(ctx, operand);
    let regs = ctx.regs_mut();
    let register = match mnemonic {
        Mnemonic::Cpx => regs.x(),
        Mnemonic::Cpy => regs.y(),
        _ => regs.a(),
    };
    regs.set_nz(register.wrapping_sub(value));
    regs.set_flag(StatusFlags::CARRY, register >= value);
}

pub(super) fn logical(ctx: &mut ExecContext<'_>, mnemonic: Mnemonic, mode: AddressingMode) {
    match mnemonic {
        Mnemonic::Rmb | Mnemonic::Smb => {
            let mask = 1_u8 << bit_index(ctx.opcode());
            let set = mnemonic == Mnemonic::Smb;
            modify(ctx, mode, |_, value| {
                if set {
                    value | mask
                } else {
                    value & !mask
                }
            });
        }
        Mnemonic::Trb | Mnemonic::Tsb => {
            let set = mnemonic == Mnemonic::Tsb;
            modify(ctx, mode, |ctx, value| {
                let regs = ctx.regs_mut();
                let a = regs.a();
                regs.set_flag(StatusFlags::ZERO, a & value == 0);
                if set {
                    value | a
                } else {
                    value & !a
                }
            });
        }
        Mnemonic::Bit => {
            let operand = resolve_operand(ctx, mode);
            let value = load(ctx, operand);
            let regs = ctx.regs_mut();
            regs.set_flag(StatusFlags::ZERO, regs.a() & value == 0);
            // The immediate form only reports Z.
            if !matches!(operand, Operand::Immediate(_)) {
                regs.set_flag(StatusFlags::NEGATIVE, value & 0x80 != 0);
                regs.set_flag(StatusFlags::OVERFLOW, value & 0x40 != 0);
            }
        }
        _ => {
            let operand = resolve_operand(ctx, mode);
            let value = load(ctx, operand);
            let regs = ctx.regs_mut();
            let result = match mnemonic {
                Mnemonic::And => regs.a() & value,
                Mnemonic::Ora => regs.a() | value,
                _ => regs.a() ^ value,
            };
            regs.set_a(result);
            regs.set_nz(result);
        }
    }
}

pub(super) fn shift(ctx: &mut ExecContext<'_>, mnemonic: Mnemonic, mode: AddressingMode) {
    modify(ctx, mode, |ctx, value| {
        let regs = ctx.regs_mut();
        let carry_in = u8::from(regs.flag_is_set(StatusFlags::CARRY));
        let (result, carry_out) = match mnemonic {
            Mnemonic::Asl => (value << 1, value & 0x80 != 0),
            Mnemonic::Lsr => (value >> 1, value & 0x01 != 0),
            Mnemonic::Rol => ((value << 1) | carry_in, value & 0x80 != 0),
            _ => ((value >> 1) | (carry_in << 7), value & 0x01 != 0),
        };
        regs.set_flag(StatusFlags::CARRY, carry_out);
        regs.set_nz(result);
        result
    });
}

pub(super) fn inc_dec(ctx: &mut ExecContext<'_>, mnemonic: Mnemonic, mode: AddressingMode) {
    let regs = ctx.regs_mut();
    match mnemonic {
        Mnemonic::Inx => {
            let x = regs.x().wrapping_add(1);
            regs.set_x(x);
            regs.set_nz(x);
        }
        Mnemonic::Dex => {
            let x = regs.x().wrapping_sub(1);
            regs.set_x(x);
            regs.set_nz(x);
        }
        Mnemonic::Iny => {
            let y = regs.y().wrapping_add(1);
            regs.set_y(y);
            regs.set_nz(y);
        }
        Mnemonic::Dey => {
            let y = regs.y().wrapping_sub(1);
            regs.set_y(y);
            regs.set_nz(y);
        }
        _ => {
            let increment = mnemonic == Mnemonic::Inc;
            modify(ctx, mode, |ctx, value| {
                let result = if increment {
                    value.wrapping_add(1)
                } else {
                    value.wrapping_sub(1)
                };
                ctx.regs_mut().set_nz(result);
                result
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{add_binary, add_decimal, subtract_decimal, Sum};

    #[rstest]
    #[case(0x01, 0x01, false, 0x02, false, false)]
    #[case(0xFF, 0x01, false, 0x00, true, false)]
    #[case(0x7F, 0x01, false, 0x80, false, true)]
    #[case(0x80, 0xFF, false, 0x7F, true, true)]
    #[case(0x10, 0x20, true, 0x31, false, false)]
    fn binary_add(
        #[case] a: u8,
        #[case] b: u8,
        #[case] carry: bool,
        #[case] result: u8,
        #[case] carry_out: bool,
        #[case] overflow: bool,
    ) {
        assert_eq!(
            add_binary(a, b, carry),
            Sum {
                result,
                carry: carry_out,
                overflow
            }
        );
    }

    #[rstest]
    #[case(0x09, 0x01, false, 0x10, false)]
    #[case(0x99, 0x01, false, 0x00, true)]
    #[case(0x58, 0x46, true, 0x05, true)]
    #[case(0x12, 0x34, false, 0x46, false)]
    #[case(0x50, 0x50, false, 0x00, true)]
    fn decimal_add(
        #[case] a: u8,
        #[case] b: u8,
        #[case] carry: bool,
        #[case] result: u8,
        #[case] carry_out: bool,
    ) {
        let sum = add_decimal(a, b, carry);
        assert_eq!((sum.result, sum.carry), (result, carry_out));
    }

    #[rstest]
    #[case(0x46, 0x12, true, 0x34, true)]
    #[case(0x40, 0x13, true, 0x27, true)]
    #[case(0x00, 0x01, true, 0x99, false)]
    #[case(0x32, 0x02, false, 0x29, true)]
    fn decimal_subtract(
        #[case] a: u8,
        #[case] b: u8,
        #[case] carry: bool,
        #[case] result: u8,
        #[case] carry_out: bool,
    ) {
        let difference = subtract_decimal(a, b, carry);
        assert_eq!((difference.result, difference.carry), (result, carry_out));
    }
}
