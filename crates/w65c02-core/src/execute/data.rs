//! Load, store, transfer, stack and flag handlers.

use super::context::ExecContext;
use super::helpers::{effective_address, load as load_operand, resolve_operand};
use crate::decoder::{AddressingMode, Mnemonic};
use crate::StatusFlags;

pub(super) fn load(ctx: &mut ExecContext<'_>, mnemonic: Mnemonic, mode: AddressingMode) {
    let operand = resolve_operand(ctx, mode);
    let value = load_operand(ctx, operand);
    let regs = ctx.regs_mut();
    match mnemonic {
        Mnemonic::Ldx => regs.set_x(value),
        Mnemonic::Ldy => regs.set_y(value),
        _ => regs.set_a(value),
    }
    regs.set_nz(value);
}

pub(super) fn store(ctx: &mut ExecContext<'_>, mnemonic: Mnemonic, mode: AddressingMode) {
    let addr = effective_address(ctx, mode);
    let regs = ctx.regs();
    let value = match mnemonic {
        Mnemonic::Stx => regs.x(),
        Mnemonic::Sty => regs.y(),
        Mnemonic::Stz => 0,
        _ => regs.a(),
    };
    ctx.write(addr, value);
}

pub(super) fn transfer(ctx: &mut ExecContext<'_>, mnemonic: Mnemonic) {
    let regs = ctx.regs_mut();
    let value = match mnemonic {
        Mnemonic::Tax => {
            regs.set_x(regs.a());
            regs.x()
        }
        Mnemonic::Tay => {
            regs.set_y(regs.a());
            regs.y()
        }
        Mnemonic::Tsx => {
            regs.set_x(regs.sp());
            regs.x()
        }
        Mnemonic::Txa => {
            regs.set_a(regs.x());
            regs.a()
        }
        Mnemonic::Tya => {
            regs.set_a(regs.y());
            regs.a()
        }
        _ => {
            // TXS leaves the flags alone.
            regs.set_sp(regs.x());
            return;
        }
    };
    regs.set_nz(value);
}

pub(super) fn stack(ctx: &mut ExecContext<'_>, mnemonic: Mnemonic) {
    let regs = *ctx.regs();
    match mnemonic {
        Mnemonic::Pha => ctx.push(regs.a()),
        Mnemonic::Phx => ctx.push(regs.x()),
        Mnemonic::Phy => ctx.push(regs.y()),
        Mnemonic::Php => {
            // B and bit 5 always read as set on the stack copy.
            let status = regs.status() | StatusFlags::BREAK | StatusFlags::UNUSED;
            ctx.push(status.bits());
        }
        Mnemonic::Plp => {
            let status = ctx.pull();
            ctx.regs_mut()
                .set_status(StatusFlags::from_bits_retain(status));
        }
        _ => {
            let value = ctx.pull();
            let regs = ctx.regs_mut();
            match mnemonic {
                Mnemonic::Plx => regs.set_x(value),
                Mnemonic::Ply => regs.set_y(value),
                _ => regs.set_a(value),
            }
            regs.set_nz(value);
        }
    }
}

pub(super) fn flags(ctx: &mut ExecContext<'_>, mnemonic: Mnemonic) {
    let (flag, enabled) = match mnemonic {
        Mnemonic::Clc => (StatusFlags::CARRY, false),
        Mnemonic::Sec => (StatusFlags::CARRY, true),
        Mnemonic::Cli => (StatusFlags::IRQ_DISABLE, false),
        Mnemonic::Sei => (StatusFlags::IRQ_DISABLE, true),
        Mnemonic::Cld => (StatusFlags::DECIMAL, false),
        Mnemonic::Sed => (StatusFlags::DECIMAL, true),
        _ => (StatusFlags::OVERFLOW, false),
    };
    ctx.regs_mut().set_flag(flag, enabled);
}
