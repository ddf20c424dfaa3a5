//! Branch, jump and software-interrupt handlers.

use super::context::ExecContext;
use super::helpers::effective_address;
use crate::decoder::{bit_index, AddressingMode, Mnemonic};
use crate::memory::IRQ_VECTOR;
use crate::{EmuFlags, StatusFlags};

const fn displacement(byte: u8) -> i8 {
    i8::from_ne_bytes([byte])
}

pub(super) fn branch(ctx: &mut ExecContext<'_>, mnemonic: Mnemonic) {
    if matches!(mnemonic, Mnemonic::Bbr | Mnemonic::Bbs) {
        let mask = 1_u8 << bit_index(ctx.opcode());
        let zero_page = ctx.next_byte();
        let value = ctx.read(u16::from(zero_page));
        let offset = displacement(ctx.next_byte());
        if (value & mask != 0) == (mnemonic == Mnemonic::Bbs) {
            ctx.branch(offset);
        }
        return;
    }

    let offset = displacement(ctx.next_byte());
    let regs = ctx.regs();
    let taken = match mnemonic {
        Mnemonic::Bcc => !regs.flag_is_set(StatusFlags::CARRY),
        Mnemonic::Bcs => regs.flag_is_set(StatusFlags::CARRY),
        Mnemonic::Bne => !regs.flag_is_set(StatusFlags::ZERO),
        Mnemonic::Beq => regs.flag_is_set(StatusFlags::ZERO),
        Mnemonic::Bpl => !regs.flag_is_set(StatusFlags::NEGATIVE),
        Mnemonic::Bmi => regs.flag_is_set(StatusFlags::NEGATIVE),
        Mnemonic::Bvc => !regs.flag_is_set(StatusFlags::OVERFLOW),
        Mnemonic::Bvs => regs.flag_is_set(StatusFlags::OVERFLOW),
        _ => true,
    };
    if taken {
        ctx.branch(offset);
    }
}

pub(super) fn jump(ctx: &mut ExecContext<'_>, mnemonic: Mnemonic, mode: AddressingMode) {
    match mnemonic {
        Mnemonic::Jsr => {
            let target = ctx.next_word();
            // Return address is the last byte of the JSR itself.
            let return_addr = ctx.cursor().next_address().wrapping_sub(1);
            ctx.push_word(return_addr);
            ctx.jump(target);
        }
        Mnemonic::Rts => {
            let return_addr = ctx.pull_word();
            ctx.jump(return_addr.wrapping_add(1));
        }
        _ => {
            let target = effective_address(ctx, mode);
            ctx.jump(target);
        }
    }
}

pub(super) fn interrupts(ctx: &mut ExecContext<'_>, mnemonic: Mnemonic) {
    match mnemonic {
        Mnemonic::Brk => {
            let return_addr = ctx.cursor().pc_at_fetch().wrapping_add(2);
            ctx.push_word(return_addr);
            let status = ctx.regs().status() | StatusFlags::BREAK | StatusFlags::UNUSED;
            ctx.push(status.bits());
            let regs = ctx.regs_mut();
            regs.set_flag(StatusFlags::IRQ_DISABLE, true);
            regs.set_flag(StatusFlags::DECIMAL, false);
            let target = ctx.read_word(IRQ_VECTOR);
            ctx.jump(target);
        }
        Mnemonic::Rti => {
            let status = ctx.pull();
            ctx.regs_mut()
                .set_status(StatusFlags::from_bits_retain(status));
            let return_addr = ctx.pull_word();
            ctx.jump(return_addr);
        }
        _ => {
            tracing::debug!(pc = ctx.cursor().pc_at_fetch(), "waiting for interrupt");
            ctx.state_mut()
                .emu_flags
                .insert(EmuFlags::WAIT_FOR_INTERRUPT);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::displacement;

    #[test]
    fn displacement_is_twos_complement() {
        assert_eq!(displacement(0x00), 0);
        assert_eq!(displacement(0x7F), 127);
        assert_eq!(displacement(0x80), -128);
        assert_eq!(displacement(0xFE), -2);
    }
}
