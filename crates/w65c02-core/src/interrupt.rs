//! Maskable interrupt injection at instruction boundaries.
//!
//! There is a single request line and a single vector. The request is only
//! ever honored between instructions, after I/O synchronization.

use crate::memory::{push_byte, read_byte, IRQ_VECTOR};
use crate::trace::TraceSink;
use crate::{MachineState, StatusFlags};

/// Returns `true` when a pending request would be taken now.
#[must_use]
pub const fn irq_eligible(state: &MachineState) -> bool {
    state.interrupt_pending && !state.regs.flag_is_set(StatusFlags::IRQ_DISABLE)
}

/// Injects the pending interrupt if it is eligible.
///
/// Pushes `pc` high, `pc` low and the status byte as it stands, clears the
/// request, vectors through [`IRQ_VECTOR`] and masks further interrupts.
/// All stack and vector accesses go through the traced bus. Returns whether
/// the interrupt was taken.
pub fn service_pending_interrupt(state: &mut MachineState, trace: &mut dyn TraceSink) -> bool {
    if !irq_eligible(state) {
        return false;
    }

    let return_addr = state.regs.pc();
    let status = state.regs.status().bits();
    let [lo, hi] = return_addr.to_le_bytes();
    push_byte(state, trace, hi);
    push_byte(state, trace, lo);
    push_byte(state, trace, status);
    state.interrupt_pending = false;

    let target = u16::from_le_bytes([
        read_byte(state, trace, IRQ_VECTOR),
        read_byte(state, trace, IRQ_VECTOR.wrapping_add(1)),
    ]);
    state.regs.set_pc(target);
    state.regs.set_flag(StatusFlags::IRQ_DISABLE, true);

    tracing::debug!(from = return_addr, to = target, "interrupt taken");
    true
}

#[cfg(test)]
mod tests {
    use super::{irq_eligible, service_pending_interrupt};
    use crate::trace::{BusAccess, NullTrace};
    use crate::{MachineState, StatusFlags};

    fn armed_state() -> MachineState {
        let mut state = MachineState::with_pc(0x1234);
        state.memory[0xFFFE] = 0x00;
        state.memory[0xFFFF] = 0x80;
        state.regs.set_sp(0xFF);
        state.regs.set_flag(StatusFlags::IRQ_DISABLE, false);
        state
    }

    #[test]
    fn masked_or_idle_line_is_not_taken() {
        let mut state = armed_state();
        assert!(!irq_eligible(&state));
        assert!(!service_pending_interrupt(&mut state, &mut NullTrace));

        state.request_interrupt();
        state.regs.set_flag(StatusFlags::IRQ_DISABLE, true);
        assert!(!irq_eligible(&state));
        assert!(!service_pending_interrupt(&mut state, &mut NullTrace));
        assert!(state.interrupt_pending);
        assert_eq!(state.regs.pc(), 0x1234);
    }

    #[test]
    fn injection_pushes_return_state_and_vectors() {
        let mut state = armed_state();
        state.request_interrupt();
        let status_before = state.regs.status().bits();
        let mut trace: Vec<BusAccess> = Vec::new();

        assert!(service_pending_interrupt(&mut state, &mut trace));

        assert_eq!(state.regs.pc(), 0x8000);
        assert_eq!(state.regs.sp(), 0xFC);
        assert_eq!(state.memory[0x01FF], 0x12);
        assert_eq!(state.memory[0x01FE], 0x34);
        assert_eq!(state.memory[0x01FD], status_before);
        assert!(state.regs.flag_is_set(StatusFlags::IRQ_DISABLE));
        assert!(!state.interrupt_pending);

        let lines: Vec<String> = trace.iter().map(ToString::to_string).collect();
        assert_eq!(
            lines,
            vec![
                "01FF W 12".to_owned(),
                "01FE W 34".to_owned(),
                format!("01FD W {status_before:02X}"),
                "FFFE r 00".to_owned(),
                "FFFF r 80".to_owned(),
            ]
        );
    }
}
