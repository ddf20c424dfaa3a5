//! Device contract and the per-instruction I/O synchronization step.

use crate::{EmuFlags, MachineState};

/// External device emulation driven by the dispatch loop.
///
/// Devices see memory directly through [`MachineState::memory`]; their
/// accesses are not CPU bus cycles and are never traced. A device requests
/// service by calling [`MachineState::request_interrupt`].
pub trait IoDevice {
    /// Called once before the first instruction is fetched.
    fn init(&mut self) {}

    /// Called once per retired instruction and once per wait-state poll.
    fn handle(&mut self, state: &mut MachineState);

    /// Called once after `STP` retires.
    fn finish(&mut self) {}
}

/// Device that never reacts to anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullDevice;

impl IoDevice for NullDevice {
    fn handle(&mut self, _state: &mut MachineState) {}
}

/// Runs the device step for one retired instruction.
///
/// `DIRTY` is cleared right after every device invocation. When the
/// instruction put the CPU to sleep, the device is polled in a busy loop
/// until it asserts the interrupt line; no instruction is fetched meanwhile.
pub fn synchronize(state: &mut MachineState, device: &mut dyn IoDevice) {
    device.handle(state);
    state.emu_flags.remove(EmuFlags::DIRTY);

    if !state.is_waiting_for_interrupt() {
        return;
    }

    let mut polls: u64 = 0;
    while !state.interrupt_pending {
        device.handle(state);
        state.emu_flags.remove(EmuFlags::DIRTY);
        polls += 1;
    }
    tracing::debug!(polls, "leaving wait state");
}

#[cfg(test)]
mod tests {
    use super::{synchronize, IoDevice, NullDevice};
    use crate::{EmuFlags, MachineState};

    /// Records the dirty flag seen on each call and asserts the interrupt
    /// line after `fire_after` calls.
    struct Probe {
        seen_dirty: Vec<bool>,
        fire_after: usize,
    }

    impl IoDevice for Probe {
        fn handle(&mut self, state: &mut MachineState) {
            self.seen_dirty.push(state.is_dirty());
            state.emu_flags.insert(EmuFlags::DIRTY);
            if self.seen_dirty.len() >= self.fire_after {
                state.request_interrupt();
            }
        }
    }

    #[test]
    fn single_pass_clears_dirty_after_device_sees_it() {
        let mut state = MachineState::default();
        state.emu_flags.insert(EmuFlags::DIRTY);
        let mut probe = Probe {
            seen_dirty: Vec::new(),
            fire_after: usize::MAX,
        };

        synchronize(&mut state, &mut probe);

        assert_eq!(probe.seen_dirty, vec![true]);
        assert!(!state.is_dirty());
    }

    #[test]
    fn wait_state_polls_until_interrupt_and_clears_dirty_each_time() {
        let mut state = MachineState::default();
        state.emu_flags.insert(EmuFlags::WAIT_FOR_INTERRUPT);
        let mut probe = Probe {
            seen_dirty: Vec::new(),
            fire_after: 4,
        };

        synchronize(&mut state, &mut probe);

        assert_eq!(probe.seen_dirty, vec![false; 4]);
        assert!(state.interrupt_pending);
        assert!(!state.is_dirty());
    }

    #[test]
    fn pending_interrupt_ends_wait_after_first_pass() {
        let mut state = MachineState::default();
        state.emu_flags.insert(EmuFlags::WAIT_FOR_INTERRUPT);
        state.request_interrupt();
        let mut probe = Probe {
            seen_dirty: Vec::new(),
            fire_after: usize::MAX,
        };

        synchronize(&mut state, &mut probe);

        assert_eq!(probe.seen_dirty.len(), 1);
    }

    #[test]
    fn null_device_leaves_memory_alone() {
        let mut state = MachineState::default();
        let before = state.clone();
        synchronize(&mut state, &mut NullDevice);
        assert_eq!(state, before);
    }
}
