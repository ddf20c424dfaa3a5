#![no_main]

use libfuzzer_sys::fuzz_target;
use w65c02_core::{
    load_image, run_bounded, BusAccess, MachineState, IoDevice, StatusFlags,
};

const MAX_STEPS: u64 = 4_096;

/// Wakes `WAI` immediately so every input terminates.
struct WakeOnWait;

impl IoDevice for WakeOnWait {
    fn handle(&mut self, state: &mut MachineState) {
        if state.is_waiting_for_interrupt() {
            state.request_interrupt();
        }
    }
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }

    let pc = u16::from_le_bytes([data[0], data[1]]);
    let status = StatusFlags::from_bits_retain(data[2]);
    let sp = data[3];

    let mut state = MachineState::with_pc(pc);
    state.regs.set_status(status);
    state.regs.set_sp(sp);
    if load_image(&mut state, &data[4..], pc).is_err() {
        return;
    }

    let mut trace: Vec<BusAccess> = Vec::new();
    let outcome = run_bounded(&mut state, &mut WakeOnWait, &mut trace, MAX_STEPS);
    assert!(outcome.instructions <= MAX_STEPS);
    assert!(!trace.is_empty());
});
