//! The CPU-side memory bus. Every access made on behalf of an instruction or
//! the interrupt sequence goes through here and produces one trace record.

use crate::memory::stack_address;
use crate::trace::{AccessKind, BusAccess, TraceSink};
use crate::{EmuFlags, MachineState};

/// Reads one byte and reports the access to `trace`.
pub fn read_byte(state: &MachineState, trace: &mut dyn TraceSink, addr: u16) -> u8 {
    let value = state.memory[usize::from(addr)];
    trace.on_access(BusAccess {
        addr,
        value,
        kind: AccessKind::Read,
    });
    value
}

/// Writes one byte, reports the access to `trace` and marks memory dirty.
///
/// Returns the value written.
pub fn write_byte(state: &mut MachineState, trace: &mut dyn TraceSink, addr: u16, value: u8) -> u8 {
    trace.on_access(BusAccess {
        addr,
        value,
        kind: AccessKind::Write,
    });
    state.memory[usize::from(addr)] = value;
    state.emu_flags.insert(EmuFlags::DIRTY);
    value
}

/// Pushes onto the page-one stack: write at `sp`, then decrement.
/// The stack pointer wraps silently.
pub fn push_byte(state: &mut MachineState, trace: &mut dyn TraceSink, value: u8) {
    let sp = state.regs.sp();
    write_byte(state, trace, stack_address(sp), value);
    state.regs.set_sp(sp.wrapping_sub(1));
}

/// Pulls from the page-one stack: increment, then read at `sp`.
pub fn pull_byte(state: &mut MachineState, trace: &mut dyn TraceSink) -> u8 {
    let sp = state.regs.sp().wrapping_add(1);
    state.regs.set_sp(sp);
    read_byte(state, trace, stack_address(sp))
}
