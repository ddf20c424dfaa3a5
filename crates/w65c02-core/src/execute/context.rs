//! Handler-facing view of the machine for the instruction in flight.

use crate::cursor::InstructionCursor;
use crate::memory::{pull_byte, push_byte, read_byte, write_byte};
use crate::trace::TraceSink;
use crate::{MachineState, Registers};

/// Exclusive access to the machine granted to one instruction handler.
///
/// All memory traffic goes through the traced bus. Operand bytes are
/// streamed through the cursor so `pc` stays untouched unless the handler
/// performs an explicit jump.
pub struct ExecContext<'a> {
    state: &'a mut MachineState,
    trace: &'a mut dyn TraceSink,
    cursor: InstructionCursor,
}

impl<'a> ExecContext<'a> {
    /// Opens a context for the instruction starting at the current `pc`.
    pub const fn new(state: &'a mut MachineState, trace: &'a mut dyn TraceSink) -> Self {
        let cursor = InstructionCursor::new(state.regs.pc());
        Self {
            state,
            trace,
            cursor,
        }
    }

    /// Closes the context and hands back the cursor for `pc` resolution.
    #[must_use]
    pub const fn into_cursor(self) -> InstructionCursor {
        self.cursor
    }

    /// Register file of the machine.
    #[must_use]
    pub const fn regs(&self) -> &Registers {
        &self.state.regs
    }

    /// Mutable register file of the machine.
    pub const fn regs_mut(&mut self) -> &mut Registers {
        &mut self.state.regs
    }

    /// Underlying machine state.
    pub const fn state_mut(&mut self) -> &mut MachineState {
        self.state
    }

    /// Opcode byte of the instruction in flight.
    #[must_use]
    pub const fn opcode(&self) -> u8 {
        self.state.opcode
    }

    /// Cursor for the instruction in flight.
    #[must_use]
    pub const fn cursor(&self) -> &InstructionCursor {
        &self.cursor
    }

    /// Traced read.
    pub fn read(&mut self, addr: u16) -> u8 {
        read_byte(self.state, self.trace, addr)
    }

    /// Traced write; marks memory dirty.
    pub fn write(&mut self, addr: u16, value: u8) -> u8 {
        write_byte(self.state, self.trace, addr, value)
    }

    /// Traced little-endian word read from `addr` and `addr + 1`.
    pub fn read_word(&mut self, addr: u16) -> u16 {
        let lo = self.read(addr);
        let hi = self.read(addr.wrapping_add(1));
        u16::from_le_bytes([lo, hi])
    }

    /// Traced word read whose high byte wraps within page zero.
    pub fn read_zero_page_word(&mut self, ptr: u8) -> u16 {
        let lo = self.read(u16::from(ptr));
        let hi = self.read(u16::from(ptr.wrapping_add(1)));
        u16::from_le_bytes([lo, hi])
    }

    /// Reads the next instruction byte at `pc_at_fetch + decode_offset`.
    pub fn next_byte(&mut self) -> u8 {
        let addr = self.cursor.advance();
        self.read(addr)
    }

    /// Reads the next two instruction bytes as a little-endian word.
    pub fn next_word(&mut self) -> u16 {
        let lo = self.next_byte();
        let hi = self.next_byte();
        u16::from_le_bytes([lo, hi])
    }

    /// Pushes a byte on the hardware stack.
    pub fn push(&mut self, value: u8) {
        push_byte(self.state, self.trace, value);
    }

    /// Pushes a word, high byte first.
    pub fn push_word(&mut self, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.push(hi);
        self.push(lo);
    }

    /// Pulls a byte from the hardware stack.
    pub fn pull(&mut self) -> u8 {
        pull_byte(self.state, self.trace)
    }

    /// Pulls a word, low byte first.
    pub fn pull_word(&mut self) -> u16 {
        let lo = self.pull();
        let hi = self.pull();
        u16::from_le_bytes([lo, hi])
    }

    /// Absolute control transfer: writes `pc` directly, which exempts the
    /// instruction from length-based advance.
    pub const fn jump(&mut self, target: u16) {
        self.state.regs.set_pc(target);
    }

    /// Taken relative branch.
    pub const fn branch(&mut self, displacement: i8) {
        self.cursor.set_branch_displacement(displacement);
    }
}
