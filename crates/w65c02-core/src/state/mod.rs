//! Machine state owned by the dispatch loop for the lifetime of a run.

/// Programmer-visible register file and status flags.
pub mod registers;
/// Dispatch-loop run state.
pub mod run_state;

use bitflags::bitflags;

pub use registers::{Registers, StatusFlags, RESET_STACK_POINTER};
pub use run_state::RunState;

use crate::memory::{new_address_space, read_u16_le, RESET_VECTOR};

bitflags! {
    /// Emulator-side control bits, reset before every instruction dispatch.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EmuFlags: u8 {
        /// A bus write happened since the last I/O synchronization.
        const DIRTY = 0x01;
        /// The retired instruction asked to sleep until an interrupt arrives.
        const WAIT_FOR_INTERRUPT = 0x02;
    }
}

/// Complete state of one emulated 65C02 system.
///
/// There is exactly one instance per run. The dispatch loop and the handler
/// executing the current instruction are its only mutators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineState {
    /// Register file.
    pub regs: Registers,
    /// Flat 64 KiB memory image, including device registers.
    pub memory: Box<[u8]>,
    /// Transient control bits.
    pub emu_flags: EmuFlags,
    /// Maskable interrupt request line, asserted by devices.
    pub interrupt_pending: bool,
    /// Most recently fetched opcode byte.
    pub opcode: u8,
    /// `pc` snapshot taken before the current opcode fetch.
    pub pc_at_fetch: u16,
    /// Whether the loop may keep fetching.
    pub run_state: RunState,
}

impl Default for MachineState {
    fn default() -> Self {
        Self {
            regs: Registers::default(),
            memory: new_address_space(),
            emu_flags: EmuFlags::empty(),
            interrupt_pending: false,
            opcode: 0,
            pc_at_fetch: 0,
            run_state: RunState::Running,
        }
    }
}

impl MachineState {
    /// Creates a zeroed machine positioned at `pc`.
    #[must_use]
    pub fn with_pc(pc: u16) -> Self {
        let mut state = Self::default();
        state.regs.set_pc(pc);
        state
    }

    /// Applies the reset sequence: registers return to their power-on values
    /// and `pc` is loaded from the reset vector. Memory is left untouched.
    pub fn reset(&mut self) {
        self.regs = Registers::default();
        self.regs.set_pc(read_u16_le(&self.memory, RESET_VECTOR));
        self.emu_flags = EmuFlags::empty();
        self.interrupt_pending = false;
        self.opcode = 0;
        self.pc_at_fetch = self.regs.pc();
        self.run_state = RunState::Running;
    }

    /// Asserts the maskable interrupt request line.
    pub const fn request_interrupt(&mut self) {
        self.interrupt_pending = true;
    }

    /// Returns `true` when a write happened since the last I/O sync.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.emu_flags.contains(EmuFlags::DIRTY)
    }

    /// Returns `true` when the CPU is sleeping in `WAI`.
    #[must_use]
    pub const fn is_waiting_for_interrupt(&self) -> bool {
        self.emu_flags.contains(EmuFlags::WAIT_FOR_INTERRUPT)
    }
}
