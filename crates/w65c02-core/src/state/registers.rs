use bitflags::bitflags;

bitflags! {
    /// Processor status register (`P`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StatusFlags: u8 {
        /// Carry / not-borrow.
        const CARRY = 0x01;
        /// Result was zero.
        const ZERO = 0x02;
        /// Maskable interrupts are disabled.
        const IRQ_DISABLE = 0x04;
        /// Binary-coded decimal arithmetic mode.
        const DECIMAL = 0x08;
        /// Set in the byte pushed by `BRK`/`PHP`.
        const BREAK = 0x10;
        /// Reads as one on real silicon.
        const UNUSED = 0x20;
        /// Signed overflow.
        const OVERFLOW = 0x40;
        /// Bit 7 of the result.
        const NEGATIVE = 0x80;
    }
}

impl Default for StatusFlags {
    fn default() -> Self {
        Self::UNUSED | Self::IRQ_DISABLE
    }
}

/// Stack pointer value after the reset sequence.
pub const RESET_STACK_POINTER: u8 = 0xFD;

/// Programmer-visible 65C02 register file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registers {
    pc: u16,
    a: u8,
    x: u8,
    y: u8,
    sp: u8,
    status: StatusFlags,
}

impl Default for Registers {
    fn default() -> Self {
        Self {
            pc: 0,
            a: 0,
            x: 0,
            y: 0,
            sp: RESET_STACK_POINTER,
            status: StatusFlags::default(),
        }
    }
}

impl Registers {
    /// Reads the program counter.
    #[must_use]
    pub const fn pc(&self) -> u16 {
        self.pc
    }

    /// Writes the program counter.
    pub const fn set_pc(&mut self, value: u16) {
        self.pc = value;
    }

    /// Reads the accumulator.
    #[must_use]
    pub const fn a(&self) -> u8 {
        self.a
    }

    /// Writes the accumulator.
    pub const fn set_a(&mut self, value: u8) {
        self.a = value;
    }

    /// Reads index register `X`.
    #[must_use]
    pub const fn x(&self) -> u8 {
        self.x
    }

    /// Writes index register `X`.
    pub const fn set_x(&mut self, value: u8) {
        self.x = value;
    }

    /// Reads index register `Y`.
    #[must_use]
    pub const fn y(&self) -> u8 {
        self.y
    }

    /// Writes index register `Y`.
    pub const fn set_y(&mut self, value: u8) {
        self.y = value;
    }

    /// Reads the stack pointer (offset into page one).
    #[must_use]
    pub const fn sp(&self) -> u8 {
        self.sp
    }

    /// Writes the stack pointer.
    pub const fn set_sp(&mut self, value: u8) {
        self.sp = value;
    }

    /// Reads the full status byte.
    #[must_use]
    pub const fn status(&self) -> StatusFlags {
        self.status
    }

    /// Replaces the full status byte.
    pub const fn set_status(&mut self, value: StatusFlags) {
        self.status = value;
    }

    /// Returns `true` when every bit of `flag` is set.
    #[must_use]
    pub const fn flag_is_set(&self, flag: StatusFlags) -> bool {
        self.status.contains(flag)
    }

    /// Sets or clears `flag`.
    pub fn set_flag(&mut self, flag: StatusFlags, enabled: bool) {
        self.status.set(flag, enabled);
    }

    /// Updates `N` and `Z` from a result byte.
    pub fn set_nz(&mut self, value: u8) {
        self.status.set(StatusFlags::ZERO, value == 0);
        self.status.set(StatusFlags::NEGATIVE, value & 0x80 != 0);
    }
}
