//! Operand streaming and program-counter resolution for one instruction.

/// Per-instruction decode position and pending relative branch.
///
/// Handlers stream operand bytes from `pc_at_fetch + decode_offset` instead
/// of bumping `pc`, so the loop can tell an explicit control transfer (a
/// handler wrote `pc`) from ordinary sequential execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InstructionCursor {
    pc_at_fetch: u16,
    decode_offset: u16,
    branch_displacement: i8,
}

impl InstructionCursor {
    /// Starts a fresh cursor at the instruction beginning at `pc_at_fetch`.
    #[must_use]
    pub const fn new(pc_at_fetch: u16) -> Self {
        Self {
            pc_at_fetch,
            decode_offset: 0,
            branch_displacement: 0,
        }
    }

    /// Address of the instruction's opcode byte.
    #[must_use]
    pub const fn pc_at_fetch(&self) -> u16 {
        self.pc_at_fetch
    }

    /// Bytes consumed so far, opcode included.
    #[must_use]
    pub const fn decode_offset(&self) -> u16 {
        self.decode_offset
    }

    /// Signed displacement applied after sequential advance.
    #[must_use]
    pub const fn branch_displacement(&self) -> i8 {
        self.branch_displacement
    }

    /// Address the next streamed byte is read from. Once all operands are
    /// consumed this is the address of the following instruction.
    #[must_use]
    pub const fn next_address(&self) -> u16 {
        self.pc_at_fetch.wrapping_add(self.decode_offset)
    }

    /// Marks one more byte as consumed and returns its address.
    pub const fn advance(&mut self) -> u16 {
        let addr = self.next_address();
        self.decode_offset = self.decode_offset.wrapping_add(1);
        addr
    }

    /// Records a taken relative branch.
    pub const fn set_branch_displacement(&mut self, displacement: i8) {
        self.branch_displacement = displacement;
    }

    /// Computes the program counter after the handler returned.
    ///
    /// When `pc` is unchanged the instruction length is added; the branch
    /// displacement is added unconditionally.
    #[must_use]
    pub fn resolve_pc(&self, pc: u16) -> u16 {
        let sequential = if pc == self.pc_at_fetch {
            pc.wrapping_add(self.decode_offset)
        } else {
            pc
        };
        sequential.wrapping_add_signed(i16::from(self.branch_displacement))
    }
}
