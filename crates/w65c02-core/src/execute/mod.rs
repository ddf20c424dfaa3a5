//! Fetch/decode/execute loop for the 65C02 core.
//!
//! One iteration of [`step_one`] walks the fixed sequence
//! fetch, dispatch, pc resolution, I/O synchronization, interrupt check.
//! Handlers never touch `pc` for sequential flow; the loop advances it from
//! the cursor unless the handler wrote an absolute target.

mod alu;
pub mod context;
mod control;
mod data;
pub mod helpers;

pub use context::ExecContext;
pub use helpers::Operand;

use crate::decoder::{decode, HandlerCategory, Instruction};
use crate::interrupt::service_pending_interrupt;
use crate::io::{synchronize, IoDevice};
use crate::trace::TraceSink;
use crate::{EmuFlags, MachineState, RunState};

/// Result of dispatching one decoded instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecuteOutcome {
    /// Proceed to pc resolution and I/O synchronization.
    Continue,
    /// `STP` retired; the loop must halt.
    Stop,
}

/// Result of one dispatch-loop iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepOutcome {
    /// An instruction retired and the loop may continue.
    Retired {
        /// Opcode byte that was executed.
        opcode: u8,
        /// Whether an interrupt was injected after the instruction.
        interrupt_taken: bool,
    },
    /// `STP` retired during this iteration; the final device pass ran.
    Halted,
    /// The machine was already stopped; nothing was fetched.
    Stopped,
}

/// Aggregated outcome of a multi-instruction run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunOutcome {
    /// Instructions retired during this call, `STP` included.
    pub instructions: u64,
    /// Last step-level status observed before returning.
    pub final_step: StepOutcome,
}

/// Executes one decoded instruction against `ctx`.
///
/// Undefined opcodes do nothing; the loop's length-based advance moves
/// `pc` past their single byte.
pub fn execute_instruction(ctx: &mut ExecContext<'_>, instruction: Instruction) -> ExecuteOutcome {
    let Instruction::Defined { mnemonic, mode } = instruction else {
        return ExecuteOutcome::Continue;
    };

    match mnemonic.category() {
        HandlerCategory::Arithmetic => alu::arithmetic(ctx, mnemonic, mode),
        HandlerCategory::Compare => alu::compare(ctx, mnemonic, mode),
        HandlerCategory::Logical => alu::logical(ctx, mnemonic, mode),
        HandlerCategory::Shift => alu::shift(ctx, mnemonic, mode),
        HandlerCategory::IncDec => alu::inc_dec(ctx, mnemonic, mode),
        HandlerCategory::Branch => control::branch(ctx, mnemonic),
        HandlerCategory::Jump => control::jump(ctx, mnemonic, mode),
        HandlerCategory::Interrupts => control::interrupts(ctx, mnemonic),
        HandlerCategory::Load => data::load(ctx, mnemonic, mode),
        HandlerCategory::Store => data::store(ctx, mnemonic, mode),
        HandlerCategory::Transfer => data::transfer(ctx, mnemonic),
        HandlerCategory::Stack => data::stack(ctx, mnemonic),
        HandlerCategory::Flags => data::flags(ctx, mnemonic),
        HandlerCategory::Nop => {}
        HandlerCategory::Stop => return ExecuteOutcome::Stop,
    }
    ExecuteOutcome::Continue
}

/// Runs one full loop iteration.
///
/// A stopped machine is left untouched and reports [`StepOutcome::Stopped`].
/// When `STP` retires, `pc` stays on the `STP` byte and the device gets one
/// last synchronization pass; no further bus access follows.
pub fn step_one(
    state: &mut MachineState,
    device: &mut dyn IoDevice,
    trace: &mut dyn TraceSink,
) -> StepOutcome {
    if state.run_state.is_stopped() {
        return StepOutcome::Stopped;
    }

    state.emu_flags = EmuFlags::empty();
    state.pc_at_fetch = state.regs.pc();

    let mut ctx = ExecContext::new(state, trace);
    let opcode = ctx.next_byte();
    ctx.state_mut().opcode = opcode;
    let outcome = execute_instruction(&mut ctx, decode(opcode));
    let cursor = ctx.into_cursor();

    if outcome == ExecuteOutcome::Stop {
        state.run_state = RunState::Stopped;
        tracing::debug!(pc = state.pc_at_fetch, "STP retired, halting");
        synchronize(state, device);
        return StepOutcome::Halted;
    }

    let pc = cursor.resolve_pc(state.regs.pc());
    state.regs.set_pc(pc);
    tracing::trace!(at = cursor.pc_at_fetch(), opcode, next = pc, "retired");

    synchronize(state, device);
    let interrupt_taken = service_pending_interrupt(state, trace);

    StepOutcome::Retired {
        opcode,
        interrupt_taken,
    }
}

/// Runs until `STP`, bracketing the loop with the device's `init` and
/// `finish` hooks.
pub fn run(
    state: &mut MachineState,
    device: &mut dyn IoDevice,
    trace: &mut dyn TraceSink,
) -> RunOutcome {
    device.init();
    let outcome = run_bounded(state, device, trace, u64::MAX);
    device.finish();
    tracing::debug!(instructions = outcome.instructions, "run finished");
    outcome
}

/// Steps at most `max_instructions` times or until the machine stops.
///
/// Does not call the device's `init`/`finish` hooks; callers that need them
/// use [`run`].
pub fn run_bounded(
    state: &mut MachineState,
    device: &mut dyn IoDevice,
    trace: &mut dyn TraceSink,
    max_instructions: u64,
) -> RunOutcome {
    let mut instructions = 0_u64;
    let mut final_step = StepOutcome::Stopped;

    while instructions < max_instructions {
        final_step = step_one(state, device, trace);
        match final_step {
            StepOutcome::Retired { .. } => instructions += 1,
            StepOutcome::Halted => {
                instructions += 1;
                break;
            }
            StepOutcome::Stopped => break,
        }
    }

    RunOutcome {
        instructions,
        final_step,
    }
}
