//! Instruction-atomic WDC 65C02 execution core.
//!
//! The core owns one [`MachineState`] per run and drives it through a
//! synchronous fetch/decode/execute loop. Every CPU memory access is
//! reported to a [`TraceSink`]; devices attach through [`IoDevice`] and
//! request service with the single maskable interrupt line.

/// Flat address space, vector locations and the traced bus.
pub mod memory;
pub use memory::{
    new_address_space, read_u16_le, stack_address, ADDRESS_SPACE_BYTES, IRQ_VECTOR, NMI_VECTOR,
    RESET_VECTOR, STACK_PAGE,
};

/// Register file, transient flags and whole-machine state.
pub mod state;
pub use state::{EmuFlags, MachineState, Registers, RunState, StatusFlags, RESET_STACK_POINTER};

/// Bus access records and trace sinks.
pub mod trace;
pub use trace::{AccessKind, BusAccess, NullTrace, TraceSink, WriterTrace};

/// Operand streaming and program-counter resolution.
pub mod cursor;
pub use cursor::InstructionCursor;

/// Total opcode decoder and the defined instruction table.
pub mod decoder;
pub use decoder::{
    decode, AddressingMode, HandlerCategory, Instruction, Mnemonic, DEFINED_OPCODE_COUNT,
    OPCODE_TABLE,
};

/// Instruction handlers and the dispatch loop.
pub mod execute;
pub use execute::{
    execute_instruction, run, run_bounded, step_one, ExecContext, ExecuteOutcome, RunOutcome,
    StepOutcome,
};

/// Maskable interrupt injection.
pub mod interrupt;
pub use interrupt::{irq_eligible, service_pending_interrupt};

/// Device contract and I/O synchronization.
pub mod io;
pub use io::{synchronize, IoDevice, NullDevice};

/// Concrete devices.
pub mod peripherals;
pub use peripherals::{ConsoleConfig, ConsoleDevice};

/// Host configuration.
pub mod config;
pub use config::{CoreConfig, EntryPoint};

/// Image loading errors.
pub mod error;
pub use error::LoadError;

/// Memory image loading and boot.
pub mod loader;
pub use loader::{boot_image, load_image, load_image_file};

#[cfg(test)]
use proptest as _;
