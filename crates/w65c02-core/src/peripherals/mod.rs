//! Concrete devices that plug into the dispatch loop.

/// Memory-mapped byte console.
pub mod console;

pub use console::{
    ConsoleConfig, ConsoleDevice, CONSOLE_INPUT_DATA_PORT, CONSOLE_INPUT_STATUS_PORT,
    CONSOLE_OUTPUT_PORT, INPUT_END, INPUT_READY,
};
