//! Byte-stream console mapped into three memory locations.
//!
//! The program writes a non-zero byte to the output port to print it. Input
//! is delivered while the CPU sleeps in `WAI`: the device reads one byte,
//! places it in the data port, raises the status port and asserts the
//! interrupt line. The program acknowledges by clearing the status port.

use std::io::{self, ErrorKind, Read, Write};

use crate::io::IoDevice;
use crate::MachineState;

/// Default output port.
pub const CONSOLE_OUTPUT_PORT: u16 = 0xF001;

/// Default input status port.
pub const CONSOLE_INPUT_STATUS_PORT: u16 = 0xF004;

/// Default input data port.
pub const CONSOLE_INPUT_DATA_PORT: u16 = 0xF005;

/// Status value: a byte is waiting in the data port.
pub const INPUT_READY: u8 = 0x01;

/// Status value: the input stream has ended.
pub const INPUT_END: u8 = 0xFF;

/// Port assignment for [`ConsoleDevice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ConsoleConfig {
    /// Output port address.
    pub output: u16,
    /// Input status port address.
    pub input_status: u16,
    /// Input data port address.
    pub input_data: u16,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            output: CONSOLE_OUTPUT_PORT,
            input_status: CONSOLE_INPUT_STATUS_PORT,
            input_data: CONSOLE_INPUT_DATA_PORT,
        }
    }
}

/// Console device over an arbitrary reader and writer.
///
/// I/O failures never reach the core: the first one is latched, logged and
/// stops further traffic in that direction.
#[derive(Debug)]
pub struct ConsoleDevice<R: Read, W: Write> {
    config: ConsoleConfig,
    input: R,
    output: W,
    input_closed: bool,
    output_failed: bool,
    error: Option<io::Error>,
}

impl<R: Read, W: Write> ConsoleDevice<R, W> {
    /// Creates a console on `input`/`output` with the given ports.
    pub const fn new(config: ConsoleConfig, input: R, output: W) -> Self {
        Self {
            config,
            input,
            output,
            input_closed: false,
            output_failed: false,
            error: None,
        }
    }

    /// Port assignment in use.
    #[must_use]
    pub const fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    /// Returns `true` once the input stream has been exhausted.
    #[must_use]
    pub const fn input_closed(&self) -> bool {
        self.input_closed
    }

    /// Takes the first latched I/O error, if any.
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    /// Consumes the device and returns its writer.
    pub fn into_output(self) -> W {
        self.output
    }

    fn latch(&mut self, err: io::Error) {
        tracing::warn!(error = %err, "console I/O failed");
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    fn emit(&mut self, byte: u8) {
        if self.output_failed {
            return;
        }
        if let Err(err) = self.output.write_all(&[byte]) {
            self.output_failed = true;
            self.latch(err);
        }
    }

    fn read_input(&mut self) -> Option<u8> {
        let mut buf = [0_u8; 1];
        loop {
            match self.input.read(&mut buf) {
                Ok(0) => return None,
                Ok(_) => return Some(buf[0]),
                Err(err) if err.kind() == ErrorKind::Interrupted => {}
                Err(err) => {
                    self.latch(err);
                    return None;
                }
            }
        }
    }

    fn poll_input(&mut self, state: &mut MachineState) {
        let status = usize::from(self.config.input_status);
        if self.input_closed || state.memory[status] != 0 {
            return;
        }

        if let Some(byte) = self.read_input() {
            state.memory[usize::from(self.config.input_data)] = byte;
            state.memory[status] = INPUT_READY;
        } else {
            tracing::debug!("console input closed");
            self.input_closed = true;
            state.memory[status] = INPUT_END;
        }
        state.request_interrupt();
    }
}

impl<R: Read, W: Write> IoDevice for ConsoleDevice<R, W> {
    fn handle(&mut self, state: &mut MachineState) {
        if state.is_dirty() {
            let port = usize::from(self.config.output);
            let byte = state.memory[port];
            if byte != 0 {
                self.emit(byte);
                state.memory[port] = 0;
            }
        }

        if state.is_waiting_for_interrupt() {
            self.poll_input(state);
        }
    }

    fn finish(&mut self) {
        if self.output_failed {
            return;
        }
        if let Err(err) = self.output.flush() {
            self.output_failed = true;
            self.latch(err);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Write};

    use super::{
        ConsoleConfig, ConsoleDevice, CONSOLE_INPUT_DATA_PORT, CONSOLE_INPUT_STATUS_PORT,
        CONSOLE_OUTPUT_PORT, INPUT_END, INPUT_READY,
    };
    use crate::io::IoDevice;
    use crate::{EmuFlags, MachineState};

    fn console(input: &[u8]) -> ConsoleDevice<&[u8], Vec<u8>> {
        ConsoleDevice::new(ConsoleConfig::default(), input, Vec::new())
    }

    #[test]
    fn output_port_is_drained_only_when_dirty() {
        let mut device = console(b"");
        let mut state = MachineState::default();
        state.memory[usize::from(CONSOLE_OUTPUT_PORT)] = b'A';

        device.handle(&mut state);
        assert_eq!(state.memory[usize::from(CONSOLE_OUTPUT_PORT)], b'A');

        state.emu_flags.insert(EmuFlags::DIRTY);
        device.handle(&mut state);
        assert_eq!(state.memory[usize::from(CONSOLE_OUTPUT_PORT)], 0);
        assert_eq!(device.into_output(), b"A");
    }

    #[test]
    fn input_is_delivered_one_byte_per_acknowledge() {
        let mut device = console(b"hi");
        let mut state = MachineState::default();
        state.emu_flags.insert(EmuFlags::WAIT_FOR_INTERRUPT);
        let status = usize::from(CONSOLE_INPUT_STATUS_PORT);
        let data = usize::from(CONSOLE_INPUT_DATA_PORT);

        device.handle(&mut state);
        assert_eq!((state.memory[status], state.memory[data]), (INPUT_READY, b'h'));
        assert!(state.interrupt_pending);

        state.interrupt_pending = false;
        device.handle(&mut state);
        assert_eq!(state.memory[data], b'h');
        assert!(!state.interrupt_pending);

        state.memory[status] = 0;
        device.handle(&mut state);
        assert_eq!((state.memory[status], state.memory[data]), (INPUT_READY, b'i'));

        state.memory[status] = 0;
        state.interrupt_pending = false;
        device.handle(&mut state);
        assert_eq!(state.memory[status], INPUT_END);
        assert!(state.interrupt_pending);
        assert!(device.input_closed());

        state.memory[status] = 0;
        state.interrupt_pending = false;
        device.handle(&mut state);
        assert!(!state.interrupt_pending);
    }

    #[test]
    fn input_is_not_read_while_running() {
        let mut device = console(b"x");
        let mut state = MachineState::default();
        device.handle(&mut state);
        assert_eq!(state.memory[usize::from(CONSOLE_INPUT_STATUS_PORT)], 0);
        assert!(!state.interrupt_pending);
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failure_is_latched_not_propagated() {
        let mut device = ConsoleDevice::new(ConsoleConfig::default(), io::empty(), BrokenPipe);
        let mut state = MachineState::default();
        state.memory[usize::from(CONSOLE_OUTPUT_PORT)] = b'Z';
        state.emu_flags.insert(EmuFlags::DIRTY);

        device.handle(&mut state);
        device.finish();

        assert_eq!(state.memory[usize::from(CONSOLE_OUTPUT_PORT)], 0);
        let err = device.take_error().map(|err| err.kind());
        assert_eq!(err, Some(io::ErrorKind::BrokenPipe));
        assert!(device.take_error().is_none());
    }
}
