//! Diagnostic bus trace: one record per CPU memory access.

use std::fmt;
use std::io::{self, Write};

/// Direction of a bus access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessKind {
    /// CPU read.
    Read,
    /// CPU write.
    Write,
}

impl AccessKind {
    /// Single-character direction marker used in trace lines.
    #[must_use]
    pub const fn marker(self) -> char {
        match self {
            Self::Read => 'r',
            Self::Write => 'W',
        }
    }
}

/// One observed bus access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BusAccess {
    /// Accessed address.
    pub addr: u16,
    /// Byte read or written.
    pub value: u8,
    /// Access direction.
    pub kind: AccessKind,
}

impl fmt::Display for BusAccess {
    /// Renders `AAAA r VV` / `AAAA W VV` without a trailing newline.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X} {} {:02X}", self.addr, self.kind.marker(), self.value)
    }
}

/// Receiver for bus access records, in the order they happen.
pub trait TraceSink {
    /// Records one access.
    fn on_access(&mut self, access: BusAccess);
}

/// Discards every record.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTrace;

impl TraceSink for NullTrace {
    fn on_access(&mut self, _access: BusAccess) {}
}

impl TraceSink for Vec<BusAccess> {
    fn on_access(&mut self, access: BusAccess) {
        self.push(access);
    }
}

/// Writes newline-terminated trace lines to an [`io::Write`] target.
///
/// The first write failure is latched and later records are dropped; the
/// dispatch loop has no error path, so the host collects the failure through
/// [`WriterTrace::finish`].
#[derive(Debug)]
pub struct WriterTrace<W: Write> {
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> WriterTrace<W> {
    /// Wraps `out`.
    pub const fn new(out: W) -> Self {
        Self { out, error: None }
    }

    /// Returns `true` once a write has failed.
    #[must_use]
    pub const fn has_failed(&self) -> bool {
        self.error.is_some()
    }

    /// Flushes the writer and returns it, or the first latched error.
    ///
    /// # Errors
    ///
    /// Returns the first I/O error seen while tracing or flushing.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> TraceSink for WriterTrace<W> {
    fn on_access(&mut self, access: BusAccess) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = writeln!(self.out, "{access}") {
            tracing::warn!(error = %err, "bus trace output failed; further records dropped");
            self.error = Some(err);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Write};

    use super::{AccessKind, BusAccess, NullTrace, TraceSink, WriterTrace};

    #[test]
    fn display_pads_address_and_value_in_uppercase_hex() {
        let read = BusAccess {
            addr: 0x00AB,
            value: 0x0C,
            kind: AccessKind::Read,
        };
        let write = BusAccess {
            addr: 0xFFFE,
            value: 0xFF,
            kind: AccessKind::Write,
        };

        assert_eq!(read.to_string(), "00AB r 0C");
        assert_eq!(write.to_string(), "FFFE W FF");
    }

    #[test]
    fn writer_trace_emits_one_line_per_access() {
        let mut sink = WriterTrace::new(Vec::new());
        sink.on_access(BusAccess {
            addr: 0x0000,
            value: 0xEA,
            kind: AccessKind::Read,
        });
        sink.on_access(BusAccess {
            addr: 0x0010,
            value: 0x42,
            kind: AccessKind::Write,
        });

        let out = sink.finish().expect("in-memory writer cannot fail");
        assert_eq!(String::from_utf8(out).expect("ascii"), "0000 r EA\n0010 W 42\n");
    }

    #[derive(Debug)]
    struct FailingWriter {
        attempts: usize,
    }

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            self.attempts += 1;
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn writer_trace_latches_first_error_and_stops_writing() {
        let mut sink = WriterTrace::new(FailingWriter { attempts: 0 });
        let access = BusAccess {
            addr: 0x1234,
            value: 0x56,
            kind: AccessKind::Read,
        };

        sink.on_access(access);
        sink.on_access(access);

        assert!(sink.has_failed());
        assert_eq!(sink.out.attempts, 1);
        let err = sink.finish().expect_err("error must be latched");
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn null_trace_accepts_records() {
        let mut sink = NullTrace;
        sink.on_access(BusAccess {
            addr: 0,
            value: 0,
            kind: AccessKind::Write,
        });
    }
}
