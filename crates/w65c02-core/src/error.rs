//! Errors raised while preparing a machine. Execution itself is infallible.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to place a memory image into the address space.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The image has no bytes.
    #[error("memory image is empty")]
    Empty,
    /// The image does not fit between the load address and the top of memory.
    #[error("memory image of {len} bytes does not fit at ${load_address:04X}")]
    TooLarge {
        /// Image length in bytes.
        len: usize,
        /// Requested load address.
        load_address: u16,
    },
    /// The image file could not be read.
    #[error("failed to read memory image {}", path.display())]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
}
