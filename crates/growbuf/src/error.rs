//! Buffer error types.

use std::error::Error;
use std::fmt;

use crate::config::ConfigError;

/// Errors that can occur during buffer operations.
///
/// Every fallible mutation leaves the buffer exactly as it was when it
/// returns one of these; recovery policy belongs to the caller.
#[derive(Clone, Debug, PartialEq)]
pub enum BufferError {
    /// The allocator could not satisfy a request.
    AllocationFailed {
        /// Number of bytes requested from the allocator.
        requested_bytes: usize,
    },
    /// The requested element count does not fit in the address space.
    CapacityOverflow {
        /// Number of elements requested.
        requested: usize,
    },
    /// An insert index past the end of the buffer.
    OutOfBounds {
        /// The rejected index.
        index: usize,
        /// Buffer length at the time of the call.
        len: usize,
    },
    /// An erased buffer was created with an element width of zero.
    ZeroWidth,
    /// An erased element write whose byte length is not the element width.
    WidthMismatch {
        /// The buffer's element width (or a multiple of it) in bytes.
        expected: usize,
        /// Number of bytes supplied.
        actual: usize,
    },
    /// The growth policy failed validation.
    Config(ConfigError),
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllocationFailed { requested_bytes } => {
                write!(f, "allocation of {requested_bytes} bytes failed")
            }
            Self::CapacityOverflow { requested } => {
                write!(f, "capacity overflow: {requested} elements requested")
            }
            Self::OutOfBounds { index, len } => {
                write!(f, "index {index} out of bounds for length {len}")
            }
            Self::ZeroWidth => write!(f, "element width must be non-zero"),
            Self::WidthMismatch { expected, actual } => {
                write!(f, "expected {expected} bytes, got {actual}")
            }
            Self::Config(e) => write!(f, "growth policy: {e}"),
        }
    }
}

impl Error for BufferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for BufferError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}
