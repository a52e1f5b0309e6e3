//! C-compatible status codes.
//!
//! [`GrowbufStatus`] is a `repr(i32)` enum covering every error a buffer
//! operation can report across the C boundary, with a conversion from
//! [`BufferError`].

use growbuf::BufferError;

/// C-compatible status code returned by all mutating FFI functions.
///
/// `Ok` = 0, all errors are negative. Values are ABI-stable.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GrowbufStatus {
    /// Success.
    Ok = 0,
    /// Handle is invalid or was already destroyed.
    InvalidHandle = -1,
    /// A pointer argument is null, or a size is zero where it must not be.
    InvalidArgument = -2,
    /// Insert or erase index is past the end of the buffer.
    IndexOutOfBounds = -3,
    /// The allocator could not satisfy a growth request.
    AllocationFailed = -4,
    /// The requested element count does not fit in the address space.
    CapacityOverflow = -5,
    /// Source data length is not a whole number of elements.
    WidthMismatch = -6,
    /// Growth policy validation failed.
    ConfigError = -7,
    /// Internal error (e.g. poisoned mutex after a prior panic).
    InternalError = -8,
    /// A Rust panic was caught at the FFI boundary.
    Panicked = -128,
}

impl From<&BufferError> for GrowbufStatus {
    fn from(e: &BufferError) -> Self {
        match e {
            BufferError::AllocationFailed { .. } => GrowbufStatus::AllocationFailed,
            BufferError::CapacityOverflow { .. } => GrowbufStatus::CapacityOverflow,
            BufferError::OutOfBounds { .. } => GrowbufStatus::IndexOutOfBounds,
            BufferError::ZeroWidth => GrowbufStatus::InvalidArgument,
            BufferError::WidthMismatch { .. } => GrowbufStatus::WidthMismatch,
            BufferError::Config(_) => GrowbufStatus::ConfigError,
        }
    }
}

impl From<Result<(), BufferError>> for GrowbufStatus {
    fn from(result: Result<(), BufferError>) -> Self {
        match result {
            Ok(()) => GrowbufStatus::Ok,
            Err(e) => GrowbufStatus::from(&e),
        }
    }
}
