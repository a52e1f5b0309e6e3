//! C ABI for growbuf.
//!
//! Exposes [`growbuf::ErasedBuffer`] to C callers through opaque `u64`
//! handles. Elements are addressed by byte width fixed at creation, the
//! same contract as the generic buffer with the type parameter replaced
//! by `element_width`.
//!
//! Every entry point catches panics and reports them as
//! [`GrowbufStatus::Panicked`](status::GrowbufStatus::Panicked) instead of
//! unwinding into C.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

/// Run an FFI body returning an `i32` status, converting panics into
/// `GrowbufStatus::Panicked`.
macro_rules! ffi_guard {
    ($body:block) => {
        match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| -> i32 { $body })) {
            Ok(status) => status,
            Err(_) => $crate::status::GrowbufStatus::Panicked as i32,
        }
    };
}

/// Like `ffi_guard!` for accessors that return a value instead of a
/// status: panics yield `$default`.
macro_rules! ffi_guard_or {
    ($default:expr, $body:block) => {
        match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| $body)) {
            Ok(value) => value,
            Err(_) => $default,
        }
    };
}

/// Lock a mutex inside an `ffi_guard!` body, returning `InternalError`
/// from the body if it is poisoned.
macro_rules! ffi_lock {
    ($mutex:expr) => {
        match $mutex.lock() {
            Ok(guard) => guard,
            Err(_) => return $crate::status::GrowbufStatus::InternalError as i32,
        }
    };
}

pub mod buffer;
mod registry;
pub mod status;

pub use buffer::GrowbufInfo;
pub use status::GrowbufStatus;
