//! Contiguous growable buffers with explicit capacity bookkeeping.
//!
//! [`GrowableBuffer<T>`] stores values of `T` in one resizable allocation
//! with O(1) amortised append. Growth is fallible: allocation failure and
//! capacity overflow come back as [`BufferError`] with the buffer left
//! exactly as it was. This crate is the only one in the workspace that
//! contains `unsafe` code outside the C ABI.
//!
//! # Architecture
//!
//! ```text
//! GrowableBuffer<T>         (size, policy, element moves)
//! ├── RawBuffer<T>          (uninitialised block + capacity, allocator calls)
//! └── GrowthPolicy          (initial capacity, scale factor, bias)
//!
//! ErasedBuffer              (element_width bytes per element, for C hosts)
//! └── GrowableBuffer<Block> (16-byte aligned, fully initialised to capacity)
//! ```
//!
//! # Invalidation
//!
//! `reserve`, `insert`, `append`, `assign` and `resize` may move the
//! elements. Element references borrow the buffer, so holding one across
//! such a call does not compile. Raw pointers from `as_ptr` are not
//! tracked and must be re-fetched.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod buffer;
pub mod config;
pub mod erased;
pub mod error;
pub mod iter;
mod raw;

// Public re-exports for the primary API surface.
pub use buffer::GrowableBuffer;
pub use config::{ConfigError, GrowthPolicy};
pub use erased::ErasedBuffer;
pub use error::BufferError;
pub use iter::IntoIter;
