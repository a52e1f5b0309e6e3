//! Low-level storage for buffer memory operations.
//!
//! [`RawBuffer`] owns an uninitialised block of `capacity` slots and
//! nothing else: it never reads, writes, or drops elements. Callers track
//! which slots are live. All allocator calls in the crate go through
//! [`RawBuffer::resize`] and [`RawBuffer::release`], each with a
//! mandatory `// SAFETY:` comment.

#![allow(unsafe_code)]

use std::alloc::{self, Layout};
use std::marker::PhantomData;
use std::mem;
use std::ptr::NonNull;

use crate::error::BufferError;

/// An owned, uninitialised allocation sized for `capacity` values of `T`.
///
/// Zero-sized types never touch the allocator; their capacity is pure
/// bookkeeping so that the buffer state machine behaves identically for
/// every element type.
pub(crate) struct RawBuffer<T> {
    ptr: NonNull<T>,
    cap: usize,
    _owns: PhantomData<T>,
}

// SAFETY: `RawBuffer` uniquely owns its allocation, exactly like `Box<[T]>`.
unsafe impl<T: Send> Send for RawBuffer<T> {}
// SAFETY: shared access only hands out `*const`-equivalent pointers.
unsafe impl<T: Sync> Sync for RawBuffer<T> {}

impl<T> RawBuffer<T> {
    const IS_ZST: bool = mem::size_of::<T>() == 0;

    /// An unallocated buffer with zero capacity.
    pub(crate) const fn new() -> Self {
        Self {
            ptr: NonNull::dangling(),
            cap: 0,
            _owns: PhantomData,
        }
    }

    /// Base pointer of the block. Dangling (but aligned) when unallocated.
    #[inline]
    pub(crate) fn ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Number of slots currently allocated.
    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.cap
    }

    /// Reallocate to exactly `new_cap` slots, preserving the first
    /// `min(cap, new_cap)` slots bit-for-bit.
    ///
    /// On error the block, pointer, and capacity are untouched.
    pub(crate) fn resize(&mut self, new_cap: usize) -> Result<(), BufferError> {
        if new_cap == self.cap {
            return Ok(());
        }
        if new_cap == 0 {
            self.release();
            return Ok(());
        }
        if Self::IS_ZST {
            self.cap = new_cap;
            return Ok(());
        }

        let new_layout = Layout::array::<T>(new_cap)
            .map_err(|_| BufferError::CapacityOverflow { requested: new_cap })?;

        let raw = if self.cap == 0 {
            // SAFETY: `new_layout` has non-zero size (non-ZST, new_cap > 0).
            unsafe { alloc::alloc(new_layout) }
        } else {
            // SAFETY: `self.ptr` was allocated by the global allocator with
            // `Layout::array::<T>(self.cap)`, which was valid when created.
            // The new size is non-zero and `Layout::array` has already
            // checked it does not exceed `isize::MAX` once rounded.
            unsafe {
                let old_layout = Layout::array::<T>(self.cap).unwrap_unchecked();
                alloc::realloc(self.ptr.as_ptr().cast(), old_layout, new_layout.size())
            }
        };

        let Some(ptr) = NonNull::new(raw.cast::<T>()) else {
            tracing::debug!(
                requested_bytes = new_layout.size(),
                capacity = self.cap,
                "buffer allocation failed"
            );
            return Err(BufferError::AllocationFailed {
                requested_bytes: new_layout.size(),
            });
        };

        tracing::trace!(
            old_capacity = self.cap,
            new_capacity = new_cap,
            element_size = mem::size_of::<T>(),
            "buffer reallocated"
        );
        self.ptr = ptr;
        self.cap = new_cap;
        Ok(())
    }

    /// Return the block to the allocator and reset to the unallocated state.
    ///
    /// Idempotent. Does not drop any elements.
    pub(crate) fn release(&mut self) {
        if self.cap != 0 && !Self::IS_ZST {
            // SAFETY: the block is live and was allocated with this layout
            // (see `resize`).
            unsafe {
                let layout = Layout::array::<T>(self.cap).unwrap_unchecked();
                alloc::dealloc(self.ptr.as_ptr().cast(), layout);
            }
        }
        self.ptr = NonNull::dangling();
        self.cap = 0;
    }
}

impl<T> Drop for RawBuffer<T> {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_is_unallocated() {
        let raw: RawBuffer<u32> = RawBuffer::new();
        assert_eq!(raw.capacity(), 0);
        assert_eq!(raw.ptr(), NonNull::<u32>::dangling().as_ptr());
    }

    #[test]
    fn resize_grows_and_preserves_prefix() {
        let mut raw: RawBuffer<u64> = RawBuffer::new();
        raw.resize(2).unwrap();
        // SAFETY: both slots are within the fresh allocation.
        unsafe {
            raw.ptr().write(7);
            raw.ptr().add(1).write(9);
        }
        raw.resize(64).unwrap();
        assert_eq!(raw.capacity(), 64);
        // SAFETY: realloc preserved the first two initialised slots.
        unsafe {
            assert_eq!(raw.ptr().read(), 7);
            assert_eq!(raw.ptr().add(1).read(), 9);
        }
    }

    #[test]
    fn resize_to_zero_releases() {
        let mut raw: RawBuffer<u8> = RawBuffer::new();
        raw.resize(16).unwrap();
        raw.resize(0).unwrap();
        assert_eq!(raw.capacity(), 0);
    }

    #[test]
    fn release_is_idempotent() {
        let mut raw: RawBuffer<u16> = RawBuffer::new();
        raw.resize(4).unwrap();
        raw.release();
        raw.release();
        assert_eq!(raw.capacity(), 0);
    }

    #[test]
    fn zst_capacity_is_bookkeeping_only() {
        let mut raw: RawBuffer<()> = RawBuffer::new();
        raw.resize(1_000_000).unwrap();
        assert_eq!(raw.capacity(), 1_000_000);
        assert_eq!(raw.ptr(), NonNull::<()>::dangling().as_ptr());
    }

    #[test]
    fn layout_overflow_leaves_buffer_unchanged() {
        let mut raw: RawBuffer<u32> = RawBuffer::new();
        raw.resize(8).unwrap();
        let before = raw.ptr();
        let err = raw.resize(usize::MAX).unwrap_err();
        assert_eq!(err, BufferError::CapacityOverflow { requested: usize::MAX });
        assert_eq!(raw.capacity(), 8);
        assert_eq!(raw.ptr(), before);
    }
}
