//! By-value iteration over a consumed buffer.

#![allow(unsafe_code)]

use std::fmt;
use std::iter::FusedIterator;
use std::ptr;
use std::slice;

use crate::raw::RawBuffer;

/// Owning iterator returned by `GrowableBuffer::into_iter`.
///
/// Holds the buffer's allocation; elements in `[start, end)` are still
/// live and are dropped with the iterator if not consumed.
pub struct IntoIter<T> {
    raw: RawBuffer<T>,
    start: usize,
    end: usize,
}

impl<T> IntoIter<T> {
    pub(crate) fn new(raw: RawBuffer<T>, len: usize) -> Self {
        Self {
            raw,
            start: 0,
            end: len,
        }
    }

    /// The elements not yet yielded.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: `[start, end)` is initialised and within the allocation.
        unsafe { slice::from_raw_parts(self.raw.ptr().add(self.start), self.end - self.start) }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        // SAFETY: `start < end`, so the slot is live; advancing `start`
        // removes it from the live range.
        let value = unsafe { ptr::read(self.raw.ptr().add(self.start)) };
        self.start += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.start;
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        self.end -= 1;
        // SAFETY: the slot at the old `end - 1` is live and now outside
        // the live range.
        Some(unsafe { ptr::read(self.raw.ptr().add(self.end)) })
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        let remaining = self.end - self.start;
        let first = self.start;
        self.start = self.end;
        // SAFETY: the unconsumed range is live and dropped exactly once;
        // `raw` frees the block afterwards.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                self.raw.ptr().add(first),
                remaining,
            ));
        }
    }
}
