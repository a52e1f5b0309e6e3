//! The generic growable buffer.
//!
//! [`GrowableBuffer<T>`] is a contiguous, exclusively-owned sequence of
//! `T` with explicit size/capacity bookkeeping. Capacity only changes
//! through [`reserve`](GrowableBuffer::reserve), automatic growth on
//! append/insert, and [`destroy`](GrowableBuffer::destroy); it is never
//! reduced by erasing or clearing.
//!
//! # States
//!
//! ```text
//!            create / first mutation
//!   Empty ──────────────────────────────► Allocated
//!     ▲                                      │
//!     └──────────── destroy / drop ──────────┘
//! ```
//!
//! Every operation is defined on `Empty`: reads return `0`/`None`, and
//! `clear`/`erase` are no-ops.
//!
//! # Threading
//!
//! There is no internal synchronisation. The buffer is `Send`/`Sync`
//! exactly when `T` is; sharing it mutably across threads needs an
//! external lock, which the borrow checker already demands.

#![allow(unsafe_code)]

use std::fmt;
use std::mem;
use std::ops::{Deref, DerefMut};
use std::ptr;
use std::slice;

use crate::config::GrowthPolicy;
use crate::error::BufferError;
use crate::iter::IntoIter;
use crate::raw::RawBuffer;

/// A contiguous growable buffer of `T` with fallible, policy-driven growth.
///
/// Indexing, slicing and iteration come from `Deref<Target = [T]>`.
/// References obtained from the buffer borrow it, so no call that may
/// reallocate (`reserve`, `insert`, `append`, `assign`) compiles while one
/// is alive.
///
/// ```
/// use growbuf::GrowableBuffer;
///
/// let mut buf = GrowableBuffer::new();
/// buf.append(69).unwrap();
/// buf.append(420).unwrap();
/// buf.append(777).unwrap();
/// assert_eq!(buf.iter().sum::<i32>(), 1266);
/// assert_eq!(buf[1], 420);
/// ```
pub struct GrowableBuffer<T> {
    raw: RawBuffer<T>,
    len: usize,
    policy: GrowthPolicy,
}

impl<T> GrowableBuffer<T> {
    /// Create an empty, unallocated buffer with the default growth policy.
    ///
    /// Nothing is allocated until the first mutation.
    pub const fn new() -> Self {
        Self {
            raw: RawBuffer::new(),
            len: 0,
            policy: GrowthPolicy::new(),
        }
    }

    /// Create an empty, unallocated buffer that grows according to `policy`.
    pub fn with_policy(policy: GrowthPolicy) -> Result<Self, BufferError> {
        policy.validate()?;
        Ok(Self {
            raw: RawBuffer::new(),
            len: 0,
            policy,
        })
    }

    /// Create an allocated buffer sized for the default initial capacity.
    pub fn create() -> Result<Self, BufferError> {
        Self::with_capacity(GrowthPolicy::DEFAULT_INITIAL_CAPACITY)
    }

    /// Create a buffer with room for exactly `capacity` elements.
    ///
    /// `capacity == 0` yields the unallocated state.
    pub fn with_capacity(capacity: usize) -> Result<Self, BufferError> {
        let mut buf = Self::new();
        buf.reserve(capacity)?;
        Ok(buf)
    }

    /// Drop every element, release the allocation, and return to the
    /// unallocated state.
    ///
    /// Idempotent: destroying an unallocated buffer does nothing.
    pub fn destroy(&mut self) {
        self.truncate(0);
        self.raw.release();
    }

    // ── Size and capacity ──────────────────────────────────────────

    /// Number of live elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Alias for [`len`](Self::len).
    #[inline]
    pub fn size(&self) -> usize {
        self.len
    }

    /// Number of slots currently allocated.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// `true` if the buffer holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// `true` if the buffer has left the unallocated state.
    ///
    /// For zero-sized `T` this tracks capacity bookkeeping only: such
    /// buffers never touch the allocator, so `create()` reports capacity 1
    /// and `is_allocated() == true` with no memory behind it.
    #[inline]
    pub fn is_allocated(&self) -> bool {
        self.raw.capacity() != 0
    }

    /// The growth policy this buffer was created with.
    pub fn policy(&self) -> &GrowthPolicy {
        &self.policy
    }

    // ── Element access ─────────────────────────────────────────────

    /// Bounds-checked access: `None` when `index >= len()`.
    #[inline]
    pub fn at(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    /// Bounds-checked mutable access: `None` when `index >= len()`.
    #[inline]
    pub fn at_mut(&mut self, index: usize) -> Option<&mut T> {
        self.as_mut_slice().get_mut(index)
    }

    /// The first element.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is empty. Use [`at(0)`](Self::at) to probe.
    #[inline]
    pub fn front(&self) -> &T {
        assert!(self.len != 0, "front() called on an empty buffer");
        &self.as_slice()[0]
    }

    /// Mutable reference to the first element.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is empty.
    #[inline]
    pub fn front_mut(&mut self) -> &mut T {
        assert!(self.len != 0, "front_mut() called on an empty buffer");
        &mut self.as_mut_slice()[0]
    }

    /// The last element.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is empty.
    #[inline]
    pub fn back(&self) -> &T {
        assert!(self.len != 0, "back() called on an empty buffer");
        &self.as_slice()[self.len - 1]
    }

    /// Mutable reference to the last element.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is empty.
    #[inline]
    pub fn back_mut(&mut self) -> &mut T {
        assert!(self.len != 0, "back_mut() called on an empty buffer");
        let last = self.len - 1;
        &mut self.as_mut_slice()[last]
    }

    /// View the live elements as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: the pointer is non-null and aligned (dangling when
        // unallocated) and `[0, len)` is initialised.
        unsafe { slice::from_raw_parts(self.raw.ptr(), self.len) }
    }

    /// View the live elements as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as in `as_slice`; `&mut self` guarantees uniqueness.
        unsafe { slice::from_raw_parts_mut(self.raw.ptr(), self.len) }
    }

    /// Base pointer of the element block.
    ///
    /// Dangling when unallocated. Invalidated by any call that may
    /// reallocate.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.raw.ptr()
    }

    /// Mutable base pointer of the element block.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.raw.ptr()
    }

    // ── Capacity management ────────────────────────────────────────

    /// Ensure `capacity() >= min_capacity`, reallocating to exactly
    /// `min_capacity` slots if the buffer is smaller.
    ///
    /// Existing elements keep their order and values; their addresses may
    /// change. On error nothing changes.
    pub fn reserve(&mut self, min_capacity: usize) -> Result<(), BufferError> {
        if min_capacity <= self.capacity() {
            return Ok(());
        }
        self.raw.resize(min_capacity)
    }

    /// Make room for `additional` more elements using the growth policy.
    fn grow_for(&mut self, additional: usize) -> Result<(), BufferError> {
        let required = self
            .len
            .checked_add(additional)
            .ok_or(BufferError::CapacityOverflow {
                requested: usize::MAX,
            })?;
        if required <= self.capacity() {
            return Ok(());
        }
        let new_cap = self
            .policy
            .next_capacity(self.capacity(), required)
            .ok_or(BufferError::CapacityOverflow {
                requested: required,
            })?;
        self.raw.resize(new_cap)
    }

    // ── Mutation ───────────────────────────────────────────────────

    /// Replace the whole content with clones of `src`.
    ///
    /// Capacity is reserved before the old content is dropped, so an
    /// allocation failure leaves the buffer untouched.
    pub fn assign(&mut self, src: &[T]) -> Result<(), BufferError>
    where
        T: Clone,
    {
        self.reserve(src.len())?;
        self.truncate(0);
        for value in src {
            self.push_within_capacity(value.clone());
        }
        Ok(())
    }

    /// Drop every element. Capacity and the allocation are kept.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Drop the elements past `len`. No-op if `len >= self.len()`.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }
        let tail = self.len - len;
        // Shrink first so a panicking destructor leaks instead of
        // double-dropping.
        self.len = len;
        // SAFETY: `[len, len + tail)` was initialised and is now outside
        // the live range, so it is dropped exactly once.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.raw.ptr().add(len), tail));
        }
    }

    /// Insert `value` at `index`, shifting `[index, len)` one slot right.
    ///
    /// `index == len()` appends. Grows per the policy when full. An index
    /// past the end is rejected with [`BufferError::OutOfBounds`] and the
    /// buffer is unchanged.
    pub fn insert(&mut self, index: usize, value: T) -> Result<(), BufferError> {
        if index > self.len {
            return Err(BufferError::OutOfBounds {
                index,
                len: self.len,
            });
        }
        self.grow_for(1)?;
        // SAFETY: capacity > len after growth, so the shifted range
        // `[index + 1, len + 1)` is in bounds. `ptr::copy` handles the
        // overlap.
        unsafe {
            let hole = self.raw.ptr().add(index);
            ptr::copy(hole, hole.add(1), self.len - index);
            ptr::write(hole, value);
        }
        self.len += 1;
        Ok(())
    }

    /// Remove and return the element at `index`, shifting `[index + 1, len)`
    /// one slot left.
    ///
    /// Returns `None` and changes nothing when `index >= len()`. Never
    /// shrinks capacity.
    pub fn erase(&mut self, index: usize) -> Option<T> {
        if index >= self.len {
            return None;
        }
        // SAFETY: `index < len`, so the read is of a live element and the
        // source range `[index + 1, len)` is initialised. After the move
        // the old last slot is logically vacated by decrementing `len`.
        unsafe {
            let hole = self.raw.ptr().add(index);
            let value = ptr::read(hole);
            ptr::copy(hole.add(1), hole, self.len - index - 1);
            self.len -= 1;
            Some(value)
        }
    }

    /// Append `value` at the end. O(1) amortised.
    pub fn append(&mut self, value: T) -> Result<(), BufferError> {
        self.grow_for(1)?;
        self.push_within_capacity(value);
        Ok(())
    }

    /// Alias for [`append`](Self::append).
    #[inline]
    pub fn push(&mut self, value: T) -> Result<(), BufferError> {
        self.append(value)
    }

    /// Remove and return the last element, or `None` if empty.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: the slot at the old `len - 1` is initialised and no
        // longer in the live range.
        unsafe { Some(ptr::read(self.raw.ptr().add(self.len))) }
    }

    /// Resize to `new_len`, cloning `value` into new slots or dropping the
    /// excess.
    pub fn resize(&mut self, new_len: usize, value: T) -> Result<(), BufferError>
    where
        T: Clone,
    {
        if new_len <= self.len {
            self.truncate(new_len);
            return Ok(());
        }
        self.grow_for(new_len - self.len)?;
        while self.len < new_len {
            self.push_within_capacity(value.clone());
        }
        Ok(())
    }

    /// Write `value` into the slot at `len`. Caller guarantees capacity.
    #[inline]
    fn push_within_capacity(&mut self, value: T) {
        debug_assert!(self.len < self.capacity());
        // SAFETY: `len < capacity`, so the slot is allocated and vacant.
        unsafe { ptr::write(self.raw.ptr().add(self.len), value) };
        self.len += 1;
    }

    /// Detach the storage for by-value iteration.
    fn take_raw(&mut self) -> (RawBuffer<T>, usize) {
        let len = mem::replace(&mut self.len, 0);
        (mem::replace(&mut self.raw, RawBuffer::new()), len)
    }
}

/// Panic for growth failures inside trait impls that cannot return errors,
/// matching how std collections treat allocation failure.
#[track_caller]
fn grown_or_panic(result: Result<(), BufferError>) {
    if let Err(e) = result {
        panic!("growbuf: {e}");
    }
}

impl<T> Drop for GrowableBuffer<T> {
    fn drop(&mut self) {
        // `raw` frees the block after this body runs.
        self.truncate(0);
    }
}

impl<T> Default for GrowableBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Deref for GrowableBuffer<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> DerefMut for GrowableBuffer<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T> AsRef<[T]> for GrowableBuffer<T> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> AsMut<[T]> for GrowableBuffer<T> {
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: Clone> Clone for GrowableBuffer<T> {
    fn clone(&self) -> Self {
        let mut copy = Self {
            raw: RawBuffer::new(),
            len: 0,
            policy: self.policy,
        };
        grown_or_panic(copy.assign(self.as_slice()));
        copy
    }
}

impl<T: fmt::Debug> fmt::Debug for GrowableBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T, U> PartialEq<GrowableBuffer<U>> for GrowableBuffer<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &GrowableBuffer<U>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for GrowableBuffer<T> {}

impl<T, U> PartialEq<[U]> for GrowableBuffer<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T, U> PartialEq<&[U]> for GrowableBuffer<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &&[U]) -> bool {
        self.as_slice() == *other
    }
}

impl<T, U, const N: usize> PartialEq<[U; N]> for GrowableBuffer<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T, U> PartialEq<Vec<U>> for GrowableBuffer<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &Vec<U>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T> Extend<T> for GrowableBuffer<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        grown_or_panic(self.grow_for(lower));
        for value in iter {
            grown_or_panic(self.append(value));
        }
    }
}

impl<'a, T: Copy + 'a> Extend<&'a T> for GrowableBuffer<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T> FromIterator<T> for GrowableBuffer<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut buf = Self::new();
        buf.extend(iter);
        buf
    }
}

impl<T: Clone> From<&[T]> for GrowableBuffer<T> {
    fn from(src: &[T]) -> Self {
        let mut buf = Self::new();
        grown_or_panic(buf.assign(src));
        buf
    }
}

impl<T> From<Vec<T>> for GrowableBuffer<T> {
    fn from(src: Vec<T>) -> Self {
        src.into_iter().collect()
    }
}

impl<T> IntoIterator for GrowableBuffer<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(mut self) -> IntoIter<T> {
        let (raw, len) = self.take_raw();
        IntoIter::new(raw, len)
    }
}

impl<'a, T> IntoIterator for &'a GrowableBuffer<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> slice::Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut GrowableBuffer<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> slice::IterMut<'a, T> {
        self.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use tracing_test::traced_test;

    /// Counts drops through a shared cell.
    #[derive(Clone)]
    struct DropCounter {
        drops: Rc<Cell<usize>>,
    }

    impl Drop for DropCounter {
        fn drop(&mut self) {
            self.drops.set(self.drops.get() + 1);
        }
    }

    fn counter(drops: &Rc<Cell<usize>>) -> DropCounter {
        DropCounter {
            drops: Rc::clone(drops),
        }
    }

    #[test]
    fn new_is_empty_state() {
        let buf: GrowableBuffer<i32> = GrowableBuffer::new();
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.capacity(), 0);
        assert!(!buf.is_allocated());
        assert_eq!(buf.at(0), None);
    }

    #[test]
    fn create_allocates_initial_capacity() {
        let buf: GrowableBuffer<i32> = GrowableBuffer::create().unwrap();
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.capacity(), GrowthPolicy::DEFAULT_INITIAL_CAPACITY);
        assert!(buf.is_allocated());
    }

    #[test]
    fn with_policy_rejects_invalid_policy() {
        let policy = GrowthPolicy {
            scale_factor: 1.0,
            ..GrowthPolicy::new()
        };
        let err = GrowableBuffer::<u8>::with_policy(policy).unwrap_err();
        assert!(matches!(err, BufferError::Config(_)));
    }

    #[test]
    fn append_grows_by_policy() {
        let mut buf = GrowableBuffer::new();
        let mut caps = Vec::new();
        for i in 0..8u32 {
            buf.append(i).unwrap();
            caps.push(buf.capacity());
        }
        assert_eq!(caps, vec![1, 2, 4, 4, 7, 7, 7, 11]);
        assert_eq!(buf, [0, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn custom_policy_drives_growth() {
        let policy = GrowthPolicy {
            initial_capacity: 8,
            scale_factor: 2.0,
            bias: 0,
        };
        let mut buf = GrowableBuffer::with_policy(policy).unwrap();
        buf.append(1u8).unwrap();
        assert_eq!(buf.capacity(), 8);
        buf.extend(2..=9);
        assert_eq!(buf.capacity(), 16);
        assert_eq!(buf.policy(), &policy);
    }

    #[test]
    fn reserve_is_exact_and_noop_when_smaller() {
        let mut buf: GrowableBuffer<u16> = GrowableBuffer::new();
        buf.reserve(10).unwrap();
        assert_eq!(buf.capacity(), 10);
        assert_eq!(buf.len(), 0);
        buf.reserve(3).unwrap();
        assert_eq!(buf.capacity(), 10);
    }

    #[test]
    fn reserve_preserves_content() {
        let mut buf: GrowableBuffer<String> =
            ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        buf.reserve(1000).unwrap();
        assert_eq!(buf, ["a", "b", "c"]);
    }

    #[test]
    fn reserve_overflow_is_reported_and_harmless() {
        let mut buf: GrowableBuffer<u32> = GrowableBuffer::from(&[1, 2, 3][..]);
        let cap = buf.capacity();
        let err = buf.reserve(usize::MAX).unwrap_err();
        assert!(matches!(err, BufferError::CapacityOverflow { .. }));
        assert_eq!(buf.capacity(), cap);
        assert_eq!(buf, [1, 2, 3]);
    }

    #[test]
    fn reserve_allocation_failure_is_reported_and_harmless() {
        let mut buf: GrowableBuffer<u64> = GrowableBuffer::from(&[4, 5][..]);
        let cap = buf.capacity();
        // Just under isize::MAX bytes: a valid layout no allocator can serve.
        let err = buf.reserve(isize::MAX as usize / 8 - 1).unwrap_err();
        assert!(matches!(err, BufferError::AllocationFailed { .. }));
        assert_eq!(buf.capacity(), cap);
        assert_eq!(buf, [4, 5]);
    }

    #[test]
    fn at_is_bounds_checked() {
        let mut buf = GrowableBuffer::from(vec![10, 20]);
        assert_eq!(buf.at(1), Some(&20));
        assert_eq!(buf.at(2), None);
        *buf.at_mut(0).unwrap() = 11;
        assert_eq!(buf[0], 11);
        assert!(buf.at_mut(5).is_none());
    }

    #[test]
    fn front_and_back() {
        let mut buf = GrowableBuffer::from(vec!['S', 'P', 'A', 'M']);
        *buf.front_mut() = 'F';
        *buf.back_mut() = 'B';
        assert_eq!(*buf.front(), 'F');
        assert_eq!(*buf.back(), 'B');
        assert_eq!(buf, ['F', 'P', 'A', 'B']);
    }

    #[test]
    #[should_panic(expected = "front() called on an empty buffer")]
    fn front_on_empty_panics() {
        let buf: GrowableBuffer<u8> = GrowableBuffer::new();
        buf.front();
    }

    #[test]
    #[should_panic(expected = "back() called on an empty buffer")]
    fn back_on_empty_panics() {
        let buf: GrowableBuffer<u8> = GrowableBuffer::create().unwrap();
        buf.back();
    }

    #[test]
    fn assign_replaces_content() {
        let mut buf = GrowableBuffer::from(vec![1, 2, 3, 4, 5]);
        let cap = buf.capacity();
        buf.assign(&[9, 8]).unwrap();
        assert_eq!(buf, [9, 8]);
        assert_eq!(buf.capacity(), cap);
    }

    #[test]
    fn clear_keeps_allocation() {
        let mut buf = GrowableBuffer::from(vec![1u8; 32]);
        let cap = buf.capacity();
        let ptr = buf.as_ptr();
        buf.clear();
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.capacity(), cap);
        for i in 0..32 {
            buf.append(i).unwrap();
        }
        assert_eq!(buf.as_ptr(), ptr);
    }

    #[test]
    fn insert_shifts_right() {
        let mut buf = GrowableBuffer::from(vec![1, 2, 3]);
        buf.insert(0, 0).unwrap();
        buf.insert(2, 9).unwrap();
        buf.insert(buf.len(), 4).unwrap();
        assert_eq!(buf, [0, 1, 9, 2, 3, 4]);
    }

    #[test]
    fn insert_past_end_is_rejected_without_effect() {
        let mut buf = GrowableBuffer::from(vec!['A']);
        let cap = buf.capacity();
        let err = buf.insert(69, 'A').unwrap_err();
        assert_eq!(err, BufferError::OutOfBounds { index: 69, len: 1 });
        assert_eq!(buf, ['A']);
        assert_eq!(buf.capacity(), cap);
    }

    #[test]
    fn insert_on_empty_allocates() {
        let mut buf = GrowableBuffer::new();
        buf.insert(0, 'A').unwrap();
        assert!(buf.is_allocated());
        assert_eq!(buf, ['A']);
    }

    #[test]
    fn erase_shifts_left_and_keeps_capacity() {
        let mut buf = GrowableBuffer::from(vec![1, 2, 3, 4]);
        let cap = buf.capacity();
        assert_eq!(buf.erase(1), Some(2));
        assert_eq!(buf.erase(2), Some(4));
        assert_eq!(buf, [1, 3]);
        assert_eq!(buf.capacity(), cap);
    }

    #[test]
    fn erase_out_of_bounds_is_noop() {
        let mut buf = GrowableBuffer::from(vec![1]);
        assert_eq!(buf.erase(69), None);
        assert_eq!(buf, [1]);
        let mut empty: GrowableBuffer<i32> = GrowableBuffer::new();
        assert_eq!(empty.erase(0), None);
    }

    #[test]
    fn pop_and_truncate() {
        let mut buf = GrowableBuffer::from(vec![1, 2, 3, 4]);
        assert_eq!(buf.pop(), Some(4));
        buf.truncate(1);
        assert_eq!(buf, [1]);
        buf.truncate(5);
        assert_eq!(buf, [1]);
        assert_eq!(buf.pop(), Some(1));
        assert_eq!(buf.pop(), None);
    }

    #[test]
    fn resize_fills_and_truncates() {
        let mut buf = GrowableBuffer::new();
        buf.resize(3, 7u8).unwrap();
        assert_eq!(buf, [7, 7, 7]);
        buf.resize(1, 0).unwrap();
        assert_eq!(buf, [7]);
    }

    #[test]
    fn destroy_returns_to_empty_state() {
        let mut buf = GrowableBuffer::from(vec![1, 2, 3]);
        buf.destroy();
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.capacity(), 0);
        assert!(!buf.is_allocated());
        buf.destroy();
        buf.append(5).unwrap();
        assert_eq!(buf, [5]);
    }

    #[test]
    fn every_element_dropped_exactly_once() {
        let drops = Rc::new(Cell::new(0));
        {
            let mut buf = GrowableBuffer::new();
            for _ in 0..10 {
                buf.append(counter(&drops)).unwrap();
            }
            buf.insert(3, counter(&drops)).unwrap();
            drop(buf.erase(0));
            assert_eq!(drops.get(), 1);
            buf.truncate(8);
            assert_eq!(drops.get(), 3);
            buf.assign(&[counter(&drops)]).unwrap();
            // 8 old elements and the temporary source element.
            assert_eq!(drops.get(), 12);
            buf.destroy();
            assert_eq!(drops.get(), 13);
            buf.append(counter(&drops)).unwrap();
        }
        assert_eq!(drops.get(), 14);
    }

    #[test]
    fn zero_sized_elements() {
        let mut buf = GrowableBuffer::new();
        for _ in 0..100 {
            buf.append(()).unwrap();
        }
        buf.insert(50, ()).unwrap();
        assert_eq!(buf.erase(0), Some(()));
        assert_eq!(buf.len(), 100);
        assert!(buf.capacity() >= 100);
    }

    #[test]
    fn zero_sized_state_is_bookkeeping_only() {
        let mut buf: GrowableBuffer<()> = GrowableBuffer::create().unwrap();
        assert_eq!(buf.capacity(), 1);
        assert!(buf.is_allocated());
        assert_eq!(
            buf.as_ptr(),
            std::ptr::NonNull::<()>::dangling().as_ptr().cast_const()
        );

        buf.destroy();
        assert_eq!(buf.capacity(), 0);
        assert!(!buf.is_allocated());
    }

    #[test]
    fn clone_is_deep() {
        let mut a = GrowableBuffer::from(vec![String::from("x")]);
        let b = a.clone();
        a[0].push('y');
        assert_eq!(a, [String::from("xy")]);
        assert_eq!(b, [String::from("x")]);
        assert_ne!(a.as_ptr(), b.as_ptr());
    }

    #[test]
    fn debug_formats_as_list() {
        let buf = GrowableBuffer::from(vec![1, 2]);
        assert_eq!(format!("{buf:?}"), "[1, 2]");
    }

    #[test]
    fn slice_protocol_interop() {
        let mut buf: GrowableBuffer<i32> = (0..5).rev().collect();
        buf.sort_unstable();
        assert_eq!(buf.iter().copied().max(), Some(4));
        for v in &mut buf {
            *v *= 10;
        }
        let collected: Vec<i32> = (&buf).into_iter().copied().collect();
        assert_eq!(collected, vec![0, 10, 20, 30, 40]);
        assert!(buf.contains(&30));
    }

    #[test]
    fn buffer_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GrowableBuffer<u32>>();
        assert_send_sync::<IntoIter<String>>();
    }

    #[traced_test]
    #[test]
    fn reallocation_is_traced() {
        let mut buf = GrowableBuffer::new();
        buf.append(1u32).unwrap();
        buf.append(2u32).unwrap();
        assert!(logs_contain("buffer reallocated"));
        assert!(logs_contain("new_capacity=2"));
    }
}
