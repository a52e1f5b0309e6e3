//! Type-erased buffer addressed by element width.
//!
//! [`ErasedBuffer`] is the rendition of [`GrowableBuffer`] for hosts that
//! have no generics: each element is an opaque run of `element_width`
//! bytes fixed at creation. It backs the C ABI in `growbuf-ffi`.
//!
//! Storage is a `GrowableBuffer` of 16-byte aligned blocks, so element
//! `i` starts at byte `i * element_width` of a 16-aligned allocation and
//! any C type whose size is `element_width` can be read in place. The
//! block buffer is kept fully initialised up to capacity, which lets the
//! insert/erase shifts use `copy_within` over a plain byte slice.

use bytemuck::{Pod, Zeroable};

use crate::buffer::GrowableBuffer;
use crate::config::GrowthPolicy;
use crate::error::BufferError;

const BLOCK_BYTES: usize = 16;

#[derive(Clone, Copy, Pod, Zeroable)]
#[repr(C, align(16))]
struct Block([u8; BLOCK_BYTES]);

/// A growable buffer of fixed-width opaque elements.
///
/// Same contract as [`GrowableBuffer`]: `len() <= capacity()`, capacity
/// only grows (until [`destroy`](Self::destroy)), and failed mutations
/// leave the buffer unchanged. Counts are in elements, not bytes.
#[derive(Clone)]
pub struct ErasedBuffer {
    blocks: GrowableBuffer<Block>,
    width: usize,
    len: usize,
    capacity: usize,
    policy: GrowthPolicy,
}

impl ErasedBuffer {
    /// Create an unallocated buffer of `element_width`-byte elements.
    pub fn new(element_width: usize) -> Result<Self, BufferError> {
        Self::with_policy(element_width, GrowthPolicy::new())
    }

    /// Create an unallocated buffer with a custom growth policy.
    pub fn with_policy(element_width: usize, policy: GrowthPolicy) -> Result<Self, BufferError> {
        if element_width == 0 {
            return Err(BufferError::ZeroWidth);
        }
        policy.validate()?;
        Ok(Self {
            blocks: GrowableBuffer::new(),
            width: element_width,
            len: 0,
            capacity: 0,
            policy,
        })
    }

    /// Create a buffer allocated for the policy's initial capacity.
    pub fn create(element_width: usize) -> Result<Self, BufferError> {
        let mut buf = Self::new(element_width)?;
        buf.reserve(buf.policy.initial_capacity)?;
        Ok(buf)
    }

    /// Release the allocation and return to the unallocated state.
    /// The element width is kept.
    pub fn destroy(&mut self) {
        self.blocks.destroy();
        self.len = 0;
        self.capacity = 0;
    }

    /// Byte width of one element.
    pub fn element_width(&self) -> usize {
        self.width
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// `true` if no elements are live.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of element slots allocated.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// `true` if the buffer has left the unallocated state.
    pub fn is_allocated(&self) -> bool {
        self.capacity != 0
    }

    /// The live elements as one contiguous byte slice.
    pub fn as_bytes(&self) -> &[u8] {
        &self.storage()[..self.len * self.width]
    }

    /// The live elements as one contiguous mutable byte slice.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        let end = self.len * self.width;
        &mut self.storage_mut()[..end]
    }

    /// Bytes of the element at `index`, or `None` if out of bounds.
    pub fn at(&self, index: usize) -> Option<&[u8]> {
        if index >= self.len {
            return None;
        }
        let start = index * self.width;
        Some(&self.storage()[start..start + self.width])
    }

    /// Mutable bytes of the element at `index`, or `None` if out of bounds.
    pub fn at_mut(&mut self, index: usize) -> Option<&mut [u8]> {
        if index >= self.len {
            return None;
        }
        let start = index * self.width;
        let end = start + self.width;
        Some(&mut self.storage_mut()[start..end])
    }

    /// Bytes of the first element.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is empty.
    pub fn front(&self) -> &[u8] {
        match self.at(0) {
            Some(bytes) => bytes,
            None => panic!("front() called on an empty buffer"),
        }
    }

    /// Bytes of the last element.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is empty.
    pub fn back(&self) -> &[u8] {
        match self.len.checked_sub(1).and_then(|last| self.at(last)) {
            Some(bytes) => bytes,
            None => panic!("back() called on an empty buffer"),
        }
    }

    /// Ensure room for at least `min_capacity` elements, growing to
    /// exactly that many slots if needed. On error nothing changes.
    pub fn reserve(&mut self, min_capacity: usize) -> Result<(), BufferError> {
        if min_capacity <= self.capacity {
            return Ok(());
        }
        let bytes = min_capacity
            .checked_mul(self.width)
            .ok_or(BufferError::CapacityOverflow {
                requested: min_capacity,
            })?;
        let blocks = bytes.div_ceil(BLOCK_BYTES);
        self.blocks.reserve(blocks).map_err(|e| match e {
            BufferError::CapacityOverflow { .. } => BufferError::CapacityOverflow {
                requested: min_capacity,
            },
            other => other,
        })?;
        // Capacity is already there, so this cannot fail.
        self.blocks.resize(blocks, Block::zeroed())?;
        self.capacity = min_capacity;
        Ok(())
    }

    /// Replace the content with `count` elements copied from `bytes`.
    ///
    /// `bytes.len()` must be exactly `count * element_width()`.
    pub fn assign(&mut self, bytes: &[u8], count: usize) -> Result<(), BufferError> {
        let expected = count
            .checked_mul(self.width)
            .ok_or(BufferError::CapacityOverflow { requested: count })?;
        if bytes.len() != expected {
            return Err(BufferError::WidthMismatch {
                expected,
                actual: bytes.len(),
            });
        }
        self.reserve(count)?;
        self.storage_mut()[..expected].copy_from_slice(bytes);
        self.len = count;
        Ok(())
    }

    /// Drop every element. Capacity is kept.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Insert one element at `index`, shifting later elements right.
    ///
    /// `value` must be exactly `element_width()` bytes. `index == len()`
    /// appends; `index > len()` is rejected without effect.
    pub fn insert(&mut self, index: usize, value: &[u8]) -> Result<(), BufferError> {
        self.check_width(value)?;
        if index > self.len {
            return Err(BufferError::OutOfBounds {
                index,
                len: self.len,
            });
        }
        self.grow_for_one()?;
        let w = self.width;
        let end = self.len * w;
        let storage = self.storage_mut();
        storage.copy_within(index * w..end, (index + 1) * w);
        storage[index * w..(index + 1) * w].copy_from_slice(value);
        self.len += 1;
        Ok(())
    }

    /// Remove the element at `index`, shifting later elements left.
    ///
    /// Returns `false` and changes nothing if `index >= len()`.
    pub fn erase(&mut self, index: usize) -> bool {
        if index >= self.len {
            return false;
        }
        let w = self.width;
        let end = self.len * w;
        self.storage_mut().copy_within((index + 1) * w..end, index * w);
        self.len -= 1;
        true
    }

    /// Append one element of exactly `element_width()` bytes.
    pub fn append(&mut self, value: &[u8]) -> Result<(), BufferError> {
        self.insert(self.len, value)
    }

    /// Base pointer of the element storage, null-free but dangling when
    /// unallocated. Invalidated by any call that may reallocate.
    pub fn as_ptr(&self) -> *const u8 {
        self.blocks.as_ptr().cast()
    }

    /// Mutable base pointer of the element storage.
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.blocks.as_mut_ptr().cast()
    }

    fn check_width(&self, value: &[u8]) -> Result<(), BufferError> {
        if value.len() != self.width {
            return Err(BufferError::WidthMismatch {
                expected: self.width,
                actual: value.len(),
            });
        }
        Ok(())
    }

    fn grow_for_one(&mut self) -> Result<(), BufferError> {
        if self.len < self.capacity {
            return Ok(());
        }
        let new_cap = self
            .policy
            .next_capacity(self.capacity, self.len + 1)
            .ok_or(BufferError::CapacityOverflow {
                requested: self.len + 1,
            })?;
        self.reserve(new_cap)
    }

    fn storage(&self) -> &[u8] {
        bytemuck::cast_slice(self.blocks.as_slice())
    }

    fn storage_mut(&mut self) -> &mut [u8] {
        bytemuck::cast_slice_mut(self.blocks.as_mut_slice())
    }
}

impl std::fmt::Debug for ErasedBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErasedBuffer")
            .field("element_width", &self.width)
            .field("len", &self.len)
            .field("capacity", &self.capacity)
            .finish()
    }
}
