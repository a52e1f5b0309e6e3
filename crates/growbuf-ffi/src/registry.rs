//! Buffers owned on behalf of C callers.
//!
//! Handles come from a counter that starts at 1 and only moves forward, so
//! a handle value is issued at most once per process. A destroyed handle
//! therefore never resolves again, and 0 is never valid, which lets C code
//! use it as "no buffer".

use std::collections::BTreeMap;

use growbuf::ErasedBuffer;

pub(crate) struct BufferRegistry {
    buffers: BTreeMap<u64, ErasedBuffer>,
    next_handle: u64,
}

impl BufferRegistry {
    pub(crate) const fn new() -> Self {
        Self {
            buffers: BTreeMap::new(),
            next_handle: 1,
        }
    }

    /// Number of buffers not yet destroyed.
    pub(crate) fn live(&self) -> usize {
        self.buffers.len()
    }

    /// Take ownership of `buf` and issue a fresh handle for it.
    ///
    /// Returns `None`, dropping `buf`, once the handle space is used up.
    pub(crate) fn register(&mut self, buf: ErasedBuffer) -> Option<u64> {
        let handle = self.next_handle;
        self.next_handle = handle.checked_add(1)?;
        self.buffers.insert(handle, buf);
        Some(handle)
    }

    pub(crate) fn get(&self, handle: u64) -> Option<&ErasedBuffer> {
        self.buffers.get(&handle)
    }

    pub(crate) fn get_mut(&mut self, handle: u64) -> Option<&mut ErasedBuffer> {
        self.buffers.get_mut(&handle)
    }

    /// Hand back the buffer behind `handle`; `None` if it was never issued
    /// or is already gone.
    pub(crate) fn unregister(&mut self, handle: u64) -> Option<ErasedBuffer> {
        self.buffers.remove(&handle)
    }
}
