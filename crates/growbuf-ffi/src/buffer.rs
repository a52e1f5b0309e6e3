//! Buffer lifecycle and element access across the C boundary.
//!
//! Buffers live in one global `BUFFERS` registry. Each call locks it only for
//! its own duration. Element pointers returned by `growbuf_at`,
//! `growbuf_front`, `growbuf_back` and `growbuf_data` point into the
//! buffer's storage and are invalidated by `growbuf_reserve`,
//! `growbuf_assign`, `growbuf_insert`, `growbuf_append` and
//! `growbuf_destroy`.

use std::ffi::c_void;
use std::ptr;
use std::sync::Mutex;

use growbuf::ErasedBuffer;

use crate::registry::BufferRegistry;
use crate::status::GrowbufStatus;

static BUFFERS: Mutex<BufferRegistry> = Mutex::new(BufferRegistry::new());

/// Snapshot of a buffer's bookkeeping, filled by [`growbuf_info`].
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GrowbufInfo {
    /// Number of live elements.
    pub size: u64,
    /// Number of element slots allocated.
    pub capacity: u64,
    /// Byte width of one element.
    pub element_width: u64,
}

const _: () = assert!(std::mem::size_of::<GrowbufInfo>() == 24);
const _: () = assert!(std::mem::align_of::<GrowbufInfo>() == 8);

/// Run `f` on the buffer behind `handle` with the registry locked.
fn with_buffer<R>(
    handle: u64,
    f: impl FnOnce(&mut ErasedBuffer) -> R,
) -> Result<R, GrowbufStatus> {
    let mut registry = BUFFERS.lock().map_err(|_| GrowbufStatus::InternalError)?;
    match registry.get_mut(handle) {
        Some(buf) => Ok(f(buf)),
        None => {
            tracing::debug!(handle, "invalid buffer handle");
            Err(GrowbufStatus::InvalidHandle)
        }
    }
}

/// Read-only variant of [`with_buffer`] for accessors that report
/// invalid handles as a zero value.
fn read_buffer<R>(handle: u64, f: impl FnOnce(&ErasedBuffer) -> R) -> Option<R> {
    let registry = BUFFERS.lock().ok()?;
    let found = registry.get(handle).map(f);
    if found.is_none() {
        tracing::debug!(handle, "invalid buffer handle");
    }
    found
}

fn to_code(result: Result<GrowbufStatus, GrowbufStatus>) -> i32 {
    match result {
        Ok(status) | Err(status) => status as i32,
    }
}

/// Borrow `count` elements of `width` bytes from a C pointer.
///
/// # Safety
///
/// Unless `count` is 0, `src` must be valid for reads of
/// `count * width` bytes for the returned lifetime.
#[allow(unsafe_code)]
unsafe fn element_bytes<'a>(
    src: *const c_void,
    count: usize,
    width: usize,
) -> Result<&'a [u8], GrowbufStatus> {
    if count == 0 {
        return Ok(&[]);
    }
    if src.is_null() {
        return Err(GrowbufStatus::InvalidArgument);
    }
    let len = count
        .checked_mul(width)
        .filter(|&len| len <= isize::MAX as usize)
        .ok_or(GrowbufStatus::CapacityOverflow)?;
    // SAFETY: src is non-null and readable for len bytes per caller
    // contract; len fits in isize.
    Ok(unsafe { std::slice::from_raw_parts(src.cast::<u8>(), len) })
}

/// Create a buffer of `element_width`-byte elements, allocated for one
/// element.
///
/// On success, writes the handle to `handle_out` and returns `GROWBUF_STATUS_OK`.
/// A zero `element_width` or null `handle_out` is `INVALID_ARGUMENT`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn growbuf_create(element_width: usize, handle_out: *mut u64) -> i32 {
    ffi_guard!({
        if handle_out.is_null() {
            return GrowbufStatus::InvalidArgument as i32;
        }
        let buf = match ErasedBuffer::create(element_width) {
            Ok(buf) => buf,
            Err(e) => return GrowbufStatus::from(&e) as i32,
        };
        let handle = match ffi_lock!(BUFFERS).register(buf) {
            Some(handle) => handle,
            None => {
                tracing::debug!("buffer handle space exhausted");
                return GrowbufStatus::InternalError as i32;
            }
        };
        // SAFETY: handle_out is non-null and writable per caller contract.
        unsafe { *handle_out = handle };
        GrowbufStatus::Ok as i32
    })
}

/// Destroy a buffer and free its storage.
///
/// A second destroy of the same handle returns `INVALID_HANDLE`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn growbuf_destroy(handle: u64) -> i32 {
    ffi_guard!({
        let mut registry = ffi_lock!(BUFFERS);
        match registry.unregister(handle) {
            Some(_) => {
                tracing::trace!(handle, live = registry.live(), "buffer destroyed");
                GrowbufStatus::Ok as i32
            }
            None => {
                tracing::debug!(handle, "destroy of unknown buffer handle");
                GrowbufStatus::InvalidHandle as i32
            }
        }
    })
}

/// Number of live elements, or 0 for an invalid handle.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn growbuf_size(handle: u64) -> usize {
    ffi_guard_or!(0, { read_buffer(handle, |buf| buf.len()).unwrap_or(0) })
}

/// Number of element slots allocated, or 0 for an invalid handle.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn growbuf_capacity(handle: u64) -> usize {
    ffi_guard_or!(0, {
        read_buffer(handle, |buf| buf.capacity()).unwrap_or(0)
    })
}

/// Byte width of one element, or 0 for an invalid handle.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn growbuf_element_width(handle: u64) -> usize {
    ffi_guard_or!(0, {
        read_buffer(handle, |buf| buf.element_width()).unwrap_or(0)
    })
}

/// Fill `info_out` with size, capacity and element width in one call.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn growbuf_info(handle: u64, info_out: *mut GrowbufInfo) -> i32 {
    ffi_guard!({
        if info_out.is_null() {
            return GrowbufStatus::InvalidArgument as i32;
        }
        let info = match with_buffer(handle, |buf| GrowbufInfo {
            size: buf.len() as u64,
            capacity: buf.capacity() as u64,
            element_width: buf.element_width() as u64,
        }) {
            Ok(info) => info,
            Err(status) => return status as i32,
        };
        // SAFETY: info_out is non-null and writable per caller contract.
        unsafe { *info_out = info };
        GrowbufStatus::Ok as i32
    })
}

/// Grow capacity to at least `min_capacity` elements. Never shrinks.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn growbuf_reserve(handle: u64, min_capacity: usize) -> i32 {
    ffi_guard!({
        to_code(with_buffer(handle, |buf| {
            GrowbufStatus::from(buf.reserve(min_capacity))
        }))
    })
}

/// Replace the content with `count` elements read from `src`.
///
/// `src` must hold `count * element_width` bytes; it may be null only
/// when `count` is 0.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn growbuf_assign(handle: u64, src: *const c_void, count: usize) -> i32 {
    ffi_guard!({
        to_code(with_buffer(handle, |buf| {
            // SAFETY: src readable for count elements per caller contract.
            match unsafe { element_bytes(src, count, buf.element_width()) } {
                Ok(bytes) => GrowbufStatus::from(buf.assign(bytes, count)),
                Err(status) => status,
            }
        }))
    })
}

/// Pointer to the element at `index`, or null if out of range or the
/// handle is invalid.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn growbuf_at(handle: u64, index: usize) -> *mut c_void {
    ffi_guard_or!(ptr::null_mut(), {
        with_buffer(handle, |buf| element_ptr(buf, index)).unwrap_or(ptr::null_mut())
    })
}

/// Pointer to the first element, or null if the buffer is empty.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn growbuf_front(handle: u64) -> *mut c_void {
    growbuf_at(handle, 0)
}

/// Pointer to the last element, or null if the buffer is empty.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn growbuf_back(handle: u64) -> *mut c_void {
    ffi_guard_or!(ptr::null_mut(), {
        with_buffer(handle, |buf| match buf.len().checked_sub(1) {
            Some(last) => element_ptr(buf, last),
            None => ptr::null_mut(),
        })
        .unwrap_or(ptr::null_mut())
    })
}

/// Base pointer of the element storage, 16-byte aligned. Null for an
/// invalid handle or a buffer with no allocation.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn growbuf_data(handle: u64) -> *mut c_void {
    ffi_guard_or!(ptr::null_mut(), {
        with_buffer(handle, |buf| {
            if buf.is_allocated() {
                buf.as_mut_ptr().cast::<c_void>()
            } else {
                ptr::null_mut()
            }
        })
        .unwrap_or(ptr::null_mut())
    })
}

/// Drop every element. Capacity is kept.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn growbuf_clear(handle: u64) -> i32 {
    ffi_guard!({
        to_code(with_buffer(handle, |buf| {
            buf.clear();
            GrowbufStatus::Ok
        }))
    })
}

/// Insert the `element_width` bytes at `value` before position `index`.
///
/// `index == size` appends. `index > size` returns `INDEX_OUT_OF_BOUNDS`
/// and changes nothing.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn growbuf_insert(handle: u64, index: usize, value: *const c_void) -> i32 {
    ffi_guard!({
        to_code(with_buffer(handle, |buf| {
            // SAFETY: value readable for one element per caller contract.
            unsafe { insert_from(buf, Some(index), value) }
        }))
    })
}

/// Remove the element at `index`, shifting later elements left.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn growbuf_erase(handle: u64, index: usize) -> i32 {
    ffi_guard!({
        to_code(with_buffer(handle, |buf| {
            if buf.erase(index) {
                GrowbufStatus::Ok
            } else {
                GrowbufStatus::IndexOutOfBounds
            }
        }))
    })
}

/// Append the `element_width` bytes at `value`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn growbuf_append(handle: u64, value: *const c_void) -> i32 {
    ffi_guard!({
        to_code(with_buffer(handle, |buf| {
            // SAFETY: value readable for one element per caller contract.
            unsafe { insert_from(buf, None, value) }
        }))
    })
}

/// Insert one element read from `value`; `None` appends.
///
/// # Safety
///
/// `value` must be null or readable for `buf.element_width()` bytes.
#[allow(unsafe_code)]
unsafe fn insert_from(
    buf: &mut ErasedBuffer,
    index: Option<usize>,
    value: *const c_void,
) -> GrowbufStatus {
    if value.is_null() {
        return GrowbufStatus::InvalidArgument;
    }
    // SAFETY: forwarded from the caller.
    let bytes = match unsafe { element_bytes(value, 1, buf.element_width()) } {
        Ok(bytes) => bytes,
        Err(status) => return status,
    };
    let index = index.unwrap_or(buf.len());
    GrowbufStatus::from(buf.insert(index, bytes))
}

fn element_ptr(buf: &mut ErasedBuffer, index: usize) -> *mut c_void {
    match buf.at_mut(index) {
        Some(bytes) => bytes.as_mut_ptr().cast::<c_void>(),
        None => ptr::null_mut(),
    }
}
