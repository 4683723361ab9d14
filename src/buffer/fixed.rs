//! Fixed-Capacity Output Buffer
//!
//! One zeroed block of a declared capacity, handed to native calls whose
//! output size is bounded (record IDs, export pages, exception text).

use std::borrow::Cow;
use std::ffi::c_void;
use std::os::raw::c_char;
use std::ptr;

/// Maximum record-ID length plus terminator.
pub const RECORD_ID_CAPACITY: usize = 41;

/// Page size for paged export and entity-list fetches.
pub const EXPORT_PAGE_CAPACITY: usize = 65_535;

/// Capacity for last-exception text.
pub const LAST_EXCEPTION_CAPACITY: usize = 65_535;

/// Caller-owned fixed block, allocated with `calloc` and released on drop.
///
/// If the allocation fails the buffer is null with zero capacity; the native
/// callee then receives a zero capacity and has nothing it may write.
pub struct FixedBuffer {
    ptr: *mut c_char,
    capacity: usize,
}

// SAFETY: uniquely owned block.
unsafe impl Send for FixedBuffer {}

impl FixedBuffer {
    /// Allocate a zeroed block of `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        if capacity == 0 {
            return Self {
                ptr: ptr::null_mut(),
                capacity: 0,
            };
        }
        // SAFETY: plain allocation; null is handled below.
        let block = unsafe { libc::calloc(capacity, 1) } as *mut c_char;
        if block.is_null() {
            tracing::warn!(capacity, "fixed buffer allocation failed");
            return Self {
                ptr: ptr::null_mut(),
                capacity: 0,
            };
        }
        Self {
            ptr: block,
            capacity,
        }
    }

    /// Pointer handed to the native callee.
    pub fn as_mut_ptr(&mut self) -> *mut c_char {
        self.ptr
    }

    /// Declared capacity handed to the native callee.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Contents up to the first terminator, never past the capacity.
    pub fn as_bytes(&self) -> &[u8] {
        if self.ptr.is_null() {
            return &[];
        }
        // SAFETY: `capacity` bytes were allocated and zeroed up front.
        let block = unsafe { std::slice::from_raw_parts(self.ptr as *const u8, self.capacity) };
        match block.iter().position(|&b| b == 0) {
            Some(end) => &block[..end],
            None => block,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }

    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.as_bytes())
    }

    pub fn into_string(self) -> Result<String, std::string::FromUtf8Error> {
        String::from_utf8(self.as_bytes().to_vec())
    }

    /// Hand the block to the caller; release it with `free`.
    ///
    /// The last byte is forced to a terminator so the block is always a
    /// valid C string, even if the callee filled it completely.
    pub fn into_raw(mut self) -> *mut c_char {
        if !self.ptr.is_null() {
            // SAFETY: capacity > 0 whenever ptr is non-null.
            unsafe { *self.ptr.add(self.capacity - 1) = 0 };
        }
        let raw = self.ptr;
        self.ptr = ptr::null_mut();
        self.capacity = 0;
        raw
    }
}

impl Drop for FixedBuffer {
    fn drop(&mut self) {
        // SAFETY: null or a block from `calloc`.
        unsafe { libc::free(self.ptr as *mut c_void) };
    }
}

impl std::fmt::Debug for FixedBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixedBuffer")
            .field("capacity", &self.capacity)
            .field("contents", &self.to_string_lossy())
            .finish()
    }
}
