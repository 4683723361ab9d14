//! Growable Response Buffer
//!
//! Owned, null-terminated string block that a native callee grows through
//! the injected [`Resizer`] while the call is in flight.
//!
//! # Protocol
//!
//! ```text
//! ResponseBuffer::new()           ptr = NULL, capacity = 0
//!       │
//!       ▼
//! native(args..., &ptr, &capacity, resize)
//!       │   resize(ptr, n) ─┐  zero or more times
//!       │   ◄───────────────┘
//!       ▼
//! ResponseBuffer                  ptr/capacity as left by the callee
//! ```
//!
//! The buffer starts out null with zero capacity, so the first resize the
//! callee performs is the initial allocation.

use std::borrow::Cow;
use std::ffi::{c_void, CStr};
use std::os::raw::c_char;
use std::ptr;

use super::resize::Resizer;

/// Caller-owned response block, released on drop.
pub struct ResponseBuffer {
    ptr: *mut c_char,
    capacity: usize,
    resizer: Resizer,
}

// SAFETY: the block is uniquely owned; nothing else aliases it once the
// native call that filled it has returned.
unsafe impl Send for ResponseBuffer {}

impl ResponseBuffer {
    /// Empty buffer: null pointer, zero capacity.
    pub fn new(resizer: Resizer) -> Self {
        Self {
            ptr: ptr::null_mut(),
            capacity: 0,
            resizer,
        }
    }

    /// Out-parameter slots handed to the native callee: the address of the
    /// block pointer and the address of the capacity tracker.
    ///
    /// Both stay valid for as long as `self` is neither moved nor dropped.
    pub fn slots(&mut self) -> (*mut *mut c_char, *mut usize) {
        (ptr::addr_of_mut!(self.ptr), ptr::addr_of_mut!(self.capacity))
    }

    /// Capacity the callee reported for the block.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether the callee allocated anything at all.
    pub fn is_allocated(&self) -> bool {
        !self.ptr.is_null()
    }

    /// Raw block pointer (may be null).
    pub fn as_ptr(&self) -> *const c_char {
        self.ptr
    }

    /// The resizer that owns this block's allocation.
    pub fn resizer(&self) -> Resizer {
        self.resizer
    }

    /// Contents up to the first terminator.
    ///
    /// Never reads past the reported capacity: a block with no terminator
    /// inside its capacity yields the whole capacity.
    pub fn as_bytes(&self) -> &[u8] {
        if self.ptr.is_null() || self.capacity == 0 {
            return &[];
        }
        // SAFETY: the callee reported `capacity` bytes for this live block.
        let block = unsafe { std::slice::from_raw_parts(self.ptr as *const u8, self.capacity) };
        match block.iter().position(|&b| b == 0) {
            Some(end) => &block[..end],
            None => block,
        }
    }

    /// Contents as a C string, if terminated within capacity.
    pub fn as_c_str(&self) -> Option<&CStr> {
        if self.ptr.is_null() || self.capacity == 0 {
            return None;
        }
        // SAFETY: see `as_bytes`.
        let block = unsafe { std::slice::from_raw_parts(self.ptr as *const u8, self.capacity) };
        CStr::from_bytes_until_nul(block).ok()
    }

    /// Length of the contents, excluding the terminator.
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Whether the contents are empty (or nothing was allocated).
    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }

    /// Contents as UTF-8, replacing invalid sequences.
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.as_bytes())
    }

    /// Consume the buffer into an owned `String`.
    pub fn into_string(self) -> Result<String, std::string::FromUtf8Error> {
        String::from_utf8(self.as_bytes().to_vec())
    }

    /// Hand the block to the caller.
    ///
    /// A buffer the callee never allocated is materialized as a block
    /// holding only a terminator, so a successful call never yields null.
    /// Null is returned only if that one-byte allocation fails. Release the
    /// result with the resizer's release function (`free` for the system
    /// resizer).
    pub fn into_raw(mut self) -> *mut c_char {
        if self.ptr.is_null() {
            // SAFETY: resizing null allocates a fresh block.
            let block = unsafe { self.resizer.resize(ptr::null_mut(), 1) } as *mut c_char;
            if !block.is_null() {
                // SAFETY: at least one byte was just allocated.
                unsafe { *block = 0 };
            }
            self.ptr = block;
            self.capacity = usize::from(!block.is_null());
        }
        let raw = self.ptr;
        self.ptr = ptr::null_mut();
        self.capacity = 0;
        raw
    }

    /// Reclaim a block previously handed out with [`ResponseBuffer::into_raw`].
    ///
    /// # Safety
    ///
    /// `ptr` must be null or a live block from `resizer` with at least
    /// `capacity` readable bytes.
    pub unsafe fn from_raw(ptr: *mut c_char, capacity: usize, resizer: Resizer) -> Self {
        Self {
            ptr,
            capacity: if ptr.is_null() { 0 } else { capacity },
            resizer,
        }
    }
}

impl Drop for ResponseBuffer {
    fn drop(&mut self) {
        // SAFETY: the block is either null or owned by this buffer.
        unsafe { self.resizer.release(self.ptr as *mut c_void) };
    }
}

impl std::fmt::Debug for ResponseBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseBuffer")
            .field("capacity", &self.capacity)
            .field("contents", &self.to_string_lossy())
            .finish()
    }
}
