//! Resize Capability
//!
//! The function pair a native callee uses to grow a caller-owned buffer
//! mid-call, and to release it afterwards.

use std::ffi::c_void;
use std::fmt;

/// Shape the native library expects for its resize callback:
/// `void *(*)(void *, size_t)`.
pub type ResizeFn = unsafe extern "C" fn(block: *mut c_void, size: usize) -> *mut c_void;

/// Release function paired with a [`ResizeFn`].
pub type ReleaseFn = unsafe extern "C" fn(block: *mut c_void);

/// Grow (or shrink) `block` to `size` bytes, preserving its prefix.
///
/// Behaves as `realloc`, with two differences:
/// - a request for 0 bytes keeps a valid one-byte block holding only a
///   terminator instead of freeing it;
/// - `block` may be null, in which case a fresh block is allocated.
///
/// Returns null when the allocation cannot be satisfied. The original block
/// is left untouched and still owned by the caller in that case.
///
/// # Safety
///
/// `block` must be null or a live allocation from this allocator.
pub unsafe extern "C" fn resize_string_buffer(block: *mut c_void, size: usize) -> *mut c_void {
    let grown = libc::realloc(block, size.max(1));
    if grown.is_null() {
        return std::ptr::null_mut();
    }
    if size == 0 {
        *(grown as *mut u8) = 0;
    }
    grown
}

/// Release a block returned by [`resize_string_buffer`].
///
/// # Safety
///
/// `block` must be null or a live allocation from this allocator.
pub unsafe extern "C" fn release_string_buffer(block: *mut c_void) {
    libc::free(block);
}

/// Injected resize capability.
///
/// Carries the resize function handed to native callees together with the
/// release function that frees whatever it produced. The default uses the C
/// allocator, so buffers can be handed across the boundary and released
/// with `free`.
#[derive(Clone, Copy)]
pub struct Resizer {
    resize: ResizeFn,
    release: ReleaseFn,
}

impl Resizer {
    /// Resizer backed by the C allocator.
    pub const fn system() -> Self {
        Self {
            resize: resize_string_buffer,
            release: release_string_buffer,
        }
    }

    /// Resizer with a custom resize/release pair (fault injection, arenas).
    pub const fn new(resize: ResizeFn, release: ReleaseFn) -> Self {
        Self { resize, release }
    }

    /// The bare function pointer passed to native entry points.
    pub fn resize_fn(&self) -> ResizeFn {
        self.resize
    }

    /// Invoke the resize function directly.
    ///
    /// # Safety
    ///
    /// Same contract as the underlying [`ResizeFn`].
    pub unsafe fn resize(&self, block: *mut c_void, size: usize) -> *mut c_void {
        (self.resize)(block, size)
    }

    /// Release a block produced by this resizer.
    ///
    /// # Safety
    ///
    /// `block` must be null or a live block produced by this resizer.
    pub unsafe fn release(&self, block: *mut c_void) {
        if !block.is_null() {
            (self.release)(block);
        }
    }
}

impl Default for Resizer {
    fn default() -> Self {
        Self::system()
    }
}

impl fmt::Debug for Resizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resizer")
            .field("resize", &(self.resize as usize as *const c_void))
            .field("release", &(self.release as usize as *const c_void))
            .finish()
    }
}
