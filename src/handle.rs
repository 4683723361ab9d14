//! Opaque Handles
//!
//! Integer-sized references to resources owned by the native library. The
//! bridge stores and forwards them; it never dereferences, validates, or
//! tracks their lifetime.

use std::ffi::c_void;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Marker for configuration handles.
#[derive(Debug)]
pub enum ConfigKind {}

/// Marker for export report cursors.
#[derive(Debug)]
pub enum ExportKind {}

/// Marker for size-bucketed entity iterators.
#[derive(Debug)]
pub enum EntityListKind {}

/// A native handle of kind `K`.
///
/// Only equality and pass-through are supported. There is no
/// arithmetic and no access to the pointee.
#[repr(transparent)]
pub struct Handle<K> {
    raw: usize,
    _kind: PhantomData<fn() -> K>,
}

pub type ConfigHandle = Handle<ConfigKind>;
pub type ExportHandle = Handle<ExportKind>;
pub type EntityListHandle = Handle<EntityListKind>;

impl<K> Handle<K> {
    /// Wrap a handle value received at the language boundary.
    pub const fn from_raw(raw: usize) -> Self {
        Self {
            raw,
            _kind: PhantomData,
        }
    }

    /// The integer-sized value to hand back across the language boundary.
    pub const fn into_raw(self) -> usize {
        self.raw
    }

    /// Convert a pointer produced by the native library.
    pub fn from_ptr(ptr: *mut c_void) -> Self {
        Self::from_raw(ptr as usize)
    }

    /// The pointer-sized value the native library expects.
    pub fn as_ptr(self) -> *mut c_void {
        self.raw as *mut c_void
    }
}

impl<K> Clone for Handle<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for Handle<K> {}

impl<K> PartialEq for Handle<K> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<K> Eq for Handle<K> {}

impl<K> Hash for Handle<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<K> fmt::Debug for Handle<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({:#x})", self.raw)
    }
}

impl<K> fmt::Display for Handle<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_pass_through() {
        let handle = ConfigHandle::from_raw(0xdead_beef);
        assert_eq!(handle.as_ptr() as usize, 0xdead_beef);
        assert_eq!(ConfigHandle::from_ptr(handle.as_ptr()), handle);
        assert_eq!(handle.into_raw(), 0xdead_beef);
    }

    #[test]
    fn test_handle_equality() {
        assert_eq!(ExportHandle::from_raw(4), ExportHandle::from_raw(4));
        assert_ne!(ExportHandle::from_raw(4), ExportHandle::from_raw(5));
        assert_eq!(format!("{}", EntityListHandle::from_raw(255)), "0xff");
    }
}
