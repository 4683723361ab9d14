//! Call Templates
//!
//! One helper per calling shape. Each allocates the out-parameters the
//! shape needs, hands them to the closure that performs the native call,
//! and packages the status with whatever the callee left behind.

use std::ffi::c_void;
use std::os::raw::{c_char, c_int, c_longlong};
use std::ptr;

use super::fixed::FixedBuffer;
use super::resize::{ResizeFn, Resizer};
use super::response::ResponseBuffer;
use crate::handle::Handle;
use crate::status::{CallResult, StatusCode};

/// Call an entry point that writes a variable-length string through the
/// growable buffer protocol.
pub fn call_growable<F>(resizer: &Resizer, call: F) -> CallResult<ResponseBuffer>
where
    F: FnOnce(*mut *mut c_char, *mut usize, ResizeFn) -> c_int,
{
    let mut buffer = ResponseBuffer::new(*resizer);
    let (block, capacity) = buffer.slots();
    let status = call(block, capacity, resizer.resize_fn());
    CallResult::new(status, buffer)
}

/// Call an entry point that writes into one caller-sized block.
pub fn call_fixed<F>(capacity: usize, call: F) -> CallResult<FixedBuffer>
where
    F: FnOnce(*mut c_char, usize) -> c_int,
{
    let mut buffer = FixedBuffer::with_capacity(capacity);
    let status = call(buffer.as_mut_ptr(), buffer.capacity());
    CallResult::new(status, buffer)
}

/// Call an entry point that fills a handle slot.
pub fn call_handle<K, F>(call: F) -> CallResult<Handle<K>>
where
    F: FnOnce(*mut *mut c_void) -> c_int,
{
    let mut slot: *mut c_void = ptr::null_mut();
    let status = call(&mut slot);
    CallResult::new(status, Handle::from_ptr(slot))
}

/// Call an entry point that fills a 64-bit identifier slot.
pub fn call_id<F>(call: F) -> CallResult<i64>
where
    F: FnOnce(*mut c_longlong) -> c_int,
{
    let mut id: c_longlong = 0;
    let status = call(&mut id);
    CallResult::new(status, id)
}

/// Call an entry point that only reports a status.
pub fn call_status<F>(call: F) -> StatusCode
where
    F: FnOnce() -> c_int,
{
    StatusCode::from(call())
}
