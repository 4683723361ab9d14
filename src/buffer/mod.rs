//! Buffer Protocols
//!
//! How variable- and bounded-length string results come back from native
//! entry points.
//!
//! # Shapes
//!
//! ```text
//! growable   native(args..., char **buf, size_t *size, resize_fn)
//! fixed      native(args..., char *buf, size_t capacity)
//! handle     native(args..., void **handle)
//! id         native(args..., long long *id)
//! status     native(args...)
//! ```
//!
//! # Example
//!
//! ```rust
//! use erbridge::buffer::{call_growable, Resizer};
//!
//! let result = call_growable(&Resizer::system(), |buf, size, resize| unsafe {
//!     let block = resize(*buf as *mut _, 3) as *mut std::os::raw::c_char;
//!     if block.is_null() {
//!         return -1;
//!     }
//!     std::ptr::copy_nonoverlapping(b"ok\0".as_ptr() as *const _, block, 3);
//!     *buf = block;
//!     *size = 3;
//!     0
//! });
//!
//! assert!(result.is_success());
//! assert_eq!(result.payload.as_bytes(), b"ok");
//! ```

mod call;
mod fixed;
mod resize;
mod response;

pub use call::{call_fixed, call_growable, call_handle, call_id, call_status};
pub use fixed::{FixedBuffer, EXPORT_PAGE_CAPACITY, LAST_EXCEPTION_CAPACITY, RECORD_ID_CAPACITY};
pub use resize::{release_string_buffer, resize_string_buffer, ReleaseFn, ResizeFn, Resizer};
pub use response::ResponseBuffer;
