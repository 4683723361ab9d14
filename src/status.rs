//! Status Codes and Call Results
//!
//! Native status codes are opaque integers owned by the native library. The
//! bridge forwards them verbatim and only ever asks whether a code is zero
//! or negative.

use std::fmt;

/// Native-library-defined outcome of a call.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusCode(i64);

impl StatusCode {
    /// The conventional success code.
    pub const SUCCESS: StatusCode = StatusCode(0);

    pub const fn new(code: i64) -> Self {
        Self(code)
    }

    /// Raw code.
    pub const fn code(self) -> i64 {
        self.0
    }

    /// Zero.
    pub const fn is_success(self) -> bool {
        self.0 == 0
    }

    /// Below zero. Paged fetches report errors this way and use positive
    /// values for non-error outcomes.
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl From<i32> for StatusCode {
    fn from(code: i32) -> Self {
        Self(i64::from(code))
    }
}

impl From<i64> for StatusCode {
    fn from(code: i64) -> Self {
        Self(code)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// `(status, payload)` pair produced by every wrapped call.
///
/// The payload is always present, but is only meaningful when the status
/// says so. Check [`CallResult::is_success`] (or use
/// [`CallResult::into_result`]) before trusting it.
#[derive(Debug)]
pub struct CallResult<T> {
    pub status: StatusCode,
    pub payload: T,
}

impl<T> CallResult<T> {
    pub fn new(status: impl Into<StatusCode>, payload: T) -> Self {
        Self {
            status: status.into(),
            payload,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn into_parts(self) -> (StatusCode, T) {
        (self.status, self.payload)
    }

    /// Transform the payload, keeping the status.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> CallResult<U> {
        CallResult {
            status: self.status,
            payload: f(self.payload),
        }
    }

    /// The payload if the status is zero, otherwise the status.
    pub fn into_result(self) -> Result<T, StatusCode> {
        if self.status.is_success() {
            Ok(self.payload)
        } else {
            Err(self.status)
        }
    }
}
