//! Bridge Errors
//!
//! Local failures raised by the bridge itself, plus the checked-layer
//! conversion of non-success native statuses.

use thiserror::Error;

use crate::config::ConfigError;
use crate::status::StatusCode;

/// Errors produced by the bridge.
///
/// Native statuses are never turned into errors by the raw call layer; only
/// [`crate::api::Component::check`] produces [`BridgeError::Native`].
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Load error: {0}")]
    LoadError(String),

    #[error("Library not found: {0}")]
    LibraryNotFound(String),

    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    #[error("Invalid string argument '{name}': {reason}")]
    InvalidString { name: &'static str, reason: String },

    #[error("{component}.{operation} failed with status {status} (exception {exception_code}): {message}")]
    Native {
        component: &'static str,
        operation: &'static str,
        status: StatusCode,
        exception_code: i64,
        message: String,
    },

    #[error("{component}.{operation} called after destroy")]
    Destroyed {
        component: &'static str,
        operation: &'static str,
    },

    #[error("Bridge has not been opened")]
    NotOpen,

    #[error("Bridge is already open")]
    AlreadyOpen,

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error("A log subscriber is already installed")]
    SubscriberExists,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl BridgeError {
    /// The native status behind this error, if it came from the library.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            BridgeError::Native { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, BridgeError::Native { .. })
    }
}

/// Result alias used throughout the crate.
pub type BridgeResult<T> = Result<T, BridgeError>;
