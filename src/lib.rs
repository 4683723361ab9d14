//! erbridge - Growable-Buffer Bridge for a Native Entity-Resolution Engine
//!
//! The native engine library reports results through out-parameter buffers
//! that it grows with a caller-supplied resize callback, through fixed
//! caller-allocated buffers, and through opaque handles. This crate adapts
//! those conventions into plain `(payload, status)` results, both as a Rust
//! API and as a fixed-signature C surface.
//!
//! # Features
//!
//! - **Growable responses**: one call helper drives the
//!   `(char **buf, size_t *size, resize)` protocol for every entry point
//! - **Fixed buffers**: record IDs and export pages in bounded blocks
//! - **Typed handles**: configuration, export and entity-list handles are
//!   distinct newtypes
//! - **Declaration tables**: every component is generated from one table of
//!   entry points by a declarative macro
//! - **Dynamic loading**: the engine library is found on search paths and
//!   bound at run time
//! - **C surface**: `erbridge_*` functions for foreign callers
//!
//! # Example
//!
//! ```no_run
//! use erbridge::{Bridge, BridgeConfig};
//!
//! let config = BridgeConfig::resolve(None)?;
//! let bridge = Bridge::open(&config)?;
//! bridge.initialize_all()?;
//!
//! let engine = bridge.engine();
//! let result = engine.get_entity_by_record_id("CUSTOMERS", "1001")?;
//! let entity = engine.check("get_entity_by_record_id", result)?;
//! println!("{}", entity.to_string_lossy());
//!
//! bridge.destroy_all()?;
//! # Ok::<(), erbridge::BridgeError>(())
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌─────────────────┐
//! │  exports (C)    │     │  erb CLI        │
//! └────────┬────────┘     └────────┬────────┘
//!          └──────────┬────────────┘
//!                     ▼
//!          ┌─────────────────────┐
//!          │  Bridge             │  one library, one resizer
//!          └──────────┬──────────┘
//!                     ▼
//!          ┌─────────────────────┐
//!          │  api components     │  generated from entry point tables
//!          └──────────┬──────────┘
//!                     ▼
//!          ┌─────────────────────┐
//!          │  buffer             │  growable / fixed / handle / id calls
//!          └──────────┬──────────┘
//!                     ▼
//!          ┌─────────────────────┐
//!          │  ffi                │  libloading, symbol cache
//!          └──────────┬──────────┘
//!                     ▼
//!          ┌─────────────────────┐
//!          │  native engine      │
//!          └─────────────────────┘
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod bridge;
pub mod buffer;
pub mod config;
pub mod error;
pub mod exports;
pub mod ffi;
pub mod handle;
pub mod logging;
pub mod status;

// Re-export commonly used types
pub use api::{
    entry_points, Component, ConfigManager, ConfigWithId, Configuration, Diagnostic, Engine,
    ExportReport, Notification, Observer, ObserverRegistry, Product, RecordIdWithInfo,
    RedoWithInfo,
};
pub use bridge::Bridge;
pub use buffer::{
    FixedBuffer, ResizeFn, Resizer, ResponseBuffer, EXPORT_PAGE_CAPACITY,
    LAST_EXCEPTION_CAPACITY, RECORD_ID_CAPACITY,
};
pub use config::{BridgeConfig, BufferConfig, ConfigError};
pub use error::{BridgeError, BridgeResult};
pub use ffi::{EntryPoint, EntryPointRegistry, EntryShape, LibraryLoader, NativeLibrary, ProbeReport};
pub use handle::{ConfigHandle, EntityListHandle, ExportHandle, Handle};
pub use logging::init_logging;
pub use status::{CallResult, StatusCode};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
