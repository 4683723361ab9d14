//! Native Library Interface
//!
//! Loads the native engine library and resolves its entry points.
//!
//! # Architecture
//!
//! ```text
//! Component method (api::Engine::stats, ...)
//!       │
//!       ▼
//! NativeLibrary::entry::<unsafe extern "C" fn(...)>("G2_stats")
//!       │
//!       ▼
//! Symbol cache ──miss──► libloading / in-process table
//!       │
//!       ▼
//! Native Function Call
//! ```
//!
//! # Example
//!
//! ```ignore
//! let mut loader = LibraryLoader::new();
//! loader.add_search_path("/opt/senzing/g2/lib");
//! let library = loader.load("G2")?;
//!
//! let report = crate::api::entry_points().probe(&library);
//! println!("{} of {} entry points resolved", report.resolved.len(), report.total());
//! ```

mod loader;
mod registry;
mod types;

pub use loader::{LibraryLoader, NativeLibrary};
pub(crate) use loader::library_filename;
pub use registry::{EntryPoint, EntryPointRegistry, ProbeReport};
pub use types::EntryShape;
