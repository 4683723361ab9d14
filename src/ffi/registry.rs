//! Entry Point Registry
//!
//! Catalog of the native entry points the bridge knows how to call.

use std::collections::BTreeMap;

use super::loader::NativeLibrary;
use super::types::EntryShape;

/// One native entry point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryPoint {
    /// Component that owns the entry point ("engine", "config", ...)
    pub component: &'static str,
    /// Exported symbol name
    pub symbol: &'static str,
    /// Calling shape
    pub shape: EntryShape,
}

impl EntryPoint {
    pub const fn new(component: &'static str, symbol: &'static str, shape: EntryShape) -> Self {
        Self {
            component,
            symbol,
            shape,
        }
    }
}

/// Result of checking a library against the registry
#[derive(Debug, Clone, Default)]
pub struct ProbeReport {
    pub resolved: Vec<EntryPoint>,
    pub missing: Vec<EntryPoint>,
}

impl ProbeReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn total(&self) -> usize {
        self.resolved.len() + self.missing.len()
    }
}

/// Entry point registry, keyed by symbol
#[derive(Debug, Clone, Default)]
pub struct EntryPointRegistry {
    entries: BTreeMap<&'static str, EntryPoint>,
}

impl EntryPointRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one entry point. A symbol registered twice keeps the last
    /// registration.
    pub fn register(&mut self, entry: EntryPoint) {
        self.entries.insert(entry.symbol, entry);
    }

    /// Register a component's table
    pub fn register_all(&mut self, entries: &[EntryPoint]) {
        for entry in entries {
            self.register(*entry);
        }
    }

    /// Look up an entry point by symbol
    pub fn find(&self, symbol: &str) -> Option<&EntryPoint> {
        self.entries.get(symbol)
    }

    /// Entry points belonging to one component, in symbol order
    pub fn by_component<'a>(&'a self, component: &'a str) -> impl Iterator<Item = &'a EntryPoint> {
        self.entries
            .values()
            .filter(move |entry| entry.component == component)
    }

    /// Entry points with one calling shape, in symbol order
    pub fn by_shape(&self, shape: EntryShape) -> impl Iterator<Item = &EntryPoint> {
        self.entries
            .values()
            .filter(move |entry| entry.shape == shape)
    }

    /// Distinct component names
    pub fn components(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.entries.values().map(|e| e.component).collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntryPoint> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check which registered entry points the library exports
    pub fn probe(&self, library: &NativeLibrary) -> ProbeReport {
        let mut report = ProbeReport::default();
        for entry in self.entries.values() {
            if library.has_symbol(entry.symbol) {
                report.resolved.push(*entry);
            } else {
                report.missing.push(*entry);
            }
        }
        tracing::debug!(
            library = library.label(),
            resolved = report.resolved.len(),
            missing = report.missing.len(),
            "probed entry points"
        );
        report
    }
}
