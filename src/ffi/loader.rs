//! Native Library Loader
//!
//! Safe wrapper around libloading for locating and loading the native
//! engine library, plus in-process symbol tables for embedding and stubs.

use std::collections::HashMap;
use std::ffi::CString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use libloading::{Library, Symbol};
use parking_lot::RwLock;

use crate::error::BridgeError;

/// Where a library's symbols come from
enum LibrarySource {
    /// Shared object opened with libloading
    Dynamic(Library),
    /// Symbols registered directly by address
    InProcess(HashMap<String, usize>),
}

/// A native library whose entry points the bridge calls
pub struct NativeLibrary {
    /// Display name
    label: String,
    /// Path the library was loaded from
    path: Option<PathBuf>,
    source: LibrarySource,
    /// Cached entry point addresses
    symbols: RwLock<HashMap<String, usize>>,
}

impl NativeLibrary {
    /// Load a shared library from the given path
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BridgeError> {
        let path = path.as_ref().to_path_buf();

        // Safety: loading runs the library's initializers. The path comes
        // from configuration the user controls.
        let library = unsafe {
            Library::new(&path).map_err(|e| {
                BridgeError::LoadError(format!(
                    "Failed to load library '{}': {}",
                    path.display(),
                    e
                ))
            })?
        };

        tracing::debug!(path = %path.display(), "loaded native library");

        Ok(Self {
            label: path.display().to_string(),
            path: Some(path),
            source: LibrarySource::Dynamic(library),
            symbols: RwLock::new(HashMap::new()),
        })
    }

    /// Build a library from symbols that already live in this process.
    ///
    /// Each address must point at an `extern "C"` function matching the
    /// prototype the bridge uses for that symbol.
    pub fn in_process<I, S>(label: impl Into<String>, symbols: I) -> Self
    where
        I: IntoIterator<Item = (S, usize)>,
        S: Into<String>,
    {
        let table = symbols
            .into_iter()
            .map(|(name, addr)| (name.into(), addr))
            .collect();
        Self {
            label: label.into(),
            path: None,
            source: LibrarySource::InProcess(table),
            symbols: RwLock::new(HashMap::new()),
        }
    }

    /// Display name of this library
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Path the library was loaded from, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_in_process(&self) -> bool {
        matches!(self.source, LibrarySource::InProcess(_))
    }

    /// Resolve a symbol to its address
    pub fn resolve(&self, name: &str) -> Result<usize, BridgeError> {
        // Check cache first
        if let Some(&addr) = self.symbols.read().get(name) {
            return Ok(addr);
        }

        let addr = match &self.source {
            LibrarySource::Dynamic(library) => {
                let c_name = CString::new(name).map_err(|_| {
                    BridgeError::InvalidSymbol(format!("Invalid symbol name: {}", name))
                })?;

                // Safety: the address is only reinterpreted through `entry`,
                // whose caller supplies the prototype.
                let symbol: Symbol<*const ()> = unsafe {
                    library.get(c_name.as_bytes_with_nul()).map_err(|e| {
                        BridgeError::SymbolNotFound(format!(
                            "Symbol '{}' not found in '{}': {}",
                            name, self.label, e
                        ))
                    })?
                };
                *symbol as usize
            }
            LibrarySource::InProcess(table) => table.get(name).copied().ok_or_else(|| {
                BridgeError::SymbolNotFound(format!(
                    "Symbol '{}' not found in '{}'",
                    name, self.label
                ))
            })?,
        };

        if addr == 0 {
            return Err(BridgeError::SymbolNotFound(format!(
                "Symbol '{}' in '{}' resolved to null",
                name, self.label
            )));
        }

        tracing::debug!(library = %self.label, symbol = name, "resolved entry point");
        self.symbols.write().insert(name.to_string(), addr);
        Ok(addr)
    }

    /// Whether the symbol resolves
    pub fn has_symbol(&self, name: &str) -> bool {
        self.resolve(name).is_ok()
    }

    /// Resolve a symbol as a typed function pointer
    ///
    /// # Safety
    ///
    /// `F` must be an `extern "C"` function pointer type matching the
    /// native prototype of `name`.
    pub unsafe fn entry<F: Copy>(&self, name: &str) -> Result<F, BridgeError> {
        if std::mem::size_of::<F>() != std::mem::size_of::<usize>() {
            return Err(BridgeError::InvalidSymbol(format!(
                "'{}' requested as a non-pointer-sized type",
                name
            )));
        }
        let addr = self.resolve(name)?;
        Ok(std::mem::transmute_copy::<usize, F>(&addr))
    }

    /// Number of symbols resolved so far
    pub fn cached_symbols(&self) -> usize {
        self.symbols.read().len()
    }
}

impl fmt::Debug for NativeLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeLibrary")
            .field("label", &self.label)
            .field("path", &self.path)
            .field("in_process", &self.is_in_process())
            .field("cached_symbols", &self.cached_symbols())
            .finish()
    }
}

/// Library loader with search paths
pub struct LibraryLoader {
    /// Search paths for libraries
    search_paths: Vec<PathBuf>,
    /// Loaded libraries
    libraries: HashMap<String, Arc<NativeLibrary>>,
}

impl LibraryLoader {
    /// Create a new library loader
    pub fn new() -> Self {
        Self {
            search_paths: default_search_paths(),
            libraries: HashMap::new(),
        }
    }

    /// Add a search path, searched before the defaults
    pub fn add_search_path(&mut self, path: impl AsRef<Path>) {
        self.search_paths.insert(0, path.as_ref().to_path_buf());
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Find a library by name
    pub fn find_library(&self, name: &str) -> Option<PathBuf> {
        // If it's already a path, check if it exists
        let path = Path::new(name);
        if path.exists() {
            return Some(path.to_path_buf());
        }

        let lib_name = library_filename(name);

        for search_path in &self.search_paths {
            let full_path = search_path.join(&lib_name);
            if full_path.exists() {
                return Some(full_path);
            }
        }

        None
    }

    /// Load a library by name
    pub fn load(&mut self, name: &str) -> Result<Arc<NativeLibrary>, BridgeError> {
        if let Some(lib) = self.libraries.get(name) {
            return Ok(Arc::clone(lib));
        }

        let path = self.find_library(name).ok_or_else(|| {
            BridgeError::LibraryNotFound(format!(
                "'{}' ({}) not found in {} search paths",
                name,
                library_filename(name),
                self.search_paths.len()
            ))
        })?;

        let lib = Arc::new(NativeLibrary::load(&path)?);
        self.libraries.insert(name.to_string(), Arc::clone(&lib));

        Ok(lib)
    }

    /// Register an already-built library under a name
    pub fn insert(&mut self, name: &str, library: NativeLibrary) -> Arc<NativeLibrary> {
        let lib = Arc::new(library);
        self.libraries.insert(name.to_string(), Arc::clone(&lib));
        lib
    }

    /// Get a loaded library
    pub fn get(&self, name: &str) -> Option<Arc<NativeLibrary>> {
        self.libraries.get(name).cloned()
    }

    /// Unload a library
    pub fn unload(&mut self, name: &str) -> bool {
        self.libraries.remove(name).is_some()
    }

    /// List loaded libraries
    pub fn loaded_libraries(&self) -> Vec<&str> {
        self.libraries.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for LibraryLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Get the default library search paths for this platform
fn default_search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd);
    }

    #[cfg(target_os = "linux")]
    {
        if let Ok(ld_path) = std::env::var("LD_LIBRARY_PATH") {
            paths.extend(ld_path.split(':').filter(|p| !p.is_empty()).map(PathBuf::from));
        }
        paths.push(PathBuf::from("/opt/senzing/g2/lib"));
        paths.push(PathBuf::from("/usr/local/lib"));
        paths.push(PathBuf::from("/usr/lib"));
        paths.push(PathBuf::from("/usr/lib64"));
        paths.push(PathBuf::from("/lib"));
        paths.push(PathBuf::from("/lib64"));
    }

    #[cfg(target_os = "macos")]
    {
        if let Ok(dyld_path) = std::env::var("DYLD_LIBRARY_PATH") {
            paths.extend(dyld_path.split(':').filter(|p| !p.is_empty()).map(PathBuf::from));
        }
        paths.push(PathBuf::from("/usr/local/lib"));
        paths.push(PathBuf::from("/opt/homebrew/lib"));
        paths.push(PathBuf::from("/usr/lib"));
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(path) = std::env::var("PATH") {
            paths.extend(path.split(';').filter(|p| !p.is_empty()).map(PathBuf::from));
        }
        paths.push(PathBuf::from("C:\\Windows\\System32"));
    }

    paths
}

/// Construct the platform-specific library filename
pub(crate) fn library_filename(name: &str) -> String {
    #[cfg(target_os = "linux")]
    {
        if name.starts_with("lib") && name.contains(".so") {
            name.to_string()
        } else {
            format!("lib{}.so", name)
        }
    }

    #[cfg(target_os = "macos")]
    {
        if name.starts_with("lib") && name.ends_with(".dylib") {
            name.to_string()
        } else {
            format!("lib{}.dylib", name)
        }
    }

    #[cfg(target_os = "windows")]
    {
        if name.ends_with(".dll") {
            name.to_string()
        } else {
            format!("{}.dll", name)
        }
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        name.to_string()
    }
}
