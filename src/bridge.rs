//! Bridge Facade
//!
//! One loaded native library, one resize capability, and every component
//! built around them.
//!
//! ```text
//! BridgeConfig ──► LibraryLoader ──► Arc<NativeLibrary>
//!                                          │
//!          ┌──────────┬───────────────┬────┴──────┬──────────┐
//!          ▼          ▼               ▼           ▼          ▼
//!       Engine  Configuration  ConfigManager  Diagnostic  Product
//! ```

use std::sync::Arc;

use crate::api::{
    entry_points, Component, ConfigManager, Configuration, Diagnostic, Engine, Observer, Product,
};
use crate::buffer::Resizer;
use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::ffi::{LibraryLoader, NativeLibrary, ProbeReport};

/// Every component of one native library.
#[derive(Debug)]
pub struct Bridge {
    config: BridgeConfig,
    library: Arc<NativeLibrary>,
    resizer: Resizer,
    engine: Engine,
    configuration: Configuration,
    config_manager: ConfigManager,
    diagnostic: Diagnostic,
    product: Product,
}

impl Bridge {
    /// Load the native library named by `config` and build all components.
    ///
    /// An explicit `library.path` is loaded as-is; otherwise `library.name`
    /// is searched for on the configured paths first, then the default
    /// search paths.
    pub fn open(config: &BridgeConfig) -> Result<Self, BridgeError> {
        let library = match &config.library.path {
            Some(path) => Arc::new(NativeLibrary::load(path)?),
            None => {
                let mut loader = LibraryLoader::new();
                for path in config.library.search_paths.iter().rev() {
                    loader.add_search_path(path.clone());
                }
                loader.load(&config.library.name)?
            }
        };
        tracing::info!(
            library = library.label(),
            path = ?library.path(),
            "native library opened"
        );
        Ok(Self::from_library(library, Resizer::system(), config.clone()))
    }

    /// Build all components around an already loaded library.
    pub fn from_library(library: Arc<NativeLibrary>, resizer: Resizer, config: BridgeConfig) -> Self {
        let buffers = config.buffers;
        Self {
            engine: Engine::new(library.clone(), resizer, buffers),
            configuration: Configuration::new(library.clone(), resizer, buffers),
            config_manager: ConfigManager::new(library.clone(), resizer, buffers),
            diagnostic: Diagnostic::new(library.clone(), resizer, buffers),
            product: Product::new(library.clone(), resizer, buffers),
            config,
            library,
            resizer,
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn library(&self) -> &Arc<NativeLibrary> {
        &self.library
    }

    pub fn resizer(&self) -> Resizer {
        self.resizer
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    pub fn config_manager(&self) -> &ConfigManager {
        &self.config_manager
    }

    pub fn diagnostic(&self) -> &Diagnostic {
        &self.diagnostic
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    /// Which known entry points the loaded library exports.
    pub fn probe(&self) -> ProbeReport {
        entry_points().probe(&self.library)
    }

    /// Initialize every component from the `[engine]` settings.
    ///
    /// The engine and diagnostic components are pinned to `config_id` when
    /// one is configured. On the first failure, the components already
    /// initialized are destroyed again (in reverse order) and that failure
    /// is returned.
    pub fn initialize_all(&self) -> Result<(), BridgeError> {
        let mut initialized: Vec<&Component> = Vec::with_capacity(5);
        for core in self.cores() {
            if let Err(e) = self.initialize(core) {
                tracing::warn!(component = core.name(), error = %e, "init failed, rolling back");
                for done in initialized.into_iter().rev() {
                    let outcome = done
                        .destroy()
                        .and_then(|status| done.check_status("destroy", status));
                    if let Err(rollback) = outcome {
                        tracing::warn!(component = done.name(), error = %rollback, "rollback destroy failed");
                    }
                }
                return Err(e);
            }
            initialized.push(core);
        }

        let engine = &self.config.engine;
        tracing::info!(
            instance = engine.instance_name.as_str(),
            config_id = ?engine.config_id,
            "all components initialized"
        );
        Ok(())
    }

    fn initialize(&self, core: &Component) -> Result<(), BridgeError> {
        let engine = &self.config.engine;
        let name = engine.instance_name.as_str();
        let settings = engine.settings.as_str();
        let verbose = engine.verbose_logging;

        let pinned = std::ptr::eq(core, self.engine.core()) || std::ptr::eq(core, self.diagnostic.core());
        let status = match engine.config_id {
            Some(id) if pinned => core.init_with_config_id(name, settings, id, verbose)?,
            _ => core.init(name, settings, verbose)?,
        };
        core.check_status("init", status)
    }

    /// Register `observer` on every component. Returns false if any
    /// component already had an observer with its ID.
    pub fn register_observer(&self, observer: Arc<dyn Observer>) -> bool {
        self.cores()
            .iter()
            .fold(true, |all, core| core.observers().register(observer.clone()) && all)
    }

    /// Remove the observer with `observer_id` from every component.
    pub fn unregister_observer(&self, observer_id: &str) -> bool {
        self.cores()
            .iter()
            .fold(false, |any, core| core.observers().unregister(observer_id) || any)
    }

    /// Destroy every component that is still live, in reverse
    /// initialization order. Reports the first failure after attempting
    /// all of them.
    pub fn destroy_all(&self) -> Result<(), BridgeError> {
        let mut first_error = None;
        for core in self.cores().into_iter().rev() {
            if core.is_destroyed() {
                continue;
            }
            let outcome = core
                .destroy()
                .and_then(|status| core.check_status("destroy", status));
            if let Err(e) = outcome {
                tracing::warn!(component = core.name(), error = %e, "destroy failed");
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Component cores in initialization order.
    fn cores(&self) -> [&Component; 5] {
        [
            self.product.core(),
            self.configuration.core(),
            self.config_manager.core(),
            self.engine.core(),
            self.diagnostic.core(),
        ]
    }
}
