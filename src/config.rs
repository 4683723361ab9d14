//! Bridge Configuration
//!
//! Handles parsing and management of erbridge.toml configuration files.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::buffer::{EXPORT_PAGE_CAPACITY, LAST_EXCEPTION_CAPACITY, RECORD_ID_CAPACITY};

/// Name of the configuration file searched for by [`BridgeConfig::find_and_load`].
pub const CONFIG_FILE_NAME: &str = "erbridge.toml";

/// Environment variables that override file settings.
pub const ENV_LIBRARY_PATH: &str = "ERBRIDGE_LIBRARY_PATH";
pub const ENV_ENGINE_SETTINGS: &str = "ERBRIDGE_ENGINE_SETTINGS";
pub const ENV_INSTANCE_NAME: &str = "ERBRIDGE_INSTANCE_NAME";
pub const ENV_LOG_LEVEL: &str = "ERBRIDGE_LOG_LEVEL";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("Invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Root configuration structure matching erbridge.toml.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct BridgeConfig {
    /// Native library location
    #[serde(default)]
    pub library: LibraryConfig,

    /// Settings passed to every component's init
    #[serde(default)]
    pub engine: EngineConfig,

    /// Fixed buffer capacities
    #[serde(default)]
    pub buffers: BufferConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BridgeConfig {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: BridgeConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the current directory or parents.
    pub fn load_from_cwd() -> ConfigResult<Self> {
        let cwd = std::env::current_dir().map_err(ConfigError::Io)?;
        Self::find_and_load(&cwd)
    }

    /// Find and load configuration by searching up from the given directory.
    pub fn find_and_load(start_dir: &Path) -> ConfigResult<Self> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                tracing::debug!(path = %config_path.display(), "using config file");
                return Self::load(&config_path);
            }
            if !dir.pop() {
                // Reached root without finding config
                return Ok(Self::default());
            }
        }
    }

    /// Configuration from `path` if given, otherwise discovered from the
    /// current directory, with environment overrides applied.
    pub fn resolve(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::load_from_cwd()?,
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Apply the `ERBRIDGE_*` environment variables.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_LIBRARY_PATH) {
            self.library.path = Some(PathBuf::from(path));
        }
        if let Some(settings) = lookup(ENV_ENGINE_SETTINGS) {
            self.engine.settings = settings;
        }
        if let Some(name) = lookup(ENV_INSTANCE_NAME) {
            self.engine.instance_name = name;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = level;
        }
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.engine.settings.trim().is_empty() {
            serde_json::from_str::<serde_json::Value>(&self.engine.settings).map_err(|e| {
                ConfigError::Invalid {
                    key: "engine.settings",
                    message: format!("not valid JSON: {}", e),
                }
            })?;
        }
        if self.library.name.trim().is_empty() && self.library.path.is_none() {
            return Err(ConfigError::Invalid {
                key: "library.name",
                message: "empty, and no library.path given".to_string(),
            });
        }
        tracing_subscriber::EnvFilter::try_new(&self.logging.level).map_err(|e| {
            ConfigError::Invalid {
                key: "logging.level",
                message: format!("bad filter '{}': {}", self.logging.level, e),
            }
        })?;
        self.buffers.validate()
    }
}

/// Native library location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LibraryConfig {
    /// Library name, resolved through the search paths (`G2` → `libG2.so`)
    #[serde(default = "default_library_name")]
    pub name: String,

    /// Explicit path; skips the search when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Extra directories searched before the platform defaults
    #[serde(default)]
    pub search_paths: Vec<PathBuf>,
}

fn default_library_name() -> String {
    "G2".to_string()
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            name: default_library_name(),
            path: None,
            search_paths: Vec::new(),
        }
    }
}

/// Component initialization settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    /// Module name reported to the native library
    #[serde(default = "default_instance_name")]
    pub instance_name: String,

    /// JSON ini parameters
    #[serde(default = "default_settings")]
    pub settings: String,

    /// Ask the native library for verbose logging
    #[serde(default)]
    pub verbose_logging: bool,

    /// Initialize the engine with this configuration instead of the default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_id: Option<i64>,
}

fn default_instance_name() -> String {
    "erbridge".to_string()
}

fn default_settings() -> String {
    "{}".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            instance_name: default_instance_name(),
            settings: default_settings(),
            verbose_logging: false,
            config_id: None,
        }
    }
}

/// Capacities for fixed-size output buffers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BufferConfig {
    /// Record-ID buffer, terminator included
    #[serde(default = "default_record_id")]
    pub record_id: usize,

    /// Export report page
    #[serde(default = "default_page")]
    pub export_page: usize,

    /// Entity-list-by-size page
    #[serde(default = "default_page")]
    pub entity_page: usize,

    /// Last-exception text
    #[serde(default = "default_last_exception")]
    pub last_exception: usize,
}

fn default_record_id() -> usize {
    RECORD_ID_CAPACITY
}

fn default_page() -> usize {
    EXPORT_PAGE_CAPACITY
}

fn default_last_exception() -> usize {
    LAST_EXCEPTION_CAPACITY
}

impl BufferConfig {
    fn validate(&self) -> ConfigResult<()> {
        let fields = [
            ("buffers.record_id", self.record_id),
            ("buffers.export_page", self.export_page),
            ("buffers.entity_page", self.entity_page),
            ("buffers.last_exception", self.last_exception),
        ];
        for (key, value) in fields {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    key,
                    message: "capacity must be at least 1".to_string(),
                });
            }
        }
        Ok(())
    }
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            record_id: RECORD_ID_CAPACITY,
            export_page: EXPORT_PAGE_CAPACITY,
            entity_page: EXPORT_PAGE_CAPACITY,
            last_exception: LAST_EXCEPTION_CAPACITY,
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable text
    #[serde(default)]
    pub json: bool,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}
