//! Configuration module for foliosync.
//!
//! Provides typed configuration structs that map to the YAML configuration
//! file, with loading, validation, defaults, and a builder pattern for
//! programmatic use.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::access::AccessPolicy;

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for foliosync.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub account: AccountConfig,
    pub sync: SyncConfig,
    pub filters: FilterConfig,
    pub access: AccessConfig,
    pub api: ApiConfig,
    pub logging: LoggingConfig,
}

/// Remote account credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountConfig {
    pub username: String,
    pub password: String,
}

/// Synchronization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Root directory of the local photo tree.
    pub local_root: PathBuf,
    /// Re-upload files whose local mtime is newer than the remote upload time.
    pub reupload_newer: bool,
    /// Accepted for file-format compatibility; the engine never deletes
    /// remote content regardless of this value.
    pub delete_missing_remote: bool,
    /// Accepted for file-format compatibility; the engine never deletes
    /// local content regardless of this value.
    pub delete_missing_local: bool,
    /// Concurrency model: `worker_pool` or `unbounded`.
    pub model: String,
    /// Worker count for the `worker_pool` model.
    pub workers: usize,
}

/// Name filtering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// File/folder names starting with any of these (case-insensitive)
    /// are excluded from sync.
    pub exclude_prefixes: Vec<String>,
    /// File extensions (without the leading dot, case-insensitive)
    /// eligible for upload.
    pub supported_extensions: Vec<String>,
}

/// Access policies applied to newly created remote objects.
///
/// Empty policies leave the service defaults untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccessConfig {
    pub new_group: AccessPolicy,
    pub new_photoset: AccessPolicy,
    pub new_photo: AccessPolicy,
}

/// Remote API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the photo-hosting service API.
    pub base_url: String,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            local_root: dirs::picture_dir().unwrap_or_else(|| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("~"))
                    .join("Pictures")
            }),
            reupload_newer: true,
            delete_missing_remote: false,
            delete_missing_local: false,
            model: "worker_pool".to_string(),
            workers: 50,
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            exclude_prefixes: vec![
                ".".to_string(),
                "@".to_string(),
                "~".to_string(),
                "#".to_string(),
            ],
            supported_extensions: vec![
                "jpg".to_string(),
                "jpeg".to_string(),
                "png".to_string(),
                "gif".to_string(),
                "tif".to_string(),
                "tiff".to_string(),
            ],
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.foliohost.example/v1".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/foliosync/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("foliosync")
            .join("config.yaml")
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"sync.workers"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Valid values for `sync.model`.
const VALID_SYNC_MODELS: &[&str] = &["worker_pool", "unbounded"];

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        // --- account ---
        if self.account.username.is_empty() {
            errors.push(ValidationError {
                field: "account.username".into(),
                message: "must not be empty".into(),
            });
        }
        if self.account.password.is_empty() {
            errors.push(ValidationError {
                field: "account.password".into(),
                message: "must not be empty".into(),
            });
        }

        // --- sync ---
        if self.sync.local_root.as_os_str().is_empty() {
            errors.push(ValidationError {
                field: "sync.local_root".into(),
                message: "must not be empty".into(),
            });
        }
        if !VALID_SYNC_MODELS.contains(&self.sync.model.as_str()) {
            errors.push(ValidationError {
                field: "sync.model".into(),
                message: format!(
                    "invalid model '{}'; valid options: {}",
                    self.sync.model,
                    VALID_SYNC_MODELS.join(", ")
                ),
            });
        }
        if self.sync.model == "worker_pool" && self.sync.workers == 0 {
            errors.push(ValidationError {
                field: "sync.workers".into(),
                message: "must be greater than 0".into(),
            });
        }

        // --- filters ---
        if self.filters.supported_extensions.is_empty() {
            errors.push(ValidationError {
                field: "filters.supported_extensions".into(),
                message: "must list at least one extension".into(),
            });
        }
        for ext in &self.filters.supported_extensions {
            if ext.starts_with('.') {
                errors.push(ValidationError {
                    field: "filters.supported_extensions".into(),
                    message: format!("extension '{ext}' must not include the leading dot"),
                });
            }
        }

        // --- api ---
        if self.api.base_url.is_empty() {
            errors.push(ValidationError {
                field: "api.base_url".into(),
                message: "must not be empty".into(),
            });
        }

        // --- logging ---
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError {
                field: "logging.level".into(),
                message: format!(
                    "invalid level '{}'; valid options: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// ConfigBuilder
// ---------------------------------------------------------------------------

/// Builder for constructing a [`Config`] programmatically.
///
/// Starts from [`Config::default`] and allows selective overrides.
///
/// # Example
///
/// ```rust,no_run
/// use foliosync_core::config::ConfigBuilder;
/// use std::path::PathBuf;
///
/// let config = ConfigBuilder::new()
///     .account("alice", "secret")
///     .sync_local_root(PathBuf::from("/home/alice/Pictures"))
///     .logging_level("debug")
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder initialised with [`Config::default`] values.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    // --- account ---

    pub fn account(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.config.account.username = username.into();
        self.config.account.password = password.into();
        self
    }

    // --- sync ---

    pub fn sync_local_root(mut self, root: PathBuf) -> Self {
        self.config.sync.local_root = root;
        self
    }

    pub fn sync_reupload_newer(mut self, enabled: bool) -> Self {
        self.config.sync.reupload_newer = enabled;
        self
    }

    pub fn sync_model(mut self, model: impl Into<String>) -> Self {
        self.config.sync.model = model.into();
        self
    }

    pub fn sync_workers(mut self, workers: usize) -> Self {
        self.config.sync.workers = workers;
        self
    }

    // --- filters ---

    pub fn filters_exclude_prefixes(mut self, prefixes: Vec<String>) -> Self {
        self.config.filters.exclude_prefixes = prefixes;
        self
    }

    pub fn filters_supported_extensions(mut self, extensions: Vec<String>) -> Self {
        self.config.filters.supported_extensions = extensions;
        self
    }

    // --- access ---

    pub fn access_new_group(mut self, policy: AccessPolicy) -> Self {
        self.config.access.new_group = policy;
        self
    }

    pub fn access_new_photoset(mut self, policy: AccessPolicy) -> Self {
        self.config.access.new_photoset = policy;
        self
    }

    pub fn access_new_photo(mut self, policy: AccessPolicy) -> Self {
        self.config.access.new_photo = policy;
        self
    }

    // --- api ---

    pub fn api_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.api.base_url = base_url.into();
        self
    }

    // --- logging ---

    pub fn logging_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    // --- build ---

    /// Consume the builder and return the finished [`Config`].
    pub fn build(self) -> Config {
        self.config
    }

    /// Build and validate in one step. Returns `Err` with the list of
    /// validation errors if the configuration is invalid.
    pub fn build_validated(self) -> Result<Config, Vec<ValidationError>> {
        let config = self.build();
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(errors)
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
