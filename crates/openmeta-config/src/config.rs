//! Configuration types and loading.
//!
//! The main entry point is [`ConverterConfig`], which represents the
//! contents of `.openmeta/config.yaml`. [`load_config`] layers `OPENMETA_*`
//! environment variables over the file; [`save_config`] writes the file.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use openmeta_core::enums::UnmatchedRelationshipPolicy;

/// Name of the configuration file inside `.openmeta/`.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Prefix of environment variables that override configuration keys.
///
/// `OPENMETA_STRICT_TYPES=true` sets `strict-types`; nested keys use a double
/// underscore, as in `OPENMETA_LOG__FILTER=debug`.
pub const ENV_PREFIX: &str = "OPENMETA_";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read or written.
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// The configuration could not be serialized as YAML.
    #[error("failed to serialize config: {0}")]
    SerializeError(#[from] serde_yaml::Error),

    /// The layered configuration contained an invalid value.
    #[error("invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),

    /// The `.openmeta/` directory was not found.
    #[error("no .openmeta directory found")]
    OpenmetaDirNotFound,
}

/// A specialized `Result` type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

// ---------------------------------------------------------------------------
// Config types
// ---------------------------------------------------------------------------

/// Logging configuration section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LogConfig {
    /// A `tracing` env-filter directive, e.g. `openmeta_convert=debug`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConverterConfig {
    /// Service name reported in conversion errors.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// What to do with relationships a bean has no slot for.
    #[serde(default)]
    pub unmatched_relationships: UnmatchedRelationshipPolicy,

    /// Require entities to match the bean's entity type.
    #[serde(default)]
    pub strict_types: bool,

    /// JSONL instance store. Relative paths are resolved against the
    /// directory that holds `.openmeta/`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<PathBuf>,

    #[serde(default)]
    pub log: LogConfig,
}

fn default_service_name() -> String {
    "omconv".to_string()
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            unmatched_relationships: UnmatchedRelationshipPolicy::default(),
            strict_types: false,
            store: None,
            log: LogConfig::default(),
        }
    }
}

impl ConverterConfig {
    /// The configured store path, resolved against the project root that
    /// contains `openmeta_dir`.
    pub fn store_path(&self, openmeta_dir: &Path) -> Option<PathBuf> {
        let store = self.store.as_ref()?;
        if store.is_absolute() {
            return Some(store.clone());
        }
        let root = openmeta_dir.parent().unwrap_or(openmeta_dir);
        Some(root.join(store))
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Load configuration from `config.yaml` inside the given `.openmeta/`
/// directory, with `OPENMETA_*` environment variables layered on top.
///
/// A missing or empty file yields the defaults.
///
/// # Errors
///
/// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
/// or [`ConfigError::Invalid`] if a value does not fit its key.
pub fn load_config(openmeta_dir: &Path) -> Result<ConverterConfig> {
    let config_path = openmeta_dir.join(CONFIG_FILE_NAME);

    let mut figment = Figment::from(Serialized::defaults(ConverterConfig::default()));
    if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)?;
        if !content.trim().is_empty() {
            figment = figment.merge(Yaml::string(&content));
        }
    }
    figment = figment.merge(
        Env::prefixed(ENV_PREFIX)
            .split("__")
            .map(|key| key.as_str().replace('_', "-").into()),
    );

    figment.extract().map_err(|e| ConfigError::Invalid(Box::new(e)))
}

/// Save configuration to `config.yaml` inside the given `.openmeta/`
/// directory.
///
/// The directory is created if it does not exist.
pub fn save_config(openmeta_dir: &Path, config: &ConverterConfig) -> Result<()> {
    std::fs::create_dir_all(openmeta_dir)?;

    let config_path = openmeta_dir.join(CONFIG_FILE_NAME);
    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(config_path, yaml)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
