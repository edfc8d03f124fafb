mod defaults;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::CatalogError;
use defaults::*;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// How the loader treats a context name that appears more than once.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateContextPolicy {
    /// Append the later block's messages to the first block (later messages win).
    #[default]
    Merge,
    /// Fail the load with a format error.
    Reject,
}

/// What formatting does with a `%N` that has no matching argument.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingArgumentPolicy {
    /// Leave the placeholder in the output.
    #[default]
    Keep,
    /// Report a `MissingArgument` error.
    Error,
}

/// Catalog sources and loading behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Locale used as the lookup fallback.
    #[serde(default = "default_locale")]
    pub default_locale: String,
    /// Locale code to catalog file path.
    #[serde(default)]
    pub locales: BTreeMap<String, String>,
    #[serde(default)]
    pub duplicate_contexts: DuplicateContextPolicy,
    #[serde(default)]
    pub missing_arguments: MissingArgumentPolicy,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            default_locale: default_locale(),
            locales: BTreeMap::new(),
            duplicate_contexts: DuplicateContextPolicy::default(),
            missing_arguments: MissingArgumentPolicy::default(),
        }
    }
}

impl CatalogConfig {
    /// Path of the catalog file for `locale`, relative paths resolved against `base`.
    pub fn locale_path(&self, locale: &str, base: &Path) -> Option<PathBuf> {
        let raw = self.locales.get(locale)?;
        let path = PathBuf::from(shellexpand(raw));
        if path.is_absolute() {
            Some(path)
        } else {
            Some(base.join(path))
        }
    }
}

/// Logging settings. `RUST_LOG` takes precedence when set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist.
pub fn load(path: &str) -> Result<Config, CatalogError> {
    let path = Path::new(path);
    if !path.exists() {
        tracing::info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| CatalogError::Config(format!("failed to read {}: {}", path.display(), e)))?;

    parse(&content)
}

/// Parse configuration from TOML text.
pub fn parse(content: &str) -> Result<Config, CatalogError> {
    let config: Config = toml::from_str(content)
        .map_err(|e| CatalogError::Config(format!("failed to parse config: {}", e)))?;

    if config.catalog.default_locale.trim().is_empty() {
        return Err(CatalogError::Config(
            "catalog.default_locale must not be empty".to_string(),
        ));
    }

    Ok(config)
}
