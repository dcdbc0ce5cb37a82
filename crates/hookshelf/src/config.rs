//! Configuration management for Hookshelf.
//!
//! This module loads, saves and overrides the application configuration.
//! The configuration is stored in TOML format; every section is optional and
//! falls back to its defaults, so an empty file is a valid configuration.
//! A handful of settings can be overridden from the environment.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use hookshelf_core::{SecretPolicy, DEFAULT_EXPORT_FILE_NAME};
use hookshelf_storage::StorageConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::Error;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "hookshelf.toml";

/// Environment variable overriding `storage.path`.
pub const ENV_STORAGE_PATH: &str = "HOOKSHELF_STORAGE_PATH";

/// Environment variable overriding `storage.backend`.
pub const ENV_STORAGE_BACKEND: &str = "HOOKSHELF_STORAGE_BACKEND";

/// Environment variable overriding `logging.filter`.
pub const ENV_LOG: &str = "HOOKSHELF_LOG";

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Main configuration structure for Hookshelf.
///
/// # Example TOML Configuration
///
/// ```toml
/// [storage]
/// backend = "json_file"
/// path = "hookshelf-webhooks.json"
///
/// [secrets]
/// policy = "strong"
/// min_length = 12
///
/// [export]
/// file_name = "webhooks.csv"
/// directory = "exports"
///
/// [logging]
/// filter = "hookshelf=debug,info"
/// format = "json"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Which store holds the webhooks and where.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Secret strength requirements.
    #[serde(default)]
    pub secrets: SecretsConfig,

    /// Where exports are written.
    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Loads configuration from a TOML file at the specified path.
    ///
    /// # Errors
    ///
    /// - `Error::Config` if the file does not exist or cannot be read
    /// - `Error::ParseConfig` if the file contains invalid TOML or values of
    ///   the wrong shape
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use std::path::Path;
    /// use hookshelf::config::AppConfig;
    ///
    /// match AppConfig::load(Path::new("./hookshelf.toml")) {
    ///     Ok(config) => println!("Storing webhooks in {:?}", config.storage.path),
    ///     Err(e) => eprintln!("Failed to load config: {}", e),
    /// }
    /// ```
    pub fn load(path: &Path) -> Result<Self, Error> {
        debug!("Loading configuration from {:?}", path);

        if !path.exists() {
            return Err(Error::Config(format!(
                "Configuration file not found: {:?}",
                path
            )));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read configuration file: {}", e)))?;

        toml::from_str(&content).map_err(Error::ParseConfig)
    }

    /// Saves the configuration to a TOML file, creating parent directories.
    ///
    /// # Errors
    ///
    /// - `Error::Config` if the configuration cannot be serialized
    /// - `Error::Io` if the directory or file cannot be written
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        debug!("Saving configuration to {:?}", path);

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize configuration: {}", e)))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::Io {
                path: parent.display().to_string(),
                reason: e.to_string(),
            })?;
        }

        fs::write(path, content).map_err(|e| Error::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        info!("Configuration saved to {:?}", path);
        Ok(())
    }

    /// Applies `HOOKSHELF_STORAGE_PATH`, `HOOKSHELF_STORAGE_BACKEND` and
    /// `HOOKSHELF_LOG` on top of the loaded values. Unset or blank variables
    /// are ignored.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if `HOOKSHELF_STORAGE_BACKEND` names an
    /// unknown backend. Nothing is changed in that case.
    pub fn apply_env_overrides(&mut self) -> Result<(), Error> {
        let backend = match env_value(ENV_STORAGE_BACKEND) {
            Some(value) => Some(value.parse().map_err(Error::Config)?),
            None => None,
        };

        if let Some(backend) = backend {
            debug!(backend = %backend, "Storage backend overridden from environment");
            self.storage.backend = backend;
        }

        if let Some(path) = env_value(ENV_STORAGE_PATH) {
            debug!(path = %path, "Storage path overridden from environment");
            self.storage.path = PathBuf::from(path);
        }

        if let Some(filter) = env_value(ENV_LOG) {
            self.logging.filter = filter;
        }

        Ok(())
    }
}

fn env_value(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Which secret policy to enforce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecretPolicyKind {
    #[default]
    AcceptAll,
    Strong,
}

/// The `[secrets]` section.
///
/// The length and character-class settings only apply to the `strong` policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecretsConfig {
    pub policy: SecretPolicyKind,
    pub min_length: usize,
    pub require_digit: bool,
    pub require_special: bool,
}

impl SecretsConfig {
    pub fn secret_policy(&self) -> SecretPolicy {
        match self.policy {
            SecretPolicyKind::AcceptAll => SecretPolicy::AcceptAll,
            SecretPolicyKind::Strong => SecretPolicy::Strong {
                min_length: self.min_length,
                require_digit: self.require_digit,
                require_special: self.require_special,
            },
        }
    }
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            policy: SecretPolicyKind::AcceptAll,
            min_length: 10,
            require_digit: true,
            require_special: true,
        }
    }
}

/// The `[export]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Name of the exported file.
    pub file_name: String,

    /// Directory the export is written into.
    pub directory: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
            directory: PathBuf::from("."),
        }
    }
}

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// The `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives used when `HOOKSHELF_LOG` is not set.
    pub filter: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}
