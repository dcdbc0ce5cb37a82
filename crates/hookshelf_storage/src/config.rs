//! Store selection.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use hookshelf_core::WebhookStore;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::json_file::JsonFileWebhookStore;
use crate::memory::InMemoryWebhookStore;

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// File used by the JSON backend when no path is configured.
pub const DEFAULT_STORAGE_PATH: &str = "hookshelf-webhooks.json";

/// Persistence backend to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// A single JSON document on disk.
    #[default]
    JsonFile,

    /// Process memory only.
    Memory,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::JsonFile => write!(f, "json_file"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json_file" | "json" | "file" => Ok(StorageBackend::JsonFile),
            "memory" | "in_memory" => Ok(StorageBackend::Memory),
            other => Err(format!(
                "Unknown storage backend '{}', expected 'json_file' or 'memory'",
                other
            )),
        }
    }
}

/// The `[storage]` configuration section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,

    /// Location of the document for [`StorageBackend::JsonFile`].
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: PathBuf::from(DEFAULT_STORAGE_PATH),
        }
    }
}

/// Build the store described by `config`.
///
/// Opening never touches the disk; a JSON file is read on first use.
pub fn open_store(config: &StorageConfig) -> Arc<dyn WebhookStore> {
    info!(backend = %config.backend, path = %config.path.display(), "Opening webhook store");
    match config.backend {
        StorageBackend::JsonFile => Arc::new(JsonFileWebhookStore::new(config.path.clone())),
        StorageBackend::Memory => Arc::new(InMemoryWebhookStore::new()),
    }
}
