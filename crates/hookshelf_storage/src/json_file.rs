//! JSON-file backed webhook store.
//!
//! The whole collection lives in one document of the form
//! `{"webhooks": [...]}`. Every mutation reads the document, changes it and
//! writes it back in full. Writes go to a sibling temporary file that is then
//! renamed over the target, so readers never observe a half-written document.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use hookshelf_core::{StorageError, WebhookFields, WebhookId, WebhookPatch, WebhookRecord, WebhookStore};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

#[cfg(test)]
#[path = "json_file_tests.rs"]
mod tests;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredDocument {
    #[serde(default)]
    webhooks: Vec<WebhookRecord>,
}

/// Store persisting the collection as a single JSON document on disk.
///
/// A missing or blank file reads as an empty collection; the file (and its
/// parent directory) is created on the first write.
#[derive(Debug)]
pub struct JsonFileWebhookStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileWebhookStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> Result<StoredDocument, StorageError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Store file does not exist yet");
                return Ok(StoredDocument::default());
            }
            Err(e) => {
                return Err(StorageError::Io {
                    reason: format!("failed to read {}: {}", self.path.display(), e),
                })
            }
        };

        if contents.trim().is_empty() {
            return Ok(StoredDocument::default());
        }

        serde_json::from_str(&contents).map_err(|e| {
            warn!(path = %self.path.display(), error = %e, "Store file is not valid JSON");
            StorageError::Serialization {
                reason: format!("failed to parse {}: {}", self.path.display(), e),
            }
        })
    }

    async fn write_document(&self, document: &StoredDocument) -> Result<(), StorageError> {
        let contents = serde_json::to_string_pretty(document).map_err(|e| StorageError::Serialization {
            reason: format!("failed to serialize webhooks: {}", e),
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| StorageError::Io {
                reason: format!("failed to create {}: {}", parent.display(), e),
            })?;
        }

        let temp_path = self.temp_path();
        tokio::fs::write(&temp_path, contents).await.map_err(|e| StorageError::Io {
            reason: format!("failed to write {}: {}", temp_path.display(), e),
        })?;
        tokio::fs::rename(&temp_path, &self.path).await.map_err(|e| StorageError::Io {
            reason: format!("failed to replace {}: {}", self.path.display(), e),
        })?;

        debug!(
            path = %self.path.display(),
            records = document.webhooks.len(),
            "Store file written"
        );
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl WebhookStore for JsonFileWebhookStore {
    async fn list(&self) -> Result<Vec<WebhookRecord>, StorageError> {
        Ok(self.read_document().await?.webhooks)
    }

    async fn insert(&self, fields: WebhookFields) -> Result<WebhookRecord, StorageError> {
        let _guard = self.write_lock.lock().await;

        let mut document = self.read_document().await?;
        let record = WebhookRecord::create(fields, Utc::now());
        document.webhooks.push(record.clone());
        self.write_document(&document).await?;

        info!(id = %record.id, path = %self.path.display(), "Webhook persisted");
        Ok(record)
    }

    async fn update(&self, id: &WebhookId, patch: WebhookPatch) -> Result<WebhookRecord, StorageError> {
        let _guard = self.write_lock.lock().await;

        let mut document = self.read_document().await?;
        let record = document
            .webhooks
            .iter_mut()
            .find(|record| &record.id == id)
            .ok_or_else(|| StorageError::NotFound { id: id.to_string() })?;
        record.apply(patch, Utc::now());
        let updated = record.clone();

        self.write_document(&document).await?;
        Ok(updated)
    }

    async fn remove(&self, id: &WebhookId) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;

        let mut document = self.read_document().await?;
        let before = document.webhooks.len();
        document.webhooks.retain(|record| &record.id != id);
        if document.webhooks.len() == before {
            return Err(StorageError::NotFound { id: id.to_string() });
        }

        self.write_document(&document).await
    }
}
