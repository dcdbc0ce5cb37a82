//! In-memory webhook store.

use async_trait::async_trait;
use chrono::Utc;
use hookshelf_core::{StorageError, WebhookFields, WebhookId, WebhookPatch, WebhookRecord, WebhookStore};
use tokio::sync::RwLock;
use tracing::debug;

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;

/// Store keeping records in process memory, in insertion order.
///
/// Nothing survives the process. Used when no durable backend is configured
/// and as a fixture in tests.
#[derive(Debug, Default)]
pub struct InMemoryWebhookStore {
    records: RwLock<Vec<WebhookRecord>>,
}

impl InMemoryWebhookStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing records.
    pub fn with_records(records: Vec<WebhookRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

#[async_trait]
impl WebhookStore for InMemoryWebhookStore {
    async fn list(&self) -> Result<Vec<WebhookRecord>, StorageError> {
        Ok(self.records.read().await.clone())
    }

    async fn insert(&self, fields: WebhookFields) -> Result<WebhookRecord, StorageError> {
        let record = WebhookRecord::create(fields, Utc::now());
        self.records.write().await.push(record.clone());
        debug!(id = %record.id, "Inserted webhook into memory store");
        Ok(record)
    }

    async fn update(&self, id: &WebhookId, patch: WebhookPatch) -> Result<WebhookRecord, StorageError> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|record| &record.id == id)
            .ok_or_else(|| StorageError::NotFound { id: id.to_string() })?;

        record.apply(patch, Utc::now());
        Ok(record.clone())
    }

    async fn remove(&self, id: &WebhookId) -> Result<(), StorageError> {
        let mut records = self.records.write().await;
        let position = records
            .iter()
            .position(|record| &record.id == id)
            .ok_or_else(|| StorageError::NotFound { id: id.to_string() })?;

        records.remove(position);
        debug!(id = %id, "Removed webhook from memory store");
        Ok(())
    }
}
