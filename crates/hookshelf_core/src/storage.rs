//! Persistence collaborator interface.
//!
//! The core never talks to a concrete storage engine. It consumes an
//! asynchronous, ordered list of records through [`WebhookStore`]; adapters
//! live in the `hookshelf_storage` crate and are chosen by the composition
//! root at startup.

use async_trait::async_trait;

use crate::errors::StorageError;
use crate::record::{WebhookFields, WebhookId, WebhookPatch, WebhookRecord};

/// Asynchronous store holding an ordered list of webhook records.
///
/// # Contract
///
/// - `list` returns records in insertion order
/// - `insert` assigns the id and both timestamps
/// - `update` bumps `updated_at`, never touches `id` or `created_at`
/// - implementations serialize their own writes and must be thread-safe
/// - secret values must not appear in logs or error messages
#[async_trait]
pub trait WebhookStore: Send + Sync {
    /// Return every stored record in insertion order.
    async fn list(&self) -> Result<Vec<WebhookRecord>, StorageError>;

    /// Append a new record built from `fields` and return it.
    async fn insert(&self, fields: WebhookFields) -> Result<WebhookRecord, StorageError>;

    /// Apply `patch` to the record with `id` and return the updated record.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if no record has this id.
    async fn update(&self, id: &WebhookId, patch: WebhookPatch)
        -> Result<WebhookRecord, StorageError>;

    /// Delete the record with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if no record has this id.
    async fn remove(&self, id: &WebhookId) -> Result<(), StorageError>;
}
