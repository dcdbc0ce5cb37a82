//! Webhook service facade.
//!
//! This module provides the [`WebhookService`] component, the programmatic
//! surface a UI layer drives: list/search/create/update/delete, the staged
//! CSV import flow and CSV export. It owns no storage itself; everything is
//! delegated to the injected [`WebhookStore`] and [`WebhookValidator`].

use std::sync::Arc;

use tracing::{info, warn};

use crate::committer::{ImportCommitter, ImportSummary, ProgressCallback};
use crate::errors::{HookshelfResult, SessionError, StorageError};
use crate::export::{produce_export, ExportFile, FileEmitter, DEFAULT_EXPORT_FILE_NAME};
use crate::record::{WebhookFields, WebhookId, WebhookPatch, WebhookRecord};
use crate::search::filter_webhooks;
use crate::session::{ImportSession, ImportState};
use crate::staging::StagedImport;
use crate::storage::WebhookStore;
use crate::validation::{validate_fields, WebhookValidator};

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;

/// Manages a user's webhook list on top of an injected store.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use hookshelf_core::{DefaultValidator, WebhookFields, WebhookService, WebhookStore};
///
/// # async fn example(store: Arc<dyn WebhookStore>) -> Result<(), Box<dyn std::error::Error>> {
/// let mut service = WebhookService::new(store, Arc::new(DefaultValidator::default()));
///
/// service
///     .create(WebhookFields::new("CI", "https://ci.example.com/hook", ""))
///     .await?;
///
/// let staged = service.stage_import("name,url\nChat,https://chat.example.com/in")?;
/// println!("{} rows ready to import", staged.len());
///
/// let summary = service.commit_import(None).await?;
/// println!("Imported {} webhooks", summary.added_count);
/// # Ok(())
/// # }
/// ```
pub struct WebhookService {
    store: Arc<dyn WebhookStore>,
    validator: Arc<dyn WebhookValidator>,
    session: ImportSession,
    export_file_name: String,
}

impl WebhookService {
    pub fn new(store: Arc<dyn WebhookStore>, validator: Arc<dyn WebhookValidator>) -> Self {
        Self {
            store,
            validator,
            session: ImportSession::new(),
            export_file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
        }
    }

    /// Use `file_name` for exported files instead of the default.
    pub fn with_export_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.export_file_name = file_name.into();
        self
    }

    /// All records in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `HookshelfError::Storage` if the store cannot be read.
    pub async fn list(&self) -> HookshelfResult<Vec<WebhookRecord>> {
        Ok(self.store.list().await?)
    }

    /// Records whose name or URL contains `query`, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns `HookshelfError::Storage` if the store cannot be read.
    pub async fn search(&self, query: &str) -> HookshelfResult<Vec<WebhookRecord>> {
        let records = self.store.list().await?;
        Ok(filter_webhooks(&records, query)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Create a webhook from a form submission.
    ///
    /// Name and URL are trimmed before validation.
    ///
    /// # Errors
    ///
    /// - `HookshelfError::Validation` if a field is empty, the URL is not
    ///   http(s) or the secret fails the policy
    /// - `HookshelfError::Storage` if the insert fails
    pub async fn create(&self, fields: WebhookFields) -> HookshelfResult<WebhookRecord> {
        let fields = normalize(fields);
        validate_fields(&fields, self.validator.as_ref())?;

        let record = self.store.insert(fields).await?;
        info!(id = %record.id, name = %record.name, "Webhook created");
        Ok(record)
    }

    /// Apply a partial update to an existing webhook.
    ///
    /// The merged result is validated exactly like a new webhook.
    ///
    /// # Errors
    ///
    /// - `HookshelfError::Storage` with `NotFound` if `id` is unknown
    /// - `HookshelfError::Validation` if the merged fields are invalid
    pub async fn update(&self, id: &WebhookId, patch: WebhookPatch) -> HookshelfResult<WebhookRecord> {
        let records = self.store.list().await?;
        let current = records
            .iter()
            .find(|record| &record.id == id)
            .ok_or_else(|| StorageError::NotFound { id: id.to_string() })?;

        let patch = WebhookPatch {
            name: patch.name.map(|name| name.trim().to_string()),
            url: patch.url.map(|url| url.trim().to_string()),
            secret: patch.secret,
        };
        validate_fields(&patch.merged_with(&current.fields()), self.validator.as_ref())?;

        let record = self.store.update(id, patch).await?;
        info!(id = %record.id, name = %record.name, "Webhook updated");
        Ok(record)
    }

    /// Delete a webhook.
    ///
    /// # Errors
    ///
    /// Returns `HookshelfError::Storage` with `NotFound` if `id` is unknown.
    pub async fn delete(&self, id: &WebhookId) -> HookshelfResult<()> {
        self.store.remove(id).await?;
        info!(id = %id, "Webhook deleted");
        Ok(())
    }

    pub fn import_state(&self) -> &ImportState {
        self.session.state()
    }

    /// Stage CSV text for import and return what was staged.
    ///
    /// # Errors
    ///
    /// - `HookshelfError::Import` for an empty file or a file without valid rows
    /// - `HookshelfError::Session` while a commit is running
    pub fn stage_import(&mut self, raw_text: &str) -> HookshelfResult<StagedImport> {
        self.session.stage(raw_text)?;
        self.current_staged()
    }

    /// Stage raw file bytes for import.
    ///
    /// # Errors
    ///
    /// Same as [`WebhookService::stage_import`].
    pub fn stage_import_bytes(&mut self, raw: &[u8]) -> HookshelfResult<StagedImport> {
        self.session.stage_bytes(raw)?;
        self.current_staged()
    }

    /// Discard the staged import.
    ///
    /// # Errors
    ///
    /// Returns `HookshelfError::Session` while a commit is running.
    pub fn cancel_import(&mut self) -> HookshelfResult<()> {
        Ok(self.session.cancel()?)
    }

    /// Commit the staged import against the records currently stored.
    ///
    /// # Errors
    ///
    /// - `HookshelfError::Session` if nothing is staged or a commit is running
    /// - `HookshelfError::Storage` if the current records cannot be listed;
    ///   nothing is written and the import stays staged
    ///
    /// Per-record failures never surface here; they are counted in the
    /// returned [`ImportSummary`].
    pub async fn commit_import(
        &mut self,
        progress: Option<ProgressCallback>,
    ) -> HookshelfResult<ImportSummary> {
        if self.session.staged().is_none() {
            let err = if self.session.is_committing() {
                SessionError::CommitInProgress
            } else {
                SessionError::NothingStaged
            };
            return Err(err.into());
        }

        let existing = match self.store.list().await {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "Cannot load existing webhooks, import left staged");
                return Err(e.into());
            }
        };

        let mut committer = ImportCommitter::new(self.store.as_ref(), self.validator.as_ref());
        if let Some(progress) = progress {
            committer = committer.with_progress(progress);
        }

        Ok(self.session.commit(&committer, &existing).await?)
    }

    /// Render all records as a CSV export file.
    ///
    /// # Errors
    ///
    /// - `HookshelfError::Export` with `NothingToExport` if there are no records
    /// - `HookshelfError::Storage` if the store cannot be read
    pub async fn export(&self) -> HookshelfResult<ExportFile> {
        let records = self.store.list().await?;
        let contents = produce_export(&records)?;
        Ok(ExportFile::named(self.export_file_name.as_str(), contents))
    }

    /// Render all records and hand the file to `emitter`.
    ///
    /// # Errors
    ///
    /// Same as [`WebhookService::export`], plus `HookshelfError::Export` with
    /// `Emit` if the emitter fails.
    pub async fn export_to(&self, emitter: &dyn FileEmitter) -> HookshelfResult<ExportFile> {
        let file = self.export().await?;
        emitter.emit(&file).await?;
        info!(file_name = %file.file_name, "Export emitted");
        Ok(file)
    }

    fn current_staged(&self) -> HookshelfResult<StagedImport> {
        self.session
            .staged()
            .cloned()
            .ok_or_else(|| SessionError::NothingStaged.into())
    }
}

fn normalize(fields: WebhookFields) -> WebhookFields {
    WebhookFields {
        name: fields.name.trim().to_string(),
        url: fields.url.trim().to_string(),
        secret: fields.secret,
    }
}
