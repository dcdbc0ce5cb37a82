//! Export producer.
//!
//! Renders the current collection as CSV text. Writing or downloading the
//! text is the job of a [`FileEmitter`] supplied by the caller.

use async_trait::async_trait;
use tracing::info;

use crate::csv_codec;
use crate::errors::ExportError;
use crate::record::{WebhookFields, WebhookRecord};

#[cfg(test)]
#[path = "export_tests.rs"]
mod tests;

/// File name offered for exports unless configured otherwise.
pub const DEFAULT_EXPORT_FILE_NAME: &str = "webhooks.csv";

/// MIME type of the exported document.
pub const CSV_MIME_TYPE: &str = "text/csv";

/// Render `records` as CSV text.
///
/// Ids and timestamps are dropped; only `name`, `url` and `secret` are written.
///
/// # Errors
///
/// Returns [`ExportError::NothingToExport`] when `records` is empty. No CSV is
/// produced in that case, not even a header.
pub fn produce_export(records: &[WebhookRecord]) -> Result<String, ExportError> {
    if records.is_empty() {
        return Err(ExportError::NothingToExport);
    }

    let fields: Vec<WebhookFields> = records.iter().map(WebhookRecord::fields).collect();
    let csv = csv_codec::serialize(&fields);

    info!(records = records.len(), bytes = csv.len(), "Export produced");
    Ok(csv)
}

/// A rendered export ready to be handed to a [`FileEmitter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub mime_type: String,
    pub contents: String,
}

impl ExportFile {
    /// Wrap CSV text under the default file name.
    pub fn csv(contents: String) -> Self {
        Self::named(DEFAULT_EXPORT_FILE_NAME, contents)
    }

    pub fn named(file_name: impl Into<String>, contents: String) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: CSV_MIME_TYPE.to_string(),
            contents,
        }
    }
}

/// Collaborator that delivers an export to the user (download, file write, ...).
#[async_trait]
pub trait FileEmitter: Send + Sync {
    /// Emit the file.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Emit`] if the file could not be delivered.
    async fn emit(&self, file: &ExportFile) -> Result<(), ExportError>;
}
