//! Error types for the webhook import/export core.
//!
//! Each concern gets its own enum so callers can match on exactly the
//! failures an operation can produce. [`HookshelfError`] aggregates them for
//! facades such as [`crate::WebhookService`] that span several concerns.
//!
//! Non-fatal conditions (malformed rows, invalid candidates, single-record
//! persistence failures) are deliberately absent here: they are counted and
//! described in [`crate::StagedImport`] and [`crate::ImportSummary`] instead.

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Failures that abort staging of an import file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    /// The raw input was empty or contained only whitespace.
    #[error("The import file contains no data")]
    EmptyFile,

    /// The file was readable but no row survived parsing and validation.
    #[error("No valid webhook rows were found in the import file")]
    NoValidRows,
}

/// Failures of the export producer and its file-emission collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    /// Export was requested with an empty record collection.
    #[error("There are no webhooks to export")]
    NothingToExport,

    /// The file-emission collaborator could not write the export.
    #[error("Failed to emit export file: {reason}")]
    Emit { reason: String },
}

/// Field-level validation failures for a webhook.
///
/// Security note: never carries the secret value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field is empty: {field}")]
    EmptyField { field: String },

    #[error("Invalid webhook URL (only http and https are allowed): {url}")]
    InvalidUrl { url: String },

    #[error("Secret does not satisfy the configured secret policy")]
    UnacceptableSecret,
}

impl ValidationError {
    /// Create an empty field error
    pub fn empty_field(field: impl Into<String>) -> Self {
        Self::EmptyField {
            field: field.into(),
        }
    }

    /// Create an invalid URL error
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }
}

/// Errors signalled by the persistence collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Webhook not found: {id}")]
    NotFound { id: String },

    #[error("Storage I/O error: {reason}")]
    Io { reason: String },

    #[error("Failed to (de)serialize stored webhooks: {reason}")]
    Serialization { reason: String },

    #[error("Storage rejected the operation: {reason}")]
    Rejected { reason: String },
}

/// Invalid transitions of the import session state machine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("No import has been staged")]
    NothingStaged,

    #[error("An import is already being committed")]
    CommitInProgress,

    #[error("No import commit is in progress")]
    NotCommitting,
}

/// Top-level error for operations that span several concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HookshelfError {
    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Result type alias for operations returning [`HookshelfError`].
pub type HookshelfResult<T> = Result<T, HookshelfError>;
