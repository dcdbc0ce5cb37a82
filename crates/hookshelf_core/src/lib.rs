//! # Hookshelf Core
//!
//! Domain logic for managing a personal list of outgoing webhook endpoints:
//! CRUD, search, and bulk CSV import/export.
//!
//! ## Overview
//!
//! Importing is a two-phase flow:
//! 1. [`stage_import`] parses raw CSV text into candidates without touching storage
//! 2. [`ImportCommitter`] persists the staged candidates one by one, skipping
//!    duplicates of existing records and counting per-record failures
//!
//! [`ImportSession`] tracks which phase an import is in, and
//! [`WebhookService`] ties everything together behind one facade.
//!
//! Exporting renders every record as quoted CSV via [`produce_export`] and
//! hands the result to a [`FileEmitter`].
//!
//! ## Architecture
//!
//! The crate follows a dependency injection pattern:
//! - [`WebhookStore`] trait for persistence (adapters live in `hookshelf_storage`)
//! - [`WebhookValidator`] trait for URL and secret checks
//! - [`FileEmitter`] trait for delivering exported files
//!
//! ## Examples
//!
//! ```rust
//! use hookshelf_core::{produce_export, stage_import, WebhookFields, WebhookRecord};
//! use chrono::Utc;
//!
//! let staged = stage_import("name,url,secret\nCI,https://ci.test/hook,s3cret").unwrap();
//! assert_eq!(staged.candidates[0].name, "CI");
//!
//! let record = WebhookRecord::create(WebhookFields::new("CI", "https://ci.test/hook", ""), Utc::now());
//! let csv = produce_export(&[record]).unwrap();
//! assert!(csv.starts_with("\"name\",\"url\",\"secret\""));
//! ```

pub mod committer;
pub mod csv_codec;
pub mod errors;
pub mod export;
pub mod record;
pub mod search;
pub mod service;
pub mod session;
pub mod staging;
pub mod storage;
pub mod validation;

pub use committer::{ImportCommitter, ImportFailure, ImportProgress, ImportSummary, ProgressCallback};
pub use errors::{
    ExportError, HookshelfError, HookshelfResult, ImportError, SessionError, StorageError,
    ValidationError,
};
pub use export::{
    produce_export, ExportFile, FileEmitter, CSV_MIME_TYPE, DEFAULT_EXPORT_FILE_NAME,
};
pub use record::{ImportCandidate, WebhookFields, WebhookId, WebhookPatch, WebhookRecord};
pub use search::filter_webhooks;
pub use service::WebhookService;
pub use session::{ImportSession, ImportState};
pub use staging::{stage_import, stage_import_bytes, RowDiagnostic, RowRejection, StagedImport};
pub use storage::WebhookStore;
pub use validation::{
    is_valid_url, validate_fields, DefaultValidator, SecretPolicy, WebhookValidator,
};
