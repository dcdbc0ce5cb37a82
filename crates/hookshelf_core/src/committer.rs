//! Import committer: persist a staged import against the current collection.
//!
//! This module provides the [`ImportCommitter`] component, which classifies
//! each staged candidate as new or duplicate, validates new candidates and
//! inserts them one at a time through the [`WebhookStore`].

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::record::{ImportCandidate, WebhookRecord};
use crate::staging::StagedImport;
use crate::storage::WebhookStore;
use crate::validation::{validate_fields, WebhookValidator};

#[cfg(test)]
#[path = "committer_tests.rs"]
mod tests;

/// Progress callback invoked after every processed candidate.
pub type ProgressCallback = Box<dyn Fn(&ImportProgress) + Send + Sync>;

/// Progress of a running commit. Every counter only ever grows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportProgress {
    /// Candidates processed so far.
    pub processed: usize,
    /// Total number of candidates in the staged import.
    pub total: usize,
    pub added: usize,
    pub duplicates: usize,
    pub errors: usize,
}

impl ImportProgress {
    /// Returns the percentage complete (0-100).
    pub fn percent_complete(&self) -> f32 {
        if self.total == 0 {
            100.0
        } else {
            (self.processed as f32 / self.total as f32) * 100.0
        }
    }
}

/// A candidate that could not be persisted.
///
/// Never carries the secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportFailure {
    pub name: String,
    pub url: String,
    pub reason: String,
}

/// Result of committing a staged import.
///
/// `added_count + duplicate_count + error_count` always equals the number of
/// staged candidates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Number of candidates persisted
    pub added_count: usize,

    /// Number of candidates matching an existing record
    pub duplicate_count: usize,

    /// Number of candidates that failed validation or persistence
    pub error_count: usize,

    /// Details of each failure counted in `error_count`
    pub failures: Vec<ImportFailure>,
}

impl ImportSummary {
    /// Creates a new empty summary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of candidates processed.
    pub fn total(&self) -> usize {
        self.added_count + self.duplicate_count + self.error_count
    }

    /// Returns true if no candidate failed.
    pub fn is_success(&self) -> bool {
        self.error_count == 0
    }

    /// Returns true if at least one record was persisted.
    pub fn has_changes(&self) -> bool {
        self.added_count > 0
    }

    fn record_failure(&mut self, candidate: &ImportCandidate, reason: String) {
        self.error_count += 1;
        self.failures.push(ImportFailure {
            name: candidate.name.clone(),
            url: candidate.url.clone(),
            reason,
        });
    }
}

/// Key under which two webhooks count as duplicates: name and URL, ignoring case.
fn duplicate_key(name: &str, url: &str) -> (String, String) {
    (name.to_lowercase(), url.to_lowercase())
}

/// Commits staged imports through a persistence collaborator.
///
/// # Examples
///
/// ```rust,no_run
/// use hookshelf_core::{stage_import, DefaultValidator, ImportCommitter, WebhookStore};
///
/// # async fn example(store: &dyn WebhookStore) -> Result<(), Box<dyn std::error::Error>> {
/// let staged = stage_import("name,url\nCI,https://ci.test/hook")?;
/// let existing = store.list().await?;
///
/// let validator = DefaultValidator::default();
/// let committer = ImportCommitter::new(store, &validator)
///     .with_progress(Box::new(|p| println!("{}/{}", p.processed, p.total)));
///
/// let summary = committer.commit(&staged, &existing).await;
/// println!("Added: {}, duplicates: {}", summary.added_count, summary.duplicate_count);
/// # Ok(())
/// # }
/// ```
pub struct ImportCommitter<'a> {
    store: &'a dyn WebhookStore,
    validator: &'a dyn WebhookValidator,
    progress: Option<ProgressCallback>,
}

impl<'a> ImportCommitter<'a> {
    pub fn new(store: &'a dyn WebhookStore, validator: &'a dyn WebhookValidator) -> Self {
        Self {
            store,
            validator,
            progress: None,
        }
    }

    /// Report progress after every processed candidate.
    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Commit `staged` against a snapshot of the existing records.
    ///
    /// # Behavior
    ///
    /// 1. Candidates are processed sequentially, in staged order
    /// 2. A candidate matching an existing record (case-insensitive name and
    ///    URL) is counted as a duplicate and never persisted
    /// 3. Other candidates are validated (URL scheme, secret policy) and
    ///    inserted; a validation or insert failure is counted and the batch
    ///    continues
    ///
    /// # Error Handling
    ///
    /// Never fails as a whole. There is no rollback: records inserted before a
    /// failure stay persisted and the caller learns about failures from the
    /// returned summary.
    pub async fn commit(&self, staged: &StagedImport, existing: &[WebhookRecord]) -> ImportSummary {
        info!(
            candidates = staged.len(),
            existing = existing.len(),
            "Committing staged import"
        );

        let existing_keys: HashSet<(String, String)> = existing
            .iter()
            .map(|record| duplicate_key(&record.name, &record.url))
            .collect();

        let mut summary = ImportSummary::new();
        let mut progress = ImportProgress {
            total: staged.len(),
            ..ImportProgress::default()
        };

        for candidate in &staged.candidates {
            if existing_keys.contains(&duplicate_key(&candidate.name, &candidate.url)) {
                debug!(name = %candidate.name, url = %candidate.url, "Skipping duplicate webhook");
                summary.duplicate_count += 1;
            } else {
                self.persist(candidate, &mut summary).await;
            }

            progress.processed += 1;
            progress.added = summary.added_count;
            progress.duplicates = summary.duplicate_count;
            progress.errors = summary.error_count;
            if let Some(callback) = &self.progress {
                callback(&progress);
            }
        }

        info!(
            added = summary.added_count,
            duplicates = summary.duplicate_count,
            errors = summary.error_count,
            "Import commit complete"
        );

        summary
    }

    async fn persist(&self, candidate: &ImportCandidate, summary: &mut ImportSummary) {
        if let Err(e) = validate_fields(candidate, self.validator) {
            warn!(name = %candidate.name, error = %e, "Rejecting invalid import candidate");
            summary.record_failure(candidate, e.to_string());
            return;
        }

        match self.store.insert(candidate.clone()).await {
            Ok(record) => {
                debug!(name = %record.name, id = %record.id, "Imported webhook");
                summary.added_count += 1;
            }
            Err(e) => {
                warn!(name = %candidate.name, error = %e, "Failed to persist imported webhook");
                summary.record_failure(candidate, e.to_string());
            }
        }
    }
}
