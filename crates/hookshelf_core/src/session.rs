//! Import session state machine.
//!
//! Drives the two-phase import flow `Idle -> Staged -> Committing -> Idle`.
//! A staged import is never partially committed: once committing starts the
//! whole batch is handed to the committer, and staging again or cancelling is
//! refused until the commit has finished.

use tracing::{debug, info, warn};

use crate::committer::{ImportCommitter, ImportSummary};
use crate::errors::{HookshelfResult, SessionError};
use crate::record::WebhookRecord;
use crate::staging::{stage_import, stage_import_bytes, StagedImport};

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;

/// Current phase of an import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ImportState {
    /// Nothing staged.
    #[default]
    Idle,

    /// A file has been staged and awaits confirmation.
    Staged(StagedImport),

    /// A staged import is being written; `total` candidates are in flight.
    Committing { total: usize },
}

/// Owner of the import state machine for one UI surface.
#[derive(Debug, Default)]
pub struct ImportSession {
    state: ImportState,
}

impl ImportSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ImportState {
        &self.state
    }

    /// The staged import, if one is awaiting confirmation.
    pub fn staged(&self) -> Option<&StagedImport> {
        match &self.state {
            ImportState::Staged(staged) => Some(staged),
            _ => None,
        }
    }

    pub fn is_committing(&self) -> bool {
        matches!(self.state, ImportState::Committing { .. })
    }

    /// Stage raw CSV text, replacing any import staged earlier.
    ///
    /// # Errors
    ///
    /// - [`SessionError::CommitInProgress`] while a commit is running
    /// - any [`crate::ImportError`] from staging; the previous state is kept
    pub fn stage(&mut self, raw_text: &str) -> HookshelfResult<()> {
        self.ensure_not_committing()?;
        let staged = stage_import(raw_text)?;
        self.replace_staged(staged);
        Ok(())
    }

    /// Stage raw file bytes (decoded as UTF-8), replacing any earlier import.
    ///
    /// # Errors
    ///
    /// Same as [`ImportSession::stage`].
    pub fn stage_bytes(&mut self, raw: &[u8]) -> HookshelfResult<()> {
        self.ensure_not_committing()?;
        let staged = stage_import_bytes(raw)?;
        self.replace_staged(staged);
        Ok(())
    }

    /// Discard the staged import, if any.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::CommitInProgress`] while a commit is running;
    /// a started commit cannot be cancelled.
    pub fn cancel(&mut self) -> Result<(), SessionError> {
        self.ensure_not_committing()?;
        if matches!(self.state, ImportState::Staged(_)) {
            info!("Staged import cancelled");
        }
        self.state = ImportState::Idle;
        Ok(())
    }

    /// Move from `Staged` to `Committing`, handing out the staged import.
    ///
    /// # Errors
    ///
    /// - [`SessionError::NothingStaged`] when idle
    /// - [`SessionError::CommitInProgress`] when already committing
    pub fn begin_commit(&mut self) -> Result<StagedImport, SessionError> {
        match std::mem::take(&mut self.state) {
            ImportState::Staged(staged) => {
                debug!(total = staged.len(), "Import session entering commit");
                self.state = ImportState::Committing {
                    total: staged.len(),
                };
                Ok(staged)
            }
            ImportState::Idle => Err(SessionError::NothingStaged),
            committing @ ImportState::Committing { .. } => {
                self.state = committing;
                Err(SessionError::CommitInProgress)
            }
        }
    }

    /// Move from `Committing` back to `Idle`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotCommitting`] in any other state.
    pub fn finish_commit(&mut self) -> Result<(), SessionError> {
        if !self.is_committing() {
            return Err(SessionError::NotCommitting);
        }
        self.state = ImportState::Idle;
        Ok(())
    }

    /// Commit the staged import and return to `Idle`.
    ///
    /// `existing` is treated as a read-only snapshot for the whole commit.
    /// If the returned future is dropped before it completes, the session
    /// still returns to `Idle`; records inserted up to that point stay
    /// persisted and the staged import is discarded.
    ///
    /// # Errors
    ///
    /// Same as [`ImportSession::begin_commit`]. Per-record failures are
    /// reported in the summary, never here.
    pub async fn commit(
        &mut self,
        committer: &ImportCommitter<'_>,
        existing: &[WebhookRecord],
    ) -> Result<ImportSummary, SessionError> {
        let staged = self.begin_commit()?;
        let mut guard = CommitGuard { session: self };
        let summary = committer.commit(&staged, existing).await;
        guard.session.finish_commit()?;
        Ok(summary)
    }

    fn ensure_not_committing(&self) -> Result<(), SessionError> {
        if self.is_committing() {
            return Err(SessionError::CommitInProgress);
        }
        Ok(())
    }

    fn replace_staged(&mut self, staged: StagedImport) {
        if matches!(self.state, ImportState::Staged(_)) {
            debug!("Replacing previously staged import");
        }
        self.state = ImportState::Staged(staged);
    }
}

// Returns an abandoned commit to `Idle` so the session can stage again.
struct CommitGuard<'s> {
    session: &'s mut ImportSession,
}

impl Drop for CommitGuard<'_> {
    fn drop(&mut self) {
        if self.session.is_committing() {
            warn!("Import commit abandoned before completion");
            self.session.state = ImportState::Idle;
        }
    }
}
