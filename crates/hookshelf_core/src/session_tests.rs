//! Tests for the import session state machine.

use super::*;
use crate::errors::{HookshelfError, ImportError, StorageError};
use crate::record::{WebhookFields, WebhookId, WebhookPatch};
use crate::storage::WebhookStore;
use crate::validation::DefaultValidator;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;
use std::time::Duration;

const TWO_ROWS: &str = "name,url\nA,http://a.test\nB,http://b.test";

#[derive(Default)]
struct CountingStore {
    inserts: Mutex<Vec<WebhookFields>>,
}

#[async_trait]
impl WebhookStore for CountingStore {
    async fn list(&self) -> Result<Vec<WebhookRecord>, StorageError> {
        Ok(Vec::new())
    }

    async fn insert(&self, fields: WebhookFields) -> Result<WebhookRecord, StorageError> {
        self.inserts.lock().unwrap().push(fields.clone());
        Ok(WebhookRecord::create(fields, Utc::now()))
    }

    async fn update(
        &self,
        id: &WebhookId,
        _patch: WebhookPatch,
    ) -> Result<WebhookRecord, StorageError> {
        Err(StorageError::NotFound { id: id.to_string() })
    }

    async fn remove(&self, id: &WebhookId) -> Result<(), StorageError> {
        Err(StorageError::NotFound { id: id.to_string() })
    }
}

#[test]
fn test_new_session_is_idle() {
    let session = ImportSession::new();
    assert_eq!(session.state(), &ImportState::Idle);
    assert!(session.staged().is_none());
    assert!(!session.is_committing());
}

#[test]
fn test_stage_moves_to_staged() {
    let mut session = ImportSession::new();
    session.stage(TWO_ROWS).unwrap();

    let staged = session.staged().expect("Expected a staged import");
    assert_eq!(staged.len(), 2);
}

#[test]
fn test_stage_failure_keeps_previous_state() {
    let mut session = ImportSession::new();
    session.stage(TWO_ROWS).unwrap();

    let err = session.stage("   ").unwrap_err();
    assert_eq!(err, HookshelfError::Import(ImportError::EmptyFile));
    assert_eq!(session.staged().map(StagedImport::len), Some(2));
}

#[test]
fn test_restage_replaces_previous_import() {
    let mut session = ImportSession::new();
    session.stage(TWO_ROWS).unwrap();
    session.stage_bytes(b"C,http://c.test").unwrap();

    let staged = session.staged().unwrap();
    assert_eq!(staged.len(), 1);
    assert_eq!(staged.candidates[0].name, "C");
}

#[test]
fn test_cancel_returns_to_idle() {
    let mut session = ImportSession::new();
    session.stage(TWO_ROWS).unwrap();
    session.cancel().unwrap();
    assert_eq!(session.state(), &ImportState::Idle);

    // Cancelling while idle is a no-op.
    session.cancel().unwrap();
    assert_eq!(session.state(), &ImportState::Idle);
}

#[test]
fn test_begin_commit_requires_staged_import() {
    let mut session = ImportSession::new();
    assert_eq!(session.begin_commit(), Err(SessionError::NothingStaged));
    assert_eq!(session.state(), &ImportState::Idle);
}

#[test]
fn test_committing_blocks_stage_cancel_and_second_commit() {
    let mut session = ImportSession::new();
    session.stage(TWO_ROWS).unwrap();

    let staged = session.begin_commit().unwrap();
    assert_eq!(staged.len(), 2);
    assert_eq!(session.state(), &ImportState::Committing { total: 2 });

    assert_eq!(
        session.stage(TWO_ROWS),
        Err(HookshelfError::Session(SessionError::CommitInProgress))
    );
    assert_eq!(session.cancel(), Err(SessionError::CommitInProgress));
    assert_eq!(session.begin_commit(), Err(SessionError::CommitInProgress));
    assert_eq!(session.state(), &ImportState::Committing { total: 2 });

    session.finish_commit().unwrap();
    assert_eq!(session.state(), &ImportState::Idle);
}

#[test]
fn test_finish_commit_outside_commit_is_rejected() {
    let mut session = ImportSession::new();
    assert_eq!(session.finish_commit(), Err(SessionError::NotCommitting));

    session.stage(TWO_ROWS).unwrap();
    assert_eq!(session.finish_commit(), Err(SessionError::NotCommitting));
    assert!(session.staged().is_some());
}

#[tokio::test]
async fn test_commit_runs_full_cycle() {
    let store = CountingStore::default();
    let validator = DefaultValidator::default();
    let committer = ImportCommitter::new(&store, &validator);

    let mut session = ImportSession::new();
    session.stage(TWO_ROWS).unwrap();

    let summary = session.commit(&committer, &[]).await.unwrap();

    assert_eq!(summary.added_count, 2);
    assert_eq!(session.state(), &ImportState::Idle);
    assert_eq!(store.inserts.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_commit_without_staged_import_writes_nothing() {
    let store = CountingStore::default();
    let validator = DefaultValidator::default();
    let committer = ImportCommitter::new(&store, &validator);

    let mut session = ImportSession::new();
    let result = session.commit(&committer, &[]).await;

    assert_eq!(result, Err(SessionError::NothingStaged));
    assert!(store.inserts.lock().unwrap().is_empty());
}

// Store whose inserts never complete.
struct StalledStore;

#[async_trait]
impl WebhookStore for StalledStore {
    async fn list(&self) -> Result<Vec<WebhookRecord>, StorageError> {
        Ok(Vec::new())
    }

    async fn insert(&self, _fields: WebhookFields) -> Result<WebhookRecord, StorageError> {
        std::future::pending().await
    }

    async fn update(
        &self,
        id: &WebhookId,
        _patch: WebhookPatch,
    ) -> Result<WebhookRecord, StorageError> {
        Err(StorageError::NotFound { id: id.to_string() })
    }

    async fn remove(&self, id: &WebhookId) -> Result<(), StorageError> {
        Err(StorageError::NotFound { id: id.to_string() })
    }
}

#[tokio::test]
async fn test_dropped_commit_returns_session_to_idle() {
    let store = StalledStore;
    let validator = DefaultValidator::default();
    let committer = ImportCommitter::new(&store, &validator);

    let mut session = ImportSession::new();
    session.stage("A,http://a.test").unwrap();

    let outcome =
        tokio::time::timeout(Duration::from_millis(20), session.commit(&committer, &[])).await;
    assert!(outcome.is_err(), "Commit should still be pending");

    assert_eq!(session.state(), &ImportState::Idle);
    session.stage(TWO_ROWS).unwrap();
    assert_eq!(session.staged().map(StagedImport::len), Some(2));
    session.cancel().unwrap();
}
