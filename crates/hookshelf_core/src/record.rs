//! Webhook record types
//!
//! The persisted [`WebhookRecord`] and the `{name, url, secret}` projection
//! ([`WebhookFields`]) that flows through the CSV codec, the import pipeline
//! and form submissions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;

/// Opaque unique identifier of a stored webhook.
///
/// Generated once when a record is created and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WebhookId(String);

impl WebhookId {
    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap an existing identifier, e.g. one read back from storage
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WebhookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for WebhookId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The user-editable fields of a webhook.
///
/// This is the shape exchanged with the CSV codec and handed to
/// [`crate::WebhookStore::insert`]. The secret is optional and represented by
/// an empty string when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookFields {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub secret: String,
}

impl WebhookFields {
    pub fn new(name: impl Into<String>, url: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            secret: secret.into(),
        }
    }
}

/// A row produced by the CSV codec, before validation.
pub type ImportCandidate = WebhookFields;

/// A stored webhook configuration.
///
/// Serialized with camelCase keys so the persisted layout matches the
/// browser extension storage format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRecord {
    pub id: WebhookId,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub secret: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WebhookRecord {
    /// Build a new record from submitted fields, assigning id and timestamps.
    pub fn create(fields: WebhookFields, now: DateTime<Utc>) -> Self {
        Self {
            id: WebhookId::generate(),
            name: fields.name,
            url: fields.url,
            secret: fields.secret,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update and bump `updated_at`.
    ///
    /// `updated_at` never moves before `created_at`, even if the supplied
    /// clock reading does.
    pub fn apply(&mut self, patch: WebhookPatch, now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(url) = patch.url {
            self.url = url;
        }
        if let Some(secret) = patch.secret {
            self.secret = secret;
        }
        self.updated_at = now.max(self.created_at);
    }

    /// Project onto the `{name, url, secret}` fields, dropping id and timestamps.
    pub fn fields(&self) -> WebhookFields {
        WebhookFields {
            name: self.name.clone(),
            url: self.url.clone(),
            secret: self.secret.clone(),
        }
    }
}

/// Partial update of a webhook. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
}

impl WebhookPatch {
    /// Returns true when the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.url.is_none() && self.secret.is_none()
    }

    /// The fields a record would have after this patch is applied.
    pub fn merged_with(&self, current: &WebhookFields) -> WebhookFields {
        WebhookFields {
            name: self.name.clone().unwrap_or_else(|| current.name.clone()),
            url: self.url.clone().unwrap_or_else(|| current.url.clone()),
            secret: self.secret.clone().unwrap_or_else(|| current.secret.clone()),
        }
    }
}

impl From<WebhookFields> for WebhookPatch {
    fn from(fields: WebhookFields) -> Self {
        Self {
            name: Some(fields.name),
            url: Some(fields.url),
            secret: Some(fields.secret),
        }
    }
}
