//! Field validators for webhook configurations.
//!
//! The URL check and the secret policy are exposed as plain predicates and
//! bundled behind the [`WebhookValidator`] trait so the composition root can
//! plug in a different policy without touching the import pipeline.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::ValidationError;
use crate::record::WebhookFields;

#[cfg(test)]
#[path = "validation_tests.rs"]
mod tests;

/// Returns true only for parsable URLs with an `http` or `https` scheme.
pub fn is_valid_url(candidate: &str) -> bool {
    match Url::parse(candidate) {
        Ok(url) => matches!(url.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// Policy deciding which non-empty secrets are acceptable.
///
/// # Examples
///
/// ```
/// use hookshelf_core::SecretPolicy;
///
/// assert!(SecretPolicy::AcceptAll.is_acceptable("x"));
/// assert!(!SecretPolicy::strong().is_acceptable("short1!"));
/// assert!(SecretPolicy::strong().is_acceptable("long-enough-1"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum SecretPolicy {
    /// Any secret is accepted.
    #[default]
    AcceptAll,

    /// Secrets must meet a minimum length and character-class requirements.
    Strong {
        min_length: usize,
        require_digit: bool,
        require_special: bool,
    },
}

impl SecretPolicy {
    /// The strict policy: at least 10 characters with a digit and a special character.
    pub fn strong() -> Self {
        Self::Strong {
            min_length: 10,
            require_digit: true,
            require_special: true,
        }
    }

    /// Check a secret against the policy. Empty secrets are always acceptable
    /// because the secret is optional.
    pub fn is_acceptable(&self, secret: &str) -> bool {
        if secret.is_empty() {
            return true;
        }

        match self {
            Self::AcceptAll => true,
            Self::Strong {
                min_length,
                require_digit,
                require_special,
            } => {
                secret.chars().count() >= *min_length
                    && (!require_digit || secret.chars().any(|c| c.is_ascii_digit()))
                    && (!require_special
                        || secret
                            .chars()
                            .any(|c| !c.is_alphanumeric() && !c.is_whitespace()))
            }
        }
    }
}

/// Pluggable predicates applied to a webhook before it is persisted.
pub trait WebhookValidator: Send + Sync {
    fn is_valid_url(&self, url: &str) -> bool;

    fn is_acceptable_secret(&self, secret: &str) -> bool;
}

/// Validator using [`is_valid_url`] and a configurable [`SecretPolicy`].
#[derive(Debug, Clone, Default)]
pub struct DefaultValidator {
    secret_policy: SecretPolicy,
}

impl DefaultValidator {
    pub fn new(secret_policy: SecretPolicy) -> Self {
        Self { secret_policy }
    }

    pub fn secret_policy(&self) -> &SecretPolicy {
        &self.secret_policy
    }
}

impl WebhookValidator for DefaultValidator {
    fn is_valid_url(&self, url: &str) -> bool {
        is_valid_url(url)
    }

    fn is_acceptable_secret(&self, secret: &str) -> bool {
        self.secret_policy.is_acceptable(secret)
    }
}

/// Validate a complete set of webhook fields.
///
/// # Errors
///
/// - [`ValidationError::EmptyField`] when `name` or `url` is blank
/// - [`ValidationError::InvalidUrl`] when the URL is not http(s)
/// - [`ValidationError::UnacceptableSecret`] when a non-empty secret fails the policy
pub fn validate_fields(
    fields: &WebhookFields,
    validator: &dyn WebhookValidator,
) -> Result<(), ValidationError> {
    if fields.name.trim().is_empty() {
        return Err(ValidationError::empty_field("name"));
    }

    if fields.url.trim().is_empty() {
        return Err(ValidationError::empty_field("url"));
    }

    if !validator.is_valid_url(&fields.url) {
        return Err(ValidationError::invalid_url(fields.url.as_str()));
    }

    if !fields.secret.is_empty() && !validator.is_acceptable_secret(&fields.secret) {
        return Err(ValidationError::UnacceptableSecret);
    }

    Ok(())
}
