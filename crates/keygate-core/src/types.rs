//! ============================================================================
//! KeyGate Types - Verification wire types and access errors
//! ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::access::AccessTier;
use crate::store::StoreError;

/// Message returned when the verification service cannot be reached
pub const CONNECTION_FAILED_MESSAGE: &str = "Connection failed";

/// Message shown when an invalid result carries no message of its own
pub const INVALID_KEY_FALLBACK_MESSAGE: &str = "Please check your access key";

/// Request body sent to `POST {base}/verify`
#[derive(Debug, Clone, Serialize)]
pub struct VerifyRequest<'a> {
    pub key: &'a str,
}

/// Outcome of a single verification call. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub valid: bool,
    #[serde(default, deserialize_with = "deserialize_tier")]
    pub tier: Option<AccessTier>,
    /// ISO-8601 expiry as sent by the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl VerificationResult {
    /// Negative result carrying a message
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            tier: None,
            expires_at: None,
            features: None,
            message: Some(message.into()),
        }
    }

    /// Negative result for transport and decode failures
    pub fn connection_failed() -> Self {
        Self::failure(CONNECTION_FAILED_MESSAGE)
    }

    /// Parsed expiry, if present and well-formed
    pub fn expiry(&self) -> Option<DateTime<Utc>> {
        self.expires_at
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Message to show the user after a rejected key
    pub fn rejection_message(&self) -> String {
        match self.message.as_deref() {
            Some(msg) if !msg.trim().is_empty() => msg.to_string(),
            _ => INVALID_KEY_FALLBACK_MESSAGE.to_string(),
        }
    }
}

/// Unknown tier strings are treated as absent rather than as a malformed body
fn deserialize_tier<'de, D>(deserializer: D) -> Result<Option<AccessTier>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(AccessTier::parse))
}

/// Mask a key for logs and terminal output
pub fn mask_key(key: &str) -> String {
    let visible: String = key.chars().take(4).collect();
    if key.chars().count() <= 4 {
        "****".to_string()
    } else {
        format!("{}****", visible)
    }
}

/// Errors surfaced by the access session
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    #[error("Please enter your access key")]
    EmptyKey,

    #[error("The age verification disclaimer has not been accepted")]
    AgeGateRequired,

    #[error("A verification is already in progress")]
    VerificationInFlight,

    #[error("Verification was cancelled by a logout")]
    Superseded,

    #[error(transparent)]
    Store(#[from] StoreError),
}
