//! ============================================================================
//! Verifier - Remote access key verification
//! ============================================================================
//! Posts the key to `{base}/verify` and maps the response to a
//! `VerificationResult`. Transport and decode failures never reach the
//! caller; they become a negative result.
//! ============================================================================

use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::types::{mask_key, VerificationResult, VerifyRequest};

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed verification response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Client for the verification endpoint
#[derive(Debug, Clone)]
pub struct Verifier {
    client: Client,
    base_url: String,
}

impl Verifier {
    /// Create a verifier for the given API base URL
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, VerifyError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Verify a key. Always returns a well-formed result.
    pub async fn verify(&self, key: &str) -> VerificationResult {
        match self.try_verify(key).await {
            Ok(result) => {
                info!(
                    "Verification for {}: valid={} tier={:?}",
                    mask_key(key),
                    result.valid,
                    result.tier
                );
                result
            }
            Err(e) => {
                warn!("Verification request failed: {}", e);
                VerificationResult::connection_failed()
            }
        }
    }

    async fn try_verify(&self, key: &str) -> Result<VerificationResult, VerifyError> {
        debug!("POST {}", self.endpoint());

        let response = self
            .client
            .post(self.endpoint())
            .header("Content-Type", "application/json")
            .json(&VerifyRequest { key })
            .send()
            .await?;

        // The server reports rejected keys in the body, sometimes with a non-2xx status
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            debug!("Verification endpoint returned {}", status);
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// Full verification endpoint URL
    pub fn endpoint(&self) -> String {
        format!("{}/verify", self.base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
