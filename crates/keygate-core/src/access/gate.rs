//! ============================================================================
//! Access Gate - Key-verified session state machine
//! ============================================================================
//! Drives the app-level flow:
//!
//!   launch  -> Verifying (saved key) | Unauthenticated (no key)
//!   Verifying -> Authenticated(tier) on a valid result
//!   Verifying -> VerificationFailed on an invalid result (key removed)
//!   entry screen + submit -> Verifying
//!   any state + logout -> Unauthenticated (key removed)
//!
//! Only one verification runs at a time. Every verification and every
//! logout advances an epoch; a result that returns under an older epoch
//! is dropped without touching the state or the key store. A verification
//! whose caller stops waiting puts the gate back on the entry screen.
//! ============================================================================

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

use super::dashboard::Dashboard;
use super::types::AccessTier;
use super::verifier::Verifier;
use crate::store::{KeyStore, Preferences, AGE_VERIFIED_FLAG};
use crate::types::{mask_key, AccessError, VerificationResult};

/// App-level session state
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    /// Entry screen, no message
    Unauthenticated,
    /// A verification request is in flight
    Verifying,
    /// Dashboard unlocked for `tier`
    Authenticated {
        tier: AccessTier,
        result: VerificationResult,
    },
    /// Entry screen showing why the last key was rejected
    VerificationFailed { message: String },
}

impl SessionState {
    /// Whether the entry screen is showing (a key may be submitted)
    pub fn is_entry_screen(&self) -> bool {
        matches!(
            self,
            SessionState::Unauthenticated | SessionState::VerificationFailed { .. }
        )
    }

    pub fn tier(&self) -> Option<AccessTier> {
        match self {
            SessionState::Authenticated { tier, .. } => Some(*tier),
            _ => None,
        }
    }

    pub fn failure_message(&self) -> Option<&str> {
        match self {
            SessionState::VerificationFailed { message } => Some(message),
            _ => None,
        }
    }
}

/// Session controller tying the key store to the verifier.
///
/// The state lock is never held across an await or a key store call.
/// Key store writes from verification and logout are serialised by
/// `key_writes` so the epoch check and the write happen as one step.
pub struct AccessGate {
    verifier: Verifier,
    keys: Arc<dyn KeyStore>,
    prefs: Arc<dyn Preferences>,
    state: Mutex<SessionState>,
    epoch: AtomicU64,
    key_writes: tokio::sync::Mutex<()>,
}

/// One verification attempt. Dropping it before it settles (the caller
/// gave up on the future) returns the gate to the entry screen.
struct Attempt<'a> {
    gate: &'a AccessGate,
    ticket: u64,
}

impl Attempt<'_> {
    fn is_current(&self) -> bool {
        self.gate.epoch.load(Ordering::SeqCst) == self.ticket
    }

    /// Apply `next` if this attempt still owns the session
    fn settle(&self, next: SessionState) -> Result<SessionState, AccessError> {
        let mut state = self.gate.lock_state();
        if !self.is_current() {
            return Err(AccessError::Superseded);
        }
        *state = next.clone();
        Ok(next)
    }
}

impl Drop for Attempt<'_> {
    fn drop(&mut self) {
        let mut state = self.gate.lock_state();
        if self.is_current() && matches!(*state, SessionState::Verifying) {
            debug!("Verification abandoned before completing");
            *state = SessionState::Unauthenticated;
        }
    }
}

impl AccessGate {
    pub fn new(verifier: Verifier, keys: Arc<dyn KeyStore>, prefs: Arc<dyn Preferences>) -> Self {
        Self {
            verifier,
            keys,
            prefs,
            state: Mutex::new(SessionState::Unauthenticated),
            epoch: AtomicU64::new(0),
            key_writes: tokio::sync::Mutex::new(()),
        }
    }

    /// App launch (and dashboard reload): verify the saved key, if any.
    ///
    /// A storage read failure is treated as "no key present".
    pub async fn start(&self) -> Result<SessionState, AccessError> {
        let attempt = self.begin()?;

        let key = match self.keys.get() {
            Ok(Some(key)) => key,
            Ok(None) => {
                debug!("No saved access key");
                return attempt.settle(SessionState::Unauthenticated);
            }
            Err(e) => {
                warn!("Failed to read saved key: {} - treating as absent", e);
                return attempt.settle(SessionState::Unauthenticated);
            }
        };

        info!("Verifying saved key {}", mask_key(&key));
        let result = self.verifier.verify(&key).await;
        self.finish(attempt, &key, result, false).await
    }

    /// Submit a key from the entry screen. On success the key is persisted.
    pub async fn submit_key(&self, key: &str) -> Result<SessionState, AccessError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(AccessError::EmptyKey);
        }
        if !self.age_gate_accepted()? {
            return Err(AccessError::AgeGateRequired);
        }

        let attempt = self.begin()?;
        info!("Verifying submitted key {}", mask_key(key));
        let result = self.verifier.verify(key).await;
        self.finish(attempt, key, result, true).await
    }

    /// Remove the key and return to the entry screen. Any in-flight
    /// verification is discarded when it completes.
    pub async fn logout(&self) -> Result<(), AccessError> {
        let _writes = self.key_writes.lock().await;
        {
            let mut state = self.lock_state();
            self.epoch.fetch_add(1, Ordering::SeqCst);
            *state = SessionState::Unauthenticated;
        }
        self.keys.remove()?;
        info!("Logged out, access key removed");
        Ok(())
    }

    /// Current session state
    pub fn state(&self) -> SessionState {
        self.lock_state().clone()
    }

    /// Dashboard view model when authenticated
    pub fn dashboard(&self) -> Option<Dashboard> {
        match &*self.lock_state() {
            SessionState::Authenticated { tier, result } => Some(Dashboard::new(*tier, result)),
            _ => None,
        }
    }

    /// Whether the age-gate disclaimer has been acknowledged
    pub fn age_gate_accepted(&self) -> Result<bool, AccessError> {
        Ok(self.prefs.get_flag(AGE_VERIFIED_FLAG)?)
    }

    /// Record the age-gate acknowledgement. Survives logout.
    pub fn accept_age_gate(&self) -> Result<(), AccessError> {
        self.prefs.set_flag(AGE_VERIFIED_FLAG, true)?;
        info!("Age verification accepted");
        Ok(())
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Enter `Verifying` and take a ticket for this attempt
    fn begin(&self) -> Result<Attempt<'_>, AccessError> {
        let mut state = self.lock_state();
        if matches!(*state, SessionState::Verifying) {
            warn!("Verification already in flight, rejecting new attempt");
            return Err(AccessError::VerificationInFlight);
        }
        *state = SessionState::Verifying;
        let ticket = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(Attempt { gate: self, ticket })
    }

    async fn finish(
        &self,
        attempt: Attempt<'_>,
        key: &str,
        result: VerificationResult,
        persist: bool,
    ) -> Result<SessionState, AccessError> {
        // Logout bumps the epoch under this lock, so the check below holds
        // until the key store write is done
        let _writes = self.key_writes.lock().await;
        if !attempt.is_current() {
            debug!("Discarding stale verification result for {}", mask_key(key));
            return Err(AccessError::Superseded);
        }

        let next = if result.valid {
            let tier = result.tier.unwrap_or_else(|| {
                warn!("Valid key without a recognised tier, granting {}", AccessTier::Free);
                AccessTier::Free
            });
            if persist {
                if let Err(e) = self.keys.save(key) {
                    warn!("Failed to store access key: {}", e);
                    attempt.settle(SessionState::VerificationFailed {
                        message: e.to_string(),
                    })?;
                    return Err(e.into());
                }
            }
            info!("Access granted: {} tier", tier.display_name());
            SessionState::Authenticated { tier, result }
        } else {
            if let Err(e) = self.keys.remove() {
                warn!("Failed to remove rejected key: {}", e);
            }
            let message = result.rejection_message();
            info!("Access denied: {}", message);
            SessionState::VerificationFailed { message }
        };

        attempt.settle(next)
    }
}
