//! ============================================================================
//! Access Module - Key-gated access control
//! ============================================================================
//! Verifies an access key against the remote service and maps the
//! returned tier to the features it unlocks.
//!
//! ## Tiers
//! - **Free**: wallet tracking, daily limit, community support
//! - **Pro**: unlimited transfers and analytics
//! - **Enterprise**: everything, including priority support and API access
//!
//! ## Usage
//! ```rust,ignore
//! use keygate_core::access::{AccessGate, Verifier};
//!
//! let gate = AccessGate::new(verifier, stores.keys, stores.prefs);
//! let state = gate.start().await?;
//! ```
//! ============================================================================

mod dashboard;
mod gate;
mod types;
mod verifier;

// Re-export public types
pub use dashboard::{ActionStatus, Dashboard};
pub use gate::{AccessGate, SessionState};
pub use types::{AccessTier, QuickAction, TierProfile};
pub use verifier::{Verifier, VerifyError, DEFAULT_TIMEOUT};
