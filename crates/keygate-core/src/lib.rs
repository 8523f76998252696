//! ============================================================================
//! KEYGATE-CORE: Access key verification and tier gating
//! ============================================================================
//! This crate handles all logic behind the key-gated dashboard:
//! - Remote key verification via reqwest
//! - Access key persistence (OS keyring or embedded redb)
//! - Tier to feature gating tables
//! - Session state machine with single-flight verification
//! ============================================================================

pub mod access;
pub mod config;
pub mod store;
pub mod types;

// Re-export main types for convenience
pub use access::{AccessGate, AccessTier, Dashboard, QuickAction, SessionState, Verifier};
pub use config::{KeyBackend, KeyGateConfig};
pub use store::{open_stores, KeyStore, LocalStore, Preferences, StoreError, Stores};
pub use types::*;
