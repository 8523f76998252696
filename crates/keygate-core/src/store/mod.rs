//! ============================================================================
//! Store Module - Local persistence for the access key and preferences
//! ============================================================================
//! The key store holds at most one credential. The tier is never stored;
//! it is always re-derived through the verifier.
//!
//! Backends:
//! - **KeyringKeyStore**: OS credential store (keychain / secret service)
//! - **LocalStore**: embedded redb database, also holds preference flags
//! ============================================================================

mod local;
mod secure;

pub use local::LocalStore;
pub use secure::KeyringKeyStore;

use std::sync::Arc;
use tracing::info;

use crate::config::{KeyBackend, KeyGateConfig};

/// Slot name for the persisted access key
pub const ACCESS_KEY_SLOT: &str = "access_key";

/// Preference flag recording the age-gate acknowledgement
pub const AGE_VERIFIED_FLAG: &str = "age_verified";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Secure storage error: {0}")]
    Keyring(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Durable storage for a single access key
pub trait KeyStore: Send + Sync {
    /// Persist the key, overwriting any prior value
    fn save(&self, key: &str) -> Result<(), StoreError>;

    /// The persisted key, or `None` if never saved or removed
    fn get(&self) -> Result<Option<String>, StoreError>;

    /// Delete the persisted key. Removing an absent key is not an error.
    fn remove(&self) -> Result<(), StoreError>;
}

/// Boolean preference flags kept independently of the key
pub trait Preferences: Send + Sync {
    fn get_flag(&self, name: &str) -> Result<bool, StoreError>;

    fn set_flag(&self, name: &str, value: bool) -> Result<(), StoreError>;
}

/// Storage handles opened from configuration
pub struct Stores {
    pub keys: Arc<dyn KeyStore>,
    pub prefs: Arc<dyn Preferences>,
}

/// Open the configured key backend plus the local preference database
pub fn open_stores(config: &KeyGateConfig) -> Result<Stores, StoreError> {
    let local = Arc::new(LocalStore::open(&config.db_path)?);

    let keys: Arc<dyn KeyStore> = match config.key_backend {
        KeyBackend::Keyring => {
            info!("Using OS keyring for the access key");
            Arc::new(KeyringKeyStore::default())
        }
        KeyBackend::File => {
            info!("Using local database for the access key");
            local.clone()
        }
    };

    Ok(Stores { keys, prefs: local })
}
