//! OS credential store backend for the access key (keyring crate).

use tracing::debug;

use super::{KeyStore, StoreError, ACCESS_KEY_SLOT};

/// Keyring service name
pub const KEYRING_SERVICE: &str = "keygate";

/// Access key held in the platform keychain / secret service
#[derive(Debug, Clone)]
pub struct KeyringKeyStore {
    service: String,
    user: String,
}

impl Default for KeyringKeyStore {
    fn default() -> Self {
        Self::new(KEYRING_SERVICE, ACCESS_KEY_SLOT)
    }
}

impl KeyringKeyStore {
    pub fn new(service: &str, user: &str) -> Self {
        Self {
            service: service.to_string(),
            user: user.to_string(),
        }
    }

    fn entry(&self) -> Result<keyring::Entry, StoreError> {
        keyring::Entry::new(&self.service, &self.user)
            .map_err(|e| StoreError::Keyring(format!("Keyring error: {}", e)))
    }
}

impl KeyStore for KeyringKeyStore {
    fn save(&self, key: &str) -> Result<(), StoreError> {
        self.entry()?
            .set_password(key)
            .map_err(|e| StoreError::Keyring(format!("Failed to store key: {}", e)))?;
        debug!("Stored access key in keyring");
        Ok(())
    }

    fn get(&self) -> Result<Option<String>, StoreError> {
        match self.entry()?.get_password() {
            Ok(key) => Ok(Some(key)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(StoreError::Keyring(format!("Failed to read key: {}", e))),
        }
    }

    fn remove(&self) -> Result<(), StoreError> {
        match self.entry()?.delete_password() {
            Ok(()) => {
                debug!("Removed access key from keyring");
                Ok(())
            }
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(StoreError::Keyring(format!("Failed to remove key: {}", e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_slot() {
        let store = KeyringKeyStore::default();
        assert_eq!(store.service, KEYRING_SERVICE);
        assert_eq!(store.user, ACCESS_KEY_SLOT);
    }
}
