// ============================================================================
// LocalStore - Embedded Database (redb)
// ============================================================================
// Persistent local storage for the access key slot and preference flags.
// Default path: ~/.keygate/keygate.redb (override via KEYGATE_DB_PATH env var)
// ============================================================================

use redb::{Database, TableDefinition};
use std::path::Path;
use tracing::{debug, info};

use super::{KeyStore, Preferences, StoreError, ACCESS_KEY_SLOT};

// Table definitions
const SECRETS: TableDefinition<&str, &str> = TableDefinition::new("secrets");
const PREFS: TableDefinition<&str, bool> = TableDefinition::new("prefs");

fn db_err(context: &str, e: impl std::fmt::Display) -> StoreError {
    StoreError::Database(format!("{}: {}", context, e))
}

/// Embedded database for key and preference storage
pub struct LocalStore {
    db: Database,
}

impl LocalStore {
    /// Open (or create) the database at the given path
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        info!("Opening database at: {}", path.display());

        let db = Database::create(path).map_err(|e| db_err("Failed to open database", e))?;

        // Ensure tables exist so read transactions never hit a missing table
        let write_txn = db
            .begin_write()
            .map_err(|e| db_err("Failed to begin write", e))?;
        {
            write_txn
                .open_table(SECRETS)
                .map_err(|e| db_err("Failed to create secrets table", e))?;
            write_txn
                .open_table(PREFS)
                .map_err(|e| db_err("Failed to create prefs table", e))?;
        }
        write_txn
            .commit()
            .map_err(|e| db_err("Failed to commit init", e))?;

        Ok(Self { db })
    }
}

impl KeyStore for LocalStore {
    fn save(&self, key: &str) -> Result<(), StoreError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| db_err("Failed to begin write", e))?;
        {
            let mut table = write_txn
                .open_table(SECRETS)
                .map_err(|e| db_err("Failed to open secrets table", e))?;
            table
                .insert(ACCESS_KEY_SLOT, key)
                .map_err(|e| db_err("Failed to insert key", e))?;
        }
        write_txn.commit().map_err(|e| db_err("Failed to commit", e))?;

        debug!("Stored access key");
        Ok(())
    }

    fn get(&self) -> Result<Option<String>, StoreError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| db_err("Failed to begin read", e))?;
        let table = read_txn
            .open_table(SECRETS)
            .map_err(|e| db_err("Failed to open secrets table", e))?;

        let value = table
            .get(ACCESS_KEY_SLOT)
            .map_err(|e| db_err("Failed to get key", e))?;
        Ok(value.map(|v| v.value().to_string()))
    }

    fn remove(&self) -> Result<(), StoreError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| db_err("Failed to begin write", e))?;
        let removed;
        {
            let mut table = write_txn
                .open_table(SECRETS)
                .map_err(|e| db_err("Failed to open secrets table", e))?;
            removed = table
                .remove(ACCESS_KEY_SLOT)
                .map_err(|e| db_err("Failed to remove key", e))?
                .is_some();
        }
        write_txn
            .commit()
            .map_err(|e| db_err("Failed to commit delete", e))?;

        if removed {
            debug!("Removed access key");
        }
        Ok(())
    }
}

impl Preferences for LocalStore {
    fn get_flag(&self, name: &str) -> Result<bool, StoreError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| db_err("Failed to begin read", e))?;
        let table = read_txn
            .open_table(PREFS)
            .map_err(|e| db_err("Failed to open prefs table", e))?;

        let value = table
            .get(name)
            .map_err(|e| db_err("Failed to get flag", e))?;
        Ok(value.map(|v| v.value()).unwrap_or(false))
    }

    fn set_flag(&self, name: &str, value: bool) -> Result<(), StoreError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| db_err("Failed to begin write", e))?;
        {
            let mut table = write_txn
                .open_table(PREFS)
                .map_err(|e| db_err("Failed to open prefs table", e))?;
            table
                .insert(name, value)
                .map_err(|e| db_err("Failed to insert flag", e))?;
        }
        write_txn.commit().map_err(|e| db_err("Failed to commit", e))?;

        debug!("Set flag {} = {}", name, value);
        Ok(())
    }
}
