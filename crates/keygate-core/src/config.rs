//! ============================================================================
//! Configuration - Environment-driven settings
//! ============================================================================
//! Variables (all optional):
//! - `KEYGATE_API_BASE`      verification API base URL
//! - `KEYGATE_TIMEOUT_SECS`  request timeout in seconds
//! - `KEYGATE_DB_PATH`       local database file
//! - `KEYGATE_KEY_BACKEND`   `keyring` or `file`
//! ============================================================================

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::access::DEFAULT_TIMEOUT;

/// Default verification API base URL
pub const DEFAULT_API_BASE: &str = "https://likhonsheikh.xyz/api";

pub const ENV_API_BASE: &str = "KEYGATE_API_BASE";
pub const ENV_TIMEOUT_SECS: &str = "KEYGATE_TIMEOUT_SECS";
pub const ENV_DB_PATH: &str = "KEYGATE_DB_PATH";
pub const ENV_KEY_BACKEND: &str = "KEYGATE_KEY_BACKEND";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot determine home directory")]
    NoHomeDir,

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Where the access key is kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum KeyBackend {
    /// OS credential store
    #[default]
    Keyring,
    /// Local redb database
    File,
}

impl FromStr for KeyBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "keyring" => Ok(KeyBackend::Keyring),
            "file" => Ok(KeyBackend::File),
            other => Err(format!("unknown backend '{}' (expected keyring or file)", other)),
        }
    }
}

/// Resolved runtime configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyGateConfig {
    pub api_base: String,
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
    pub db_path: PathBuf,
    pub key_backend: KeyBackend,
}

impl KeyGateConfig {
    /// Load from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_base = get(ENV_API_BASE).unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let timeout = match get(ENV_TIMEOUT_SECS) {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                    name: ENV_TIMEOUT_SECS,
                    reason: e.to_string(),
                })?;
                if secs == 0 {
                    return Err(ConfigError::Invalid {
                        name: ENV_TIMEOUT_SECS,
                        reason: "must be greater than zero".to_string(),
                    });
                }
                Duration::from_secs(secs)
            }
            None => DEFAULT_TIMEOUT,
        };

        let db_path = match get(ENV_DB_PATH) {
            Some(path) => PathBuf::from(path),
            None => default_db_path()?,
        };

        let key_backend = match get(ENV_KEY_BACKEND) {
            Some(raw) => raw.parse::<KeyBackend>().map_err(|reason| ConfigError::Invalid {
                name: ENV_KEY_BACKEND,
                reason,
            })?,
            None => KeyBackend::default(),
        };

        Ok(Self {
            api_base,
            timeout,
            db_path,
            key_backend,
        })
    }
}

/// `~/.keygate/keygate.redb`
pub fn default_db_path() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
    Ok(home.join(".keygate").join("keygate.redb"))
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(d)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = KeyGateConfig::from_lookup(lookup(&[(ENV_DB_PATH, "/tmp/kg.redb")])).unwrap();
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.db_path, PathBuf::from("/tmp/kg.redb"));
        assert_eq!(config.key_backend, KeyBackend::Keyring);
    }

    #[test]
    fn test_overrides() {
        let config = KeyGateConfig::from_lookup(lookup(&[
            (ENV_API_BASE, "http://localhost:8080/api"),
            (ENV_TIMEOUT_SECS, "3"),
            (ENV_DB_PATH, "/tmp/kg.redb"),
            (ENV_KEY_BACKEND, "FILE"),
        ]))
        .unwrap();
        assert_eq!(config.api_base, "http://localhost:8080/api");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.key_backend, KeyBackend::File);
    }

    #[test]
    fn test_invalid_values() {
        let bad_timeout =
            KeyGateConfig::from_lookup(lookup(&[(ENV_DB_PATH, "x"), (ENV_TIMEOUT_SECS, "soon")]));
        assert!(matches!(bad_timeout, Err(ConfigError::Invalid { name: ENV_TIMEOUT_SECS, .. })));

        let zero = KeyGateConfig::from_lookup(lookup(&[(ENV_DB_PATH, "x"), (ENV_TIMEOUT_SECS, "0")]));
        assert!(zero.is_err());

        let bad_backend =
            KeyGateConfig::from_lookup(lookup(&[(ENV_DB_PATH, "x"), (ENV_KEY_BACKEND, "vault")]));
        assert!(matches!(bad_backend, Err(ConfigError::Invalid { name: ENV_KEY_BACKEND, .. })));
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config =
            KeyGateConfig::from_lookup(lookup(&[(ENV_DB_PATH, "x"), (ENV_API_BASE, "  ")])).unwrap();
        assert_eq!(config.api_base, DEFAULT_API_BASE);
    }
}
