use serde::{Deserialize, Serialize};

use crate::domain::error::{KeyringError, KeyringResult};
use super::key::KeyType;

/// Centralized defaults for the verification path.
pub struct KeyringDefaults;

impl KeyringDefaults {
    pub const KEYRING_NAME: &'static str = ".five"; // Well-known trust anchor
    pub const KEY_TYPE: KeyType = KeyType::Asymmetric; // Only asymmetric keys verify digests
    pub const PARTIAL_MATCH: bool = true; // Match on `id:` description, not key blob
}

/// Settings that name the trust anchor this process verifies against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyringConfig {
    /// Name passed to the key service when the trust anchor is first loaded.
    pub keyring_name: String,
}

impl Default for KeyringConfig {
    fn default() -> Self {
        Self::secure_default()
    }
}

impl KeyringConfig {
    pub fn secure_default() -> Self {
        Self {
            keyring_name: KeyringDefaults::KEYRING_NAME.to_string(),
        }
    }

    pub fn with_keyring_name(name: impl Into<String>) -> Self {
        Self {
            keyring_name: name.into(),
        }
    }

    pub fn from_json(json: &str) -> KeyringResult<Self> {
        let cfg: KeyringConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> KeyringResult<()> {
        if self.keyring_name.trim().is_empty() {
            return Err(KeyringError::Config("keyring name must not be empty".into()));
        }
        Ok(())
    }
}
