use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque reference to a key or keyring owned by a [`KeyService`].
///
/// [`KeyService`]: crate::domain::key_service::KeyService
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyHandle(pub u64);

/// Key types the verification path asks a key service for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyType {
    Asymmetric,
    Keyring,
}

impl KeyType {
    pub fn name(self) -> &'static str {
        match self {
            KeyType::Asymmetric => "asymmetric",
            KeyType::Keyring => "keyring",
        }
    }
}

/// 32-bit key identifier carried in a certificate header, held in host order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyId(pub u32);

impl KeyId {
    pub fn new(id: u32) -> Self {
        KeyId(id)
    }

    /// Decode the identifier as it is stored in a certificate header.
    pub fn from_be_bytes(bytes: [u8; 4]) -> Self {
        KeyId(u32::from_be_bytes(bytes))
    }

    /// Reinterpret a value that was loaded from memory without byte swapping.
    pub fn from_be(raw: u32) -> Self {
        KeyId(u32::from_be(raw))
    }

    pub fn to_be_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    /// Search string used to find the key in a trust anchor, `id:` followed
    /// by eight lowercase hex digits. Key provisioning tools rely on it.
    pub fn description(self) -> String {
        format!("id:{:08x}", self.0)
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "id:{:08x}", self.0)
    }
}

impl From<u32> for KeyId {
    fn from(v: u32) -> Self {
        KeyId(v)
    }
}
