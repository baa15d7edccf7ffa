// crates/keyring/src/domain/error.rs
use std::fmt;

use thiserror::Error;

/// Positive OS-style error number as reported by the key-management and
/// signature primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Errno(pub i32);

impl Errno {
    pub const ENOENT: Errno = Errno(2);
    pub const EAGAIN: Errno = Errno(11);
    pub const ENOMEM: Errno = Errno(12);
    pub const EACCES: Errno = Errno(13);
    pub const EEXIST: Errno = Errno(17);
    pub const ENOTDIR: Errno = Errno(20);
    pub const EINVAL: Errno = Errno(22);
    pub const ENOPKG: Errno = Errno(65);
    pub const EBADMSG: Errno = Errno(74);
    pub const ENOKEY: Errno = Errno(126);
    pub const EKEYREJECTED: Errno = Errno(129);

    /// Accepts either sign convention (`-EACCES` or `EACCES`).
    pub fn from_raw(code: i32) -> Self {
        Errno(code.saturating_abs())
    }

    pub fn code(self) -> i32 {
        self.0
    }

    /// Kernel-style negative return value.
    pub fn to_negative(self) -> i32 {
        self.0.wrapping_neg()
    }

    pub fn name(self) -> Option<&'static str> {
        Some(match self {
            Errno::ENOENT => "ENOENT",
            Errno::EAGAIN => "EAGAIN",
            Errno::ENOMEM => "ENOMEM",
            Errno::EACCES => "EACCES",
            Errno::EEXIST => "EEXIST",
            Errno::ENOTDIR => "ENOTDIR",
            Errno::EINVAL => "EINVAL",
            Errno::ENOPKG => "ENOPKG",
            Errno::EBADMSG => "EBADMSG",
            Errno::ENOKEY => "ENOKEY",
            Errno::EKEYREJECTED => "EKEYREJECTED",
            _ => return None,
        })
    }
}

impl fmt::Display for Errno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name} ({})", self.0),
            None => write!(f, "errno {}", self.0),
        }
    }
}

#[derive(Debug, Error)]
pub enum KeyringError {
    /// Key could not be found or used. Also covers the access-denied,
    /// not-a-directory and try-again search failures.
    #[error("required key not available")]
    NoKey,

    #[error("unsupported hash algorithm: {0}")]
    UnsupportedAlgorithm(u8),

    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("trust anchor load failed: {0}")]
    Bootstrap(Errno),

    #[error("trust anchor holds keyring '{bound}', not '{requested}'")]
    AnchorKeyringMismatch { bound: String, requested: String },

    #[error("trust anchor was loaded through a different key service")]
    AnchorForeignService,

    #[error("key lookup failed: {0}")]
    Lookup(Errno),

    #[error("key provisioning failed: {0}")]
    Provision(Errno),

    #[error("configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl KeyringError {
    /// The OS-style code a kernel caller would have seen for this failure.
    pub fn errno(&self) -> Errno {
        match self {
            KeyringError::NoKey => Errno::ENOKEY,
            KeyringError::UnsupportedAlgorithm(_) => Errno::ENOPKG,
            KeyringError::InvalidArgument(_)
            | KeyringError::AnchorKeyringMismatch { .. }
            | KeyringError::AnchorForeignService
            | KeyringError::Config(_)
            | KeyringError::Json(_) => Errno::EINVAL,
            KeyringError::Bootstrap(e) | KeyringError::Lookup(e) | KeyringError::Provision(e) => *e,
            KeyringError::Io(e) => e.raw_os_error().map(Errno).unwrap_or(Errno::ENOENT),
        }
    }
}

pub type KeyringResult<T> = Result<T, KeyringError>;
