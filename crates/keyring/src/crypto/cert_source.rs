//! Where a trusted X.509 certificate comes from when it is provisioned into
//! the trust anchor. Files for deployed systems, env variables for dev.

use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::domain::error::{KeyringError, KeyringResult};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CertSourceError {
    #[error("Invalid certificate source scheme: expected 'file:' or 'env:'")]
    InvalidScheme,
    #[error("Missing path for 'file:' certificate source")]
    MissingPath,
    #[error("Missing variable name for 'env:' certificate source")]
    MissingEnvVar,
    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),
}

/// Source for one DER or PEM encoded certificate.
/// Format examples:
/// - file:/etc/keys/signing_key.der
/// - env:TRUSTED_CERT_PEM
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CertSource {
    File(PathBuf),
    Env(String),
}

impl FromStr for CertSource {
    type Err = CertSourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (scheme, value) = s.split_once(':').ok_or(CertSourceError::InvalidScheme)?;
        let value = value.trim();

        match scheme {
            "file" if value.is_empty() => Err(CertSourceError::MissingPath),
            "file" => Ok(CertSource::File(PathBuf::from(value))),
            "env" if value.is_empty() => Err(CertSourceError::MissingEnvVar),
            "env" => Ok(CertSource::Env(value.to_string())),
            _ => Err(CertSourceError::InvalidScheme),
        }
    }
}

impl CertSource {
    /// Certificate bytes exactly as stored.
    pub fn read(&self) -> KeyringResult<Vec<u8>> {
        match self {
            CertSource::File(path) => Ok(std::fs::read(path)?),
            CertSource::Env(var) => std::env::var(var)
                .map(String::into_bytes)
                .map_err(|_| {
                    KeyringError::Config(CertSourceError::EnvVarNotFound(var.clone()).to_string())
                }),
        }
    }
}
