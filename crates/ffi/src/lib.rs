#[cfg(feature = "openssl")]
use std::sync::Arc;

use digsig_keyring::domain::types::{CertHeader, Certificate, KeyId};
use digsig_keyring::KeyringError;
#[cfg(feature = "openssl")]
use digsig_keyring::{DigsigVerifier, KeyringConfig, MemoryKeyStore, OpensslVerifier, TrustAnchor};

uniffi::setup_scaffolding!();

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum FfiError {
    /// `code` is the positive errno a kernel caller would have seen.
    #[error("{message}")]
    Keyring { code: i32, message: String },
}

impl From<KeyringError> for FfiError {
    fn from(e: KeyringError) -> Self {
        FfiError::Keyring {
            code: e.errno().code(),
            message: e.to_string(),
        }
    }
}

// ===== FFI types mirroring the public Rust API (FFI-friendly) =====

#[derive(uniffi::Record, Debug, Clone, Copy)]
pub struct FfiCertHeader {
    pub version: u8,
    pub privilege: u8,
    pub hash_algo: u8,
    pub signature_type: u8,
    /// Host-order key identifier.
    pub key_id: u32,
}

impl From<FfiCertHeader> for CertHeader {
    fn from(v: FfiCertHeader) -> Self {
        CertHeader { version: v.version, privilege: v.privilege, hash_algo: v.hash_algo, signature_type: v.signature_type, key_id: KeyId::new(v.key_id) }
    }
}

#[derive(uniffi::Record, Debug, Clone)]
pub struct FfiCertificate {
    pub header: FfiCertHeader,
    pub signature: Vec<u8>,
}

impl From<FfiCertificate> for Certificate {
    fn from(v: FfiCertificate) -> Self {
        Certificate::new(v.header.into(), v.signature)
    }
}

// ===== Helpers for key provisioning tools =====

/// Description a key must be provisioned under to be found for `key_id`.
#[uniffi::export]
pub fn key_description(key_id: u32) -> String {
    digsig_keyring::key_description(key_id)
}

#[uniffi::export]
pub fn is_supported_hash_algo(algo: u8) -> bool {
    digsig_keyring::is_supported_hash_algo(algo)
}

/// Key identifier a certificate header must carry to select `certificate`.
#[cfg(feature = "openssl")]
#[uniffi::export]
pub fn certificate_key_id(certificate: Vec<u8>) -> Result<u32, FfiError> {
    Ok(MemoryKeyStore::certificate_key_id(&certificate)?.0)
}

// ===== In-process trust store =====

/// A trust anchor with its own OpenSSL-backed key store.
#[cfg(feature = "openssl")]
#[derive(uniffi::Object)]
pub struct FfiTrustStore {
    inner: DigsigVerifier<Arc<MemoryKeyStore>, OpensslVerifier>,
}

#[cfg(feature = "openssl")]
#[uniffi::export]
impl FfiTrustStore {
    #[uniffi::constructor]
    pub fn new(keyring_name: Option<String>) -> Result<Arc<Self>, FfiError> {
        let config = keyring_name.map(KeyringConfig::with_keyring_name).unwrap_or_default();
        let store = Arc::new(MemoryKeyStore::new());
        let inner = DigsigVerifier::with_anchor(
            Arc::clone(&store),
            OpensslVerifier::new(store),
            config,
            Arc::new(TrustAnchor::new()),
        )?;
        inner.ensure_loaded()?;
        Ok(Arc::new(Self { inner }))
    }

    /// Add a DER or PEM certificate to the trust anchor.
    pub fn add_certificate(&self, certificate: Vec<u8>) -> Result<(), FfiError> {
        self.inner.load_x509_from_mem(&certificate).map_err(FfiError::from)
    }

    /// Returns the signature check's result code; `0` means a valid signature.
    pub fn verify(&self, cert: FfiCertificate, digest: Vec<u8>) -> Result<i32, FfiError> {
        let cert: Certificate = cert.into();
        self.inner.verify(&cert, &digest, digest.len()).map_err(FfiError::from)
    }
}
