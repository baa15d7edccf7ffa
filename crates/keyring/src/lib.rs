// crates/keyring/src/lib.rs

//! Trusted-key resolution and digest signature verification.
//! Exposes a stable API and re-exports types for consumers (integrity hooks, FFI).

pub mod adapters;
pub mod crypto;
pub mod domain;

use std::sync::Arc;

use domain::error::KeyringResult;
use domain::key_service::{KeyService, SignatureVerifier};

/// Verify `digest` against `cert` using the process-wide trust anchor and the
/// default keyring name. The anchor is bound to the first `keys` instance
/// that loads it; other instances get [`KeyringError::AnchorForeignService`].
pub fn digsig_verify<S, V>(
    keys: Arc<S>,
    verifier: V,
    cert: &Certificate,
    digest: &[u8],
    digest_len: usize,
) -> KeyringResult<i32>
where
    S: KeyService + 'static,
    V: SignatureVerifier,
{
    DigsigVerifier::new(keys, verifier, KeyringConfig::secure_default())?
        .verify(cert, digest, digest_len)
}

/// Description under which the key for `key_id` must be provisioned.
pub fn key_description(key_id: u32) -> String {
    KeyId::new(key_id).description()
}

// Re-exports for convenience
#[cfg(feature = "openssl")]
pub use adapters::openssl::{MemoryKeyStore, OpensslVerifier};
pub use crypto::cert_source::CertSource;
pub use domain::anchor::TrustAnchor;
pub use domain::error::{Errno, KeyringError};
pub use domain::gate::{check_hash_algo, is_supported_hash_algo};
pub use domain::resolver::ResolvedKey;
pub use domain::types::{
    CertHeader, Certificate, HashAlgo, KeyHandle, KeyId, KeyType, KeyringConfig,
    KeyringDefaults, SignatureDescriptor, HASH_ALGO_LAST,
};
pub use domain::verify::DigsigVerifier;
