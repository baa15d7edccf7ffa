// crates/keyring/src/domain/key_service.rs

use super::error::Errno;
use super::types::{CertHeader, Certificate, KeyHandle, KeyType, SignatureDescriptor};

/// Key-management primitives the verification path consumes. A kernel
/// keyring, a platform key store, and the in-process OpenSSL store all fit.
///
/// Every `Ok(KeyHandle)` returned by `search_keyring` or `add_key` carries one
/// reference that must be handed back through `put_key` exactly once.
pub trait KeyService: Send + Sync {
    /// Load (or create) the named keyring.
    fn request_keyring(&self, name: &str) -> Result<KeyHandle, Errno>;

    fn search_keyring(
        &self,
        keyring: KeyHandle,
        key_type: KeyType,
        description: &str,
        partial_match: bool,
    ) -> Result<KeyHandle, Errno>;

    fn put_key(&self, key: KeyHandle);

    /// Instantiate `payload` as a key of `key_type` linked into `keyring`.
    fn add_key(
        &self,
        keyring: KeyHandle,
        key_type: KeyType,
        payload: &[u8],
    ) -> Result<KeyHandle, Errno>;
}

/// The signature check itself. The result code is opaque to this crate:
/// zero or positive values are caller-defined successes, negative values
/// are failures defined by the implementation.
pub trait SignatureVerifier: Send + Sync {
    fn verify_signature(
        &self,
        key: KeyHandle,
        sig: &SignatureDescriptor<'_>,
        cert: &Certificate,
        header: &CertHeader,
    ) -> i32;
}

impl<T: KeyService + ?Sized> KeyService for std::sync::Arc<T> {
    fn request_keyring(&self, name: &str) -> Result<KeyHandle, Errno> {
        (**self).request_keyring(name)
    }

    fn search_keyring(
        &self,
        keyring: KeyHandle,
        key_type: KeyType,
        description: &str,
        partial_match: bool,
    ) -> Result<KeyHandle, Errno> {
        (**self).search_keyring(keyring, key_type, description, partial_match)
    }

    fn put_key(&self, key: KeyHandle) {
        (**self).put_key(key)
    }

    fn add_key(
        &self,
        keyring: KeyHandle,
        key_type: KeyType,
        payload: &[u8],
    ) -> Result<KeyHandle, Errno> {
        (**self).add_key(keyring, key_type, payload)
    }
}

impl<T: SignatureVerifier + ?Sized> SignatureVerifier for std::sync::Arc<T> {
    fn verify_signature(
        &self,
        key: KeyHandle,
        sig: &SignatureDescriptor<'_>,
        cert: &Certificate,
        header: &CertHeader,
    ) -> i32 {
        (**self).verify_signature(key, sig, cert, header)
    }
}
