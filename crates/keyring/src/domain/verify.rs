// crates/keyring/src/domain/verify.rs

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::anchor::TrustAnchor;
use super::error::{KeyringError, KeyringResult};
use super::gate::check_hash_algo;
use super::key_service::{KeyService, SignatureVerifier};
use super::resolver::{request_asymmetric_key, ResolvedKey};
use super::types::{Certificate, KeyHandle, KeyId, KeyType, KeyringConfig, SignatureDescriptor};

/// Entry point for digest signature verification against the trust anchor.
pub struct DigsigVerifier<K, V> {
    keys: K,
    verifier: V,
    config: KeyringConfig,
    anchor: Arc<TrustAnchor>,
    // Set for the process-wide anchor, which is bound to one service.
    owner: Option<Arc<dyn KeyService>>,
}

impl<S, V> DigsigVerifier<Arc<S>, V>
where
    S: KeyService + 'static,
    V: SignatureVerifier,
{
    /// Verifier bound to the process-wide trust anchor.
    ///
    /// The first verifier that loads the anchor binds it to `keys` and its
    /// keyring name. Verifiers built over any other key service instance, or
    /// configured with another keyring name, are refused by `verify`.
    pub fn new(keys: Arc<S>, verifier: V, config: KeyringConfig) -> KeyringResult<Self> {
        config.validate()?;
        let owner: Arc<dyn KeyService> = keys.clone();
        Ok(Self {
            keys,
            verifier,
            config,
            anchor: TrustAnchor::process(),
            owner: Some(owner),
        })
    }
}

impl<K: KeyService, V: SignatureVerifier> DigsigVerifier<K, V> {
    /// Verifier bound to a caller-owned trust anchor slot. The caller keeps
    /// one slot per key service; the process-wide slot is refused here.
    pub fn with_anchor(
        keys: K,
        verifier: V,
        config: KeyringConfig,
        anchor: Arc<TrustAnchor>,
    ) -> KeyringResult<Self> {
        config.validate()?;
        if anchor.is_process() {
            return Err(KeyringError::InvalidArgument(
                "process-wide trust anchor needs an owning key service",
            ));
        }
        Ok(Self { keys, verifier, config, anchor, owner: None })
    }

    pub fn anchor(&self) -> &TrustAnchor {
        &self.anchor
    }

    pub fn config(&self) -> &KeyringConfig {
        &self.config
    }

    pub fn keys(&self) -> &K {
        &self.keys
    }

    /// Load the trust anchor if this process has not done so yet.
    pub fn ensure_loaded(&self) -> KeyringResult<KeyHandle> {
        let name = &self.config.keyring_name;
        match &self.owner {
            Some(owner) => self.anchor.ensure_loaded_by(owner, name),
            None => self.anchor.ensure_loaded(&self.keys, name),
        }
    }

    /// The anchor handle as this verifier may use it, `None` while unset.
    fn keyring(&self) -> KeyringResult<Option<KeyHandle>> {
        self.anchor
            .handle_for(&self.config.keyring_name, self.owner.as_ref())
    }

    /// Look up `key_id` in the trust anchor without loading it.
    pub fn request_asymmetric_key(&self, key_id: KeyId) -> KeyringResult<ResolvedKey<'_, K>> {
        request_asymmetric_key(self.keyring()?, &self.keys, key_id)
    }

    /// Check that `digest` is signed by the key `cert` names.
    ///
    /// Returns the signature primitive's own result code untouched, so a
    /// non-zero success variant reaches the caller as-is. The trust anchor is
    /// loaded before the header is looked at, so a load failure hides an
    /// invalid algorithm.
    pub fn verify(
        &self,
        cert: &Certificate,
        digest: &[u8],
        digest_len: usize,
    ) -> KeyringResult<i32> {
        self.ensure_loaded()?;

        let header = &cert.header;
        check_hash_algo(header)?;

        let sig = SignatureDescriptor::for_digest(digest, digest_len);

        let key = self.request_asymmetric_key(header.key_id)?;
        let rc = self
            .verifier
            .verify_signature(key.handle(), &sig, cert, header);
        key.release();

        if rc < 0 {
            warn!(key = %header.key_id, rc, "signature rejected");
        } else {
            debug!(key = %header.key_id, rc, "signature verified");
        }
        Ok(rc)
    }

    /// Add an X.509 certificate to the loaded trust anchor.
    pub fn load_x509_from_mem(&self, data: &[u8]) -> KeyringResult<()> {
        let keyring = self
            .keyring()?
            .ok_or(KeyringError::InvalidArgument("trust anchor is not loaded"))?;
        if data.is_empty() {
            return Err(KeyringError::InvalidArgument("empty certificate"));
        }

        let key = self
            .keys
            .add_key(keyring, KeyType::Asymmetric, data)
            .map_err(|errno| {
                warn!(keyring = %self.config.keyring_name, error = %errno, "problem loading X.509 certificate");
                KeyringError::Provision(errno)
            })?;
        info!(keyring = %self.config.keyring_name, handle = key.0, "loaded X.509 certificate");
        self.keys.put_key(key);
        Ok(())
    }

    /// Read a certificate from `source` and add it to the trust anchor.
    pub fn load_x509_from_source(&self, source: &crate::crypto::cert_source::CertSource) -> KeyringResult<()> {
        let data = source.read()?;
        self.load_x509_from_mem(&data)
    }
}
