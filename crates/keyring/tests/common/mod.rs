#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use digsig_keyring as dk;
use dk::domain::key_service::{KeyService, SignatureVerifier};
use dk::{CertHeader, Errno, HashAlgo, KeyHandle, KeyType, SignatureDescriptor, TrustAnchor};
use dk::domain::types::{Certificate, KeyId};

pub const KEY_ID: u32 = 77;
pub const ANCHOR: KeyHandle = KeyHandle(2);
pub const RESOLVED: KeyHandle = KeyHandle(40);
pub const VERIFY_SIGNATURE_RET: i32 = 88;

/// One call made against [`FakeKeyService`], in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    RequestKeyring(String),
    Search {
        keyring: KeyHandle,
        key_type: KeyType,
        description: String,
        partial_match: bool,
    },
    Put(KeyHandle),
    Add {
        keyring: KeyHandle,
        key_type: KeyType,
        payload: Vec<u8>,
    },
}

/// Key service whose answers are scripted and whose calls are recorded.
pub struct FakeKeyService {
    load: Mutex<Result<KeyHandle, Errno>>,
    search: Mutex<Result<KeyHandle, Errno>>,
    add: Mutex<Result<KeyHandle, Errno>>,
    calls: Mutex<Vec<Call>>,
}

impl Default for FakeKeyService {
    fn default() -> Self {
        Self {
            load: Mutex::new(Ok(ANCHOR)),
            search: Mutex::new(Ok(RESOLVED)),
            add: Mutex::new(Ok(KeyHandle(500))),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl FakeKeyService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn load_returns(&self, r: Result<KeyHandle, Errno>) {
        *self.load.lock().unwrap() = r;
    }

    pub fn search_returns(&self, r: Result<KeyHandle, Errno>) {
        *self.search.lock().unwrap() = r;
    }

    pub fn add_returns(&self, r: Result<KeyHandle, Errno>) {
        *self.add.lock().unwrap() = r;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn loads(&self) -> usize {
        self.calls().iter().filter(|c| matches!(c, Call::RequestKeyring(_))).count()
    }

    pub fn searches(&self) -> Vec<Call> {
        self.calls().into_iter().filter(|c| matches!(c, Call::Search { .. })).collect()
    }

    pub fn puts(&self) -> Vec<KeyHandle> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Put(h) => Some(h),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl KeyService for FakeKeyService {
    fn request_keyring(&self, name: &str) -> Result<KeyHandle, Errno> {
        self.record(Call::RequestKeyring(name.to_string()));
        *self.load.lock().unwrap()
    }

    fn search_keyring(
        &self,
        keyring: KeyHandle,
        key_type: KeyType,
        description: &str,
        partial_match: bool,
    ) -> Result<KeyHandle, Errno> {
        self.record(Call::Search {
            keyring,
            key_type,
            description: description.to_string(),
            partial_match,
        });
        *self.search.lock().unwrap()
    }

    fn put_key(&self, key: KeyHandle) {
        self.record(Call::Put(key));
    }

    fn add_key(
        &self,
        keyring: KeyHandle,
        key_type: KeyType,
        payload: &[u8],
    ) -> Result<KeyHandle, Errno> {
        self.record(Call::Add {
            keyring,
            key_type,
            payload: payload.to_vec(),
        });
        *self.add.lock().unwrap()
    }
}

/// Owned copy of what the signature primitive was handed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeenSignature {
    pub key: KeyHandle,
    pub digest: Vec<u8>,
    pub digest_size: usize,
    pub hash_algo: Option<HashAlgo>,
    pub signature: Vec<u8>,
    pub cert: Certificate,
    pub header: CertHeader,
}

/// Signature primitive that returns a fixed code.
pub struct ScriptedVerifier {
    rc: i32,
    seen: Mutex<Vec<SeenSignature>>,
}

impl ScriptedVerifier {
    pub fn returning(rc: i32) -> Arc<Self> {
        Arc::new(Self {
            rc,
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn seen(&self) -> Vec<SeenSignature> {
        self.seen.lock().unwrap().clone()
    }
}

impl SignatureVerifier for ScriptedVerifier {
    fn verify_signature(
        &self,
        key: KeyHandle,
        sig: &SignatureDescriptor<'_>,
        cert: &Certificate,
        header: &CertHeader,
    ) -> i32 {
        self.seen.lock().unwrap().push(SeenSignature {
            key,
            digest: sig.digest.to_vec(),
            digest_size: sig.digest_size,
            hash_algo: sig.hash_algo,
            signature: sig.signature.to_vec(),
            cert: cert.clone(),
            header: *header,
        });
        self.rc
    }
}

pub fn unset_anchor() -> Arc<TrustAnchor> {
    Arc::new(TrustAnchor::new())
}

pub fn loaded_anchor() -> Arc<TrustAnchor> {
    Arc::new(TrustAnchor::preloaded(dk::KeyringDefaults::KEYRING_NAME, ANCHOR))
}

/// Certificate with a valid hash algorithm naming `KEY_ID`.
pub fn cert_for_key(key_id: u32) -> Certificate {
    Certificate::new(
        CertHeader::new(HashAlgo::Sha256, KeyId::new(key_id)),
        b"signature-bytes".to_vec(),
    )
}

pub fn cert_with_algo(hash_algo: u8) -> Certificate {
    let mut cert = cert_for_key(KEY_ID);
    cert.header.hash_algo = hash_algo;
    cert
}

pub fn verifier_with(
    keys: &Arc<FakeKeyService>,
    verifier: &Arc<ScriptedVerifier>,
    anchor: Arc<TrustAnchor>,
) -> dk::DigsigVerifier<Arc<FakeKeyService>, Arc<ScriptedVerifier>> {
    dk::DigsigVerifier::with_anchor(
        Arc::clone(keys),
        Arc::clone(verifier),
        dk::KeyringConfig::secure_default(),
        anchor,
    )
    .expect("default config is valid")
}

/// Generate a self-signed ECDSA certificate; returns (cert DER, PKCS#8 key DER).
pub fn generate_ecdsa_cert(alg: &'static rcgen::SignatureAlgorithm, cn: &str) -> (Vec<u8>, Vec<u8>) {
    let key = rcgen::KeyPair::generate(alg).expect("keypair");
    let mut params = rcgen::CertificateParams::new(vec![cn.to_string()]);
    params.alg = alg;
    params.key_usages = vec![rcgen::KeyUsagePurpose::DigitalSignature];
    params.key_pair = Some(key);
    let cert = rcgen::Certificate::from_params(params).expect("cert");
    let der = cert.serialize_der().expect("cert der");
    let key_der = cert.serialize_private_key_der();
    (der, key_der)
}
