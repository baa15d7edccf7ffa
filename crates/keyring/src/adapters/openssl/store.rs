// adapters/openssl/store.rs

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use openssl::error::ErrorStack;
use openssl::pkey::{PKey, Public};
use openssl::x509::X509;
use tracing::debug;

use crate::domain::error::{Errno, KeyringError, KeyringResult};
use crate::domain::key_service::KeyService;
use crate::domain::types::{KeyHandle, KeyId, KeyType};

enum Entry {
  Keyring {
    name: String,
    members: Vec<KeyHandle>,
  },
  Asymmetric {
    id: Vec<u8>,
    public_key: PKey<Public>,
    refs: usize,
  },
}

#[derive(Default)]
struct Inner {
  next: u64,
  by_name: HashMap<String, KeyHandle>,
  entries: HashMap<KeyHandle, Entry>,
}

impl Inner {
  fn allocate(&mut self, entry: Entry) -> KeyHandle {
    self.next += 1;
    let handle = KeyHandle(self.next);
    self.entries.insert(handle, entry);
    handle
  }

  fn members(&self, keyring: KeyHandle) -> Result<&[KeyHandle], Errno> {
    match self.entries.get(&keyring) {
      Some(Entry::Keyring { members, .. }) => Ok(members),
      _ => Err(Errno::ENOTDIR),
    }
  }
}

/// In-process key service holding X.509 public keys in named keyrings.
///
/// Keys are matched the way asymmetric keys are matched by description: a
/// partial `id:<hex>` search hits every key whose identifier ends with that
/// hex string. A key's identifier is its certificate's subject key
/// identifier, or the SHA-1 of its public key when the certificate has none.
#[derive(Default)]
pub struct MemoryKeyStore {
  inner: Mutex<Inner>,
}

impl MemoryKeyStore {
  pub fn new() -> Self {
    Self::default()
  }

  fn lock(&self) -> MutexGuard<'_, Inner> {
    self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
  }

  /// Public key material behind an asymmetric key handle.
  pub fn public_key(&self, key: KeyHandle) -> Option<PKey<Public>> {
    match self.lock().entries.get(&key) {
      Some(Entry::Asymmetric { public_key, .. }) => Some(public_key.clone()),
      _ => None,
    }
  }

  /// Outstanding references handed out by `search_keyring`/`add_key`.
  pub fn references(&self, key: KeyHandle) -> Option<usize> {
    match self.lock().entries.get(&key) {
      Some(Entry::Asymmetric { refs, .. }) => Some(*refs),
      _ => None,
    }
  }

  /// Number of keys linked into `keyring`.
  pub fn key_count(&self, keyring: KeyHandle) -> usize {
    self.lock().members(keyring).map(<[KeyHandle]>::len).unwrap_or(0)
  }

  pub fn keyring_name(&self, keyring: KeyHandle) -> Option<String> {
    match self.lock().entries.get(&keyring) {
      Some(Entry::Keyring { name, .. }) => Some(name.clone()),
      _ => None,
    }
  }

  /// The 32-bit identifier a certificate header must carry to select the
  /// key in `certificate`.
  pub fn certificate_key_id(certificate: &[u8]) -> KeyringResult<KeyId> {
    let cert = parse_certificate(certificate)
      .map_err(|_| KeyringError::InvalidArgument("malformed X.509 certificate"))?;
    let id = key_identifier(&cert)
      .map_err(|_| KeyringError::InvalidArgument("certificate has no usable public key"))?;
    Ok(short_key_id(&id))
  }
}

fn parse_certificate(payload: &[u8]) -> Result<X509, ErrorStack> {
  if payload.starts_with(b"-----BEGIN") {
    X509::from_pem(payload)
  } else {
    X509::from_der(payload)
  }
}

fn key_identifier(cert: &X509) -> Result<Vec<u8>, ErrorStack> {
  if let Some(skid) = cert.subject_key_id() {
    return Ok(skid.as_slice().to_vec());
  }
  let der = cert.public_key()?.public_key_to_der()?;
  Ok(openssl::sha::sha1(&der).to_vec())
}

fn short_key_id(id: &[u8]) -> KeyId {
  let mut tail = [0u8; 4];
  let n = id.len().min(4);
  tail[4 - n..].copy_from_slice(&id[id.len() - n..]);
  KeyId::from_be_bytes(tail)
}

fn id_matches(id: &[u8], description: &str, partial_match: bool) -> bool {
  let Some(query) = description.strip_prefix("id:") else {
    return false;
  };
  let query = query.to_ascii_lowercase();
  // Identifiers shorter than 4 bytes are published zero-padded by `short_key_id`.
  let full = format!("{:0>8}", hex::encode(id));
  if partial_match {
    !query.is_empty() && full.ends_with(&query)
  } else {
    full == query
  }
}

impl KeyService for MemoryKeyStore {
  fn request_keyring(&self, name: &str) -> Result<KeyHandle, Errno> {
    if name.is_empty() {
      return Err(Errno::EINVAL);
    }
    let mut inner = self.lock();
    if let Some(handle) = inner.by_name.get(name) {
      return Ok(*handle);
    }
    let handle = inner.allocate(Entry::Keyring {
      name: name.to_string(),
      members: Vec::new(),
    });
    inner.by_name.insert(name.to_string(), handle);
    debug!(keyring = name, handle = handle.0, "created keyring");
    Ok(handle)
  }

  fn search_keyring(
    &self,
    keyring: KeyHandle,
    key_type: KeyType,
    description: &str,
    partial_match: bool,
  ) -> Result<KeyHandle, Errno> {
    let mut inner = self.lock();
    let members = inner.members(keyring)?;
    if key_type != KeyType::Asymmetric {
      return Err(Errno::EAGAIN);
    }

    let found = members.iter().copied().find(|member| {
      matches!(
        inner.entries.get(member),
        Some(Entry::Asymmetric { id, .. }) if id_matches(id, description, partial_match)
      )
    });

    let Some(handle) = found else {
      return Err(Errno::EAGAIN);
    };
    if let Some(Entry::Asymmetric { refs, .. }) = inner.entries.get_mut(&handle) {
      *refs += 1;
    }
    Ok(handle)
  }

  fn put_key(&self, key: KeyHandle) {
    if let Some(Entry::Asymmetric { refs, .. }) = self.lock().entries.get_mut(&key) {
      *refs = refs.saturating_sub(1);
    }
  }

  fn add_key(
    &self,
    keyring: KeyHandle,
    key_type: KeyType,
    payload: &[u8],
  ) -> Result<KeyHandle, Errno> {
    if key_type != KeyType::Asymmetric {
      return Err(Errno::EINVAL);
    }
    let cert = parse_certificate(payload).map_err(|_| Errno::EBADMSG)?;
    let id = key_identifier(&cert).map_err(|_| Errno::EBADMSG)?;
    let public_key = cert.public_key().map_err(|_| Errno::EBADMSG)?;

    let mut inner = self.lock();
    let duplicate = inner.members(keyring)?.iter().any(|member| {
      matches!(inner.entries.get(member), Some(Entry::Asymmetric { id: existing, .. }) if *existing == id)
    });
    if duplicate {
      return Err(Errno::EEXIST);
    }

    let handle = inner.allocate(Entry::Asymmetric {
      id,
      public_key,
      refs: 1,
    });
    if let Some(Entry::Keyring { members, .. }) = inner.entries.get_mut(&keyring) {
      members.push(handle);
    }
    Ok(handle)
  }
}
