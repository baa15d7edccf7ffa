// adapters/openssl/verifier.rs

use std::sync::Arc;

use openssl::error::ErrorStack;
use openssl::md::{Md, MdRef};
use openssl::pkey::{Id, PKeyRef, Public};
use openssl::pkey_ctx::PkeyCtx;
use openssl::rsa::Padding;
use tracing::debug;

use crate::domain::error::Errno;
use crate::domain::key_service::SignatureVerifier;
use crate::domain::types::{CertHeader, Certificate, HashAlgo, KeyHandle, SignatureDescriptor};
use super::store::MemoryKeyStore;

/// Signature primitive backed by OpenSSL, reading key material from a
/// [`MemoryKeyStore`].
///
/// Result codes: `0` when the signature matches, otherwise a negative errno:
/// `ENOKEY` (no key material), `ENOPKG` (hash OpenSSL cannot do),
/// `EBADMSG` (digest length inconsistent), `EKEYREJECTED` (mismatch).
#[derive(Clone)]
pub struct OpensslVerifier {
  store: Arc<MemoryKeyStore>,
}

impl OpensslVerifier {
  pub fn new(store: Arc<MemoryKeyStore>) -> Self {
    Self { store }
  }
}

fn message_digest(algo: HashAlgo) -> Option<&'static MdRef> {
  Some(match algo {
    HashAlgo::Md5 => Md::md5(),
    HashAlgo::Sha1 => Md::sha1(),
    HashAlgo::RipeMd160 => Md::ripemd160(),
    HashAlgo::Sha224 => Md::sha224(),
    HashAlgo::Sha256 => Md::sha256(),
    HashAlgo::Sha384 => Md::sha384(),
    HashAlgo::Sha512 => Md::sha512(),
    _ => return None,
  })
}

fn check(
  key: &PKeyRef<Public>,
  md: &MdRef,
  digest: &[u8],
  signature: &[u8],
) -> Result<bool, ErrorStack> {
  let mut ctx = PkeyCtx::new(key)?;
  ctx.verify_init()?;
  if key.id() == Id::RSA {
    ctx.set_rsa_padding(Padding::PKCS1)?;
  }
  ctx.set_signature_md(md)?;
  ctx.verify(digest, signature)
}

impl SignatureVerifier for OpensslVerifier {
  fn verify_signature(
    &self,
    key: KeyHandle,
    sig: &SignatureDescriptor<'_>,
    cert: &Certificate,
    header: &CertHeader,
  ) -> i32 {
    let Some(public_key) = self.store.public_key(key) else {
      return Errno::ENOKEY.to_negative();
    };
    let Some(algo) = sig.hash_algo.or_else(|| header.algorithm()) else {
      return Errno::ENOPKG.to_negative();
    };
    let Some(md) = message_digest(algo) else {
      return Errno::ENOPKG.to_negative();
    };
    let digest = match sig.declared_digest() {
      Some(d) if d.len() == algo.digest_size() => d,
      _ => return Errno::EBADMSG.to_negative(),
    };
    let signature = if sig.signature.is_empty() {
      cert.signature.as_slice()
    } else {
      sig.signature
    };

    match check(&public_key, md, digest, signature) {
      Ok(true) => 0,
      Ok(false) => Errno::EKEYREJECTED.to_negative(),
      Err(e) => {
        debug!(error = %e, algo = algo.name(), "openssl rejected signature");
        Errno::EKEYREJECTED.to_negative()
      }
    }
  }
}
