use serde::{Deserialize, Serialize};

use super::key::KeyId;

/// One past the highest hash identifier the verification path understands.
pub const HASH_ALGO_LAST: u8 = 20;

/// Hash identifiers as numbered in a certificate header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum HashAlgo {
    Md4 = 0,
    Md5 = 1,
    Sha1 = 2,
    RipeMd160 = 3,
    Sha256 = 4,
    Sha384 = 5,
    Sha512 = 6,
    Sha224 = 7,
    RipeMd128 = 8,
    RipeMd256 = 9,
    RipeMd320 = 10,
    Wp256 = 11,
    Wp384 = 12,
    Wp512 = 13,
    Tgr128 = 14,
    Tgr160 = 15,
    Tgr192 = 16,
    Sm3_256 = 17,
    Streebog256 = 18,
    Streebog512 = 19,
}

impl HashAlgo {
    const ALL: [HashAlgo; HASH_ALGO_LAST as usize] = [
        HashAlgo::Md4,
        HashAlgo::Md5,
        HashAlgo::Sha1,
        HashAlgo::RipeMd160,
        HashAlgo::Sha256,
        HashAlgo::Sha384,
        HashAlgo::Sha512,
        HashAlgo::Sha224,
        HashAlgo::RipeMd128,
        HashAlgo::RipeMd256,
        HashAlgo::RipeMd320,
        HashAlgo::Wp256,
        HashAlgo::Wp384,
        HashAlgo::Wp512,
        HashAlgo::Tgr128,
        HashAlgo::Tgr160,
        HashAlgo::Tgr192,
        HashAlgo::Sm3_256,
        HashAlgo::Streebog256,
        HashAlgo::Streebog512,
    ];

    pub fn name(self) -> &'static str {
        match self {
            HashAlgo::Md4 => "md4",
            HashAlgo::Md5 => "md5",
            HashAlgo::Sha1 => "sha1",
            HashAlgo::RipeMd160 => "rmd160",
            HashAlgo::Sha256 => "sha256",
            HashAlgo::Sha384 => "sha384",
            HashAlgo::Sha512 => "sha512",
            HashAlgo::Sha224 => "sha224",
            HashAlgo::RipeMd128 => "rmd128",
            HashAlgo::RipeMd256 => "rmd256",
            HashAlgo::RipeMd320 => "rmd320",
            HashAlgo::Wp256 => "wp256",
            HashAlgo::Wp384 => "wp384",
            HashAlgo::Wp512 => "wp512",
            HashAlgo::Tgr128 => "tgr128",
            HashAlgo::Tgr160 => "tgr160",
            HashAlgo::Tgr192 => "tgr192",
            HashAlgo::Sm3_256 => "sm3",
            HashAlgo::Streebog256 => "streebog256",
            HashAlgo::Streebog512 => "streebog512",
        }
    }

    /// Digest length in bytes.
    pub fn digest_size(self) -> usize {
        match self {
            HashAlgo::Md4 | HashAlgo::Md5 | HashAlgo::RipeMd128 | HashAlgo::Tgr128 => 16,
            HashAlgo::Sha1 | HashAlgo::RipeMd160 | HashAlgo::Tgr160 => 20,
            HashAlgo::Tgr192 => 24,
            HashAlgo::Sha224 => 28,
            HashAlgo::Sha256
            | HashAlgo::RipeMd256
            | HashAlgo::Wp256
            | HashAlgo::Sm3_256
            | HashAlgo::Streebog256 => 32,
            HashAlgo::RipeMd320 => 40,
            HashAlgo::Sha384 | HashAlgo::Wp384 => 48,
            HashAlgo::Sha512 | HashAlgo::Wp512 | HashAlgo::Streebog512 => 64,
        }
    }
}

impl TryFrom<u8> for HashAlgo {
    type Error = u8;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        HashAlgo::ALL.get(v as usize).copied().ok_or(v)
    }
}

impl From<HashAlgo> for u8 {
    fn from(v: HashAlgo) -> Self {
        v as u8
    }
}

/// Fixed-size header at the start of a certificate body.
///
/// `hash_algo` stays a raw byte: the header comes from untrusted file
/// metadata and is only interpreted after the algorithm gate accepts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CertHeader {
    pub version: u8,
    pub privilege: u8,
    pub hash_algo: u8,
    pub signature_type: u8,
    pub key_id: KeyId,
}

impl CertHeader {
    pub fn new(hash_algo: HashAlgo, key_id: KeyId) -> Self {
        Self {
            hash_algo: hash_algo.into(),
            key_id,
            ..Default::default()
        }
    }

    /// The declared hash algorithm, if it is one this crate knows.
    pub fn algorithm(&self) -> Option<HashAlgo> {
        HashAlgo::try_from(self.hash_algo).ok()
    }
}

/// Certificate as handed over by the caller once extracted from file
/// metadata. Borrowed read-only for the duration of a verification.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Certificate {
    pub header: CertHeader,
    pub signature: Vec<u8>,
}

impl Certificate {
    pub fn new(header: CertHeader, signature: Vec<u8>) -> Self {
        Self { header, signature }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_known_algorithm_round_trips_through_its_byte() {
        for v in 0..HASH_ALGO_LAST {
            let algo = HashAlgo::try_from(v).unwrap();
            assert_eq!(u8::from(algo), v);
        }
        assert_eq!(HashAlgo::try_from(HASH_ALGO_LAST), Err(HASH_ALGO_LAST));
        assert_eq!(HashAlgo::try_from(u8::MAX), Err(u8::MAX));
    }

    #[test]
    fn digest_sizes() {
        assert_eq!(HashAlgo::Sha1.digest_size(), 20);
        assert_eq!(HashAlgo::Sha256.digest_size(), 32);
        assert_eq!(HashAlgo::Streebog512.digest_size(), 64);
        assert_eq!(HashAlgo::Sha256.name(), "sha256");
    }

    #[test]
    fn header_algorithm_is_none_past_the_sentinel() {
        let mut header = CertHeader::new(HashAlgo::Sha256, KeyId::new(1));
        assert_eq!(header.algorithm(), Some(HashAlgo::Sha256));
        header.hash_algo = HASH_ALGO_LAST;
        assert_eq!(header.algorithm(), None);
    }
}
