use super::cert::HashAlgo;

/// Digest bundle handed to the signature primitive. Built fresh for every
/// verification and never outlives it.
///
/// `digest_size` is what the caller declared and is passed through as-is;
/// the primitive decides whether it is consistent with `digest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SignatureDescriptor<'a> {
    pub digest: &'a [u8],
    pub digest_size: usize,
    pub hash_algo: Option<HashAlgo>,
    pub signature: &'a [u8],
}

impl<'a> SignatureDescriptor<'a> {
    /// Only the digest is filled in; everything else stays zeroed.
    pub fn for_digest(digest: &'a [u8], digest_size: usize) -> Self {
        Self {
            digest,
            digest_size,
            ..Default::default()
        }
    }

    /// The declared portion of the digest, or `None` when the caller
    /// claimed more bytes than it supplied.
    pub fn declared_digest(&self) -> Option<&'a [u8]> {
        self.digest.get(..self.digest_size)
    }
}
