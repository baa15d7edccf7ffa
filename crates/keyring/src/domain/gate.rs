use super::error::{KeyringError, KeyringResult};
use super::types::{CertHeader, HASH_ALGO_LAST};

/// Reject headers whose hash algorithm is outside the known set.
pub fn check_hash_algo(header: &CertHeader) -> KeyringResult<()> {
    if header.hash_algo >= HASH_ALGO_LAST {
        return Err(KeyringError::UnsupportedAlgorithm(header.hash_algo));
    }
    Ok(())
}

pub fn is_supported_hash_algo(algo: u8) -> bool {
    algo < HASH_ALGO_LAST
}
