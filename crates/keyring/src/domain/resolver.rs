// crates/keyring/src/domain/resolver.rs

use std::fmt;

use tracing::debug;

use super::error::{Errno, KeyringError, KeyringResult};
use super::key_service::KeyService;
use super::types::{KeyHandle, KeyId, KeyringDefaults};

/// A key found in the trust anchor. Holds one reference on the key, which is
/// handed back to the key service when the value is dropped.
#[must_use = "dropping a ResolvedKey releases it immediately"]
pub struct ResolvedKey<'k, K: KeyService + ?Sized> {
    handle: KeyHandle,
    keys: &'k K,
}

impl<'k, K: KeyService + ?Sized> ResolvedKey<'k, K> {
    pub fn handle(&self) -> KeyHandle {
        self.handle
    }

    /// Release the key now rather than at end of scope.
    pub fn release(self) {}
}

impl<K: KeyService + ?Sized> Drop for ResolvedKey<'_, K> {
    fn drop(&mut self) {
        debug!(handle = self.handle.0, "releasing key");
        self.keys.put_key(self.handle);
    }
}

impl<K: KeyService + ?Sized> fmt::Debug for ResolvedKey<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedKey").field("handle", &self.handle).finish()
    }
}

/// Search failures that only mean "this key is not usable here". A raw
/// ENOKEY from the search carries the same code as `NoKey` and is folded in.
fn is_not_found(errno: Errno) -> bool {
    matches!(
        errno,
        Errno::EACCES | Errno::ENOTDIR | Errno::EAGAIN | Errno::ENOKEY
    )
}

/// Find the asymmetric key named by `key_id` in the trust anchor `keyring`.
///
/// Never loads the anchor: an unset anchor (`None`) is reported as
/// [`KeyringError::NoKey`] without touching `keys`.
pub fn request_asymmetric_key<'k, K>(
    keyring: Option<KeyHandle>,
    keys: &'k K,
    key_id: KeyId,
) -> KeyringResult<ResolvedKey<'k, K>>
where
    K: KeyService + ?Sized,
{
    let keyring = keyring.ok_or(KeyringError::NoKey)?;
    let description = key_id.description();

    match keys.search_keyring(
        keyring,
        KeyringDefaults::KEY_TYPE,
        &description,
        KeyringDefaults::PARTIAL_MATCH,
    ) {
        Ok(handle) => Ok(ResolvedKey { handle, keys }),
        Err(errno) if is_not_found(errno) => {
            debug!(key = %description, error = %errno, "key not found in trust anchor");
            Err(KeyringError::NoKey)
        }
        Err(errno) => Err(KeyringError::Lookup(errno)),
    }
}
