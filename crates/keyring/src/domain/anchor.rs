// crates/keyring/src/domain/anchor.rs

use std::fmt;
use std::sync::{Arc, Mutex};

use once_cell::sync::{Lazy, OnceCell};
use tracing::{debug, warn};

use super::error::{KeyringError, KeyringResult};
use super::key_service::KeyService;
use super::types::KeyHandle;

static PROCESS_ANCHOR: Lazy<Arc<TrustAnchor>> = Lazy::new(|| {
    Arc::new(TrustAnchor {
        process: true,
        ..TrustAnchor::default()
    })
});

/// What the slot was loaded from. A keyring handle only means something to
/// the service that issued it.
struct Binding {
    handle: KeyHandle,
    keyring: String,
    owner: Option<Arc<dyn KeyService>>,
}

impl Binding {
    fn check(&self, name: &str, owner: Option<&Arc<dyn KeyService>>) -> KeyringResult<KeyHandle> {
        if self.keyring != name {
            warn!(bound = %self.keyring, requested = name, "trust anchor holds another keyring");
            return Err(KeyringError::AnchorKeyringMismatch {
                bound: self.keyring.clone(),
                requested: name.to_string(),
            });
        }
        if !same_service(self.owner.as_ref(), owner) {
            warn!(keyring = name, "trust anchor was loaded through another key service");
            return Err(KeyringError::AnchorForeignService);
        }
        Ok(self.handle)
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("handle", &self.handle)
            .field("keyring", &self.keyring)
            .field("owned", &self.owner.is_some())
            .finish()
    }
}

// Compare data pointers only; vtable pointers for one type can differ
// between codegen units.
fn same_service(a: Option<&Arc<dyn KeyService>>, b: Option<&Arc<dyn KeyService>>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ()),
        _ => false,
    }
}

/// Write-once slot for the keyring every verification searches.
///
/// The slot starts unset, is filled by the first successful load and is never
/// cleared or reassigned afterwards. A failed load leaves it unset so the next
/// caller tries again. Loads are serialized, so two racing callers never both
/// load a keyring.
///
/// A loaded slot remembers the keyring name it was loaded under, and for the
/// process-wide slot the key service it was loaded through. Callers asking
/// for another name or presenting another service are refused instead of
/// being handed a handle that is meaningless to them.
#[derive(Debug, Default)]
pub struct TrustAnchor {
    binding: OnceCell<Binding>,
    bootstrap: Mutex<()>,
    process: bool,
}

impl TrustAnchor {
    pub fn new() -> Self {
        Self::default()
    }

    /// A slot that is already set, for hosts that own the keyring themselves.
    pub fn preloaded(keyring: impl Into<String>, handle: KeyHandle) -> Self {
        Self {
            binding: OnceCell::with_value(Binding {
                handle,
                keyring: keyring.into(),
                owner: None,
            }),
            ..Self::default()
        }
    }

    /// The process-wide slot. It can only be loaded through an owning key
    /// service (see [`TrustAnchor::ensure_loaded_by`]).
    pub fn process() -> Arc<TrustAnchor> {
        Arc::clone(&PROCESS_ANCHOR)
    }

    pub fn is_process(&self) -> bool {
        self.process
    }

    /// Loaded handle, unchecked.
    pub fn get(&self) -> Option<KeyHandle> {
        self.binding.get().map(|b| b.handle)
    }

    pub fn keyring_name(&self) -> Option<&str> {
        self.binding.get().map(|b| b.keyring.as_str())
    }

    pub fn is_loaded(&self) -> bool {
        self.binding.get().is_some()
    }

    /// Return the anchor, loading it through `keys` if it is not set yet.
    /// A load failure is returned with the service's own error code.
    pub fn ensure_loaded<K>(&self, keys: &K, name: &str) -> KeyringResult<KeyHandle>
    where
        K: KeyService + ?Sized,
    {
        self.load(keys, name, None)
    }

    /// Like [`TrustAnchor::ensure_loaded`], binding the slot to `owner`.
    /// Once bound, only the same service instance gets the handle back.
    pub fn ensure_loaded_by(
        &self,
        owner: &Arc<dyn KeyService>,
        name: &str,
    ) -> KeyringResult<KeyHandle> {
        self.load(&**owner, name, Some(owner))
    }

    /// The loaded handle for `name` and `owner`, without loading anything.
    /// `Ok(None)` means the slot is still unset.
    pub fn handle_for(
        &self,
        name: &str,
        owner: Option<&Arc<dyn KeyService>>,
    ) -> KeyringResult<Option<KeyHandle>> {
        match self.binding.get() {
            Some(binding) => binding.check(name, owner).map(Some),
            None => Ok(None),
        }
    }

    fn load<K>(
        &self,
        keys: &K,
        name: &str,
        owner: Option<&Arc<dyn KeyService>>,
    ) -> KeyringResult<KeyHandle>
    where
        K: KeyService + ?Sized,
    {
        if let Some(binding) = self.binding.get() {
            return binding.check(name, owner);
        }
        if self.process && owner.is_none() {
            return Err(KeyringError::InvalidArgument(
                "process-wide trust anchor needs an owning key service",
            ));
        }

        // A panicking loader cannot leave the slot half-written.
        let _guard = self
            .bootstrap
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(binding) = self.binding.get() {
            return binding.check(name, owner);
        }

        match keys.request_keyring(name) {
            Ok(handle) => {
                debug!(keyring = name, handle = handle.0, "trust anchor loaded");
                let binding = self.binding.get_or_init(|| Binding {
                    handle,
                    keyring: name.to_string(),
                    owner: owner.cloned(),
                });
                Ok(binding.handle)
            }
            Err(errno) => {
                warn!(keyring = name, error = %errno, "trust anchor load failed");
                Err(KeyringError::Bootstrap(errno))
            }
        }
    }
}
