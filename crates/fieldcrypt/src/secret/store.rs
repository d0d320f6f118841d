//! [`SecretStore`]: a Master Secret held in memory and replaceable at runtime.

use std::sync::Arc;

use arc_swap::ArcSwapOption;

use super::{MasterSecret, SecretSource};

/// Shared, lock-free holder for the current Master Secret.
///
/// Backed by [`ArcSwapOption`] so concurrent encrypt/decrypt calls never block
/// and an operator can swap in a new secret, or clear it, atomically. Clones
/// share the same slot.
#[derive(Clone, Debug, Default)]
pub struct SecretStore {
    inner: Arc<ArcSwapOption<MasterSecret>>,
}

impl SecretStore {
    /// Create a new, empty [`SecretStore`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding `secret`.
    pub fn with_secret(secret: impl Into<MasterSecret>) -> Self {
        let store = Self::new();
        store.replace(secret);
        store
    }

    /// Returns `true` if a secret is currently held.
    pub fn is_set(&self) -> bool {
        self.inner.load().is_some()
    }

    /// Store (or replace) the current secret.
    pub fn replace(&self, secret: impl Into<MasterSecret>) {
        self.inner.store(Some(Arc::new(secret.into())));
    }

    /// Drop the current secret; subsequent calls fail with a configuration error.
    pub fn clear(&self) {
        self.inner.store(None);
    }
}

impl SecretSource for SecretStore {
    fn master_secret(&self) -> Option<MasterSecret> {
        self.inner.load_full().map(|s| (*s).clone())
    }
}
