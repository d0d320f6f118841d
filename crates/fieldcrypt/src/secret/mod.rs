//! Where the Master Secret comes from.
//!
//! [`crate::service::FieldCipher`] asks its [`SecretSource`] for the secret on
//! every call rather than capturing it once, so a changed source is picked up
//! by the next call with no re-initialisation.
//!
//! # Security invariants
//!
//! - [`MasterSecret`] is wiped on drop and never printed, even in `Debug`.
//! - Sources hand out short-lived clones; nothing here logs.

pub mod env;
pub mod store;

pub use env::EnvSecret;
pub use store::SecretStore;

use std::sync::Arc;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// The process-wide secret all field keys are derived from.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct MasterSecret(String);

impl MasterSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// `true` for the empty string. Whitespace counts as content.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the secret bytes for key derivation.
    pub fn expose(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl From<String> for MasterSecret {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for MasterSecret {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl std::fmt::Debug for MasterSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MasterSecret([REDACTED])")
    }
}

/// Supplies the current Master Secret, or `None` if none is configured.
///
/// Implementations must be cheap enough to call once per encrypt/decrypt and
/// must not cache a stale value when the underlying configuration changes.
#[cfg_attr(test, mockall::automock)]
pub trait SecretSource: Send + Sync {
    fn master_secret(&self) -> Option<MasterSecret>;
}

/// A fixed secret, for tooling that already holds the value.
impl SecretSource for MasterSecret {
    fn master_secret(&self) -> Option<MasterSecret> {
        Some(self.clone())
    }
}

impl<T: SecretSource + ?Sized> SecretSource for Arc<T> {
    fn master_secret(&self) -> Option<MasterSecret> {
        (**self).master_secret()
    }
}

impl<T: SecretSource + ?Sized> SecretSource for &T {
    fn master_secret(&self) -> Option<MasterSecret> {
        (**self).master_secret()
    }
}
