//! scrypt key derivation from the Master Secret.
//!
//! Parameters default to N = 2^14, r = 8, p = 1 with a 32-byte output, which is
//! what the application has always used. Keys derived with any other
//! parameters will not open existing tokens.

use scrypt::Params;
use thiserror::Error;
use zeroize::Zeroizing;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Salt fed to scrypt for every Master Secret.
///
/// Known weakness: the salt is fixed and public, so two installations sharing a
/// Master Secret share a key. Changing it orphans every stored token; any move
/// to a per-installation salt needs a migration and a new token shape.
pub const KDF_SALT: &[u8] = b"salt";

/// A derived 32-byte key, wiped from memory when dropped.
pub type DerivedKey = Zeroizing<[u8; KEY_LEN]>;

/// Errors produced by key derivation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KdfError {
    /// The cost parameters are outside what scrypt accepts.
    #[error("invalid scrypt parameters (log_n={log_n}, r={r}, p={p})")]
    InvalidParams { log_n: u8, r: u32, p: u32 },
}

/// scrypt cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    log_n: u8,
    r: u32,
    p: u32,
}

impl KdfParams {
    /// log2 of the CPU/memory cost `N`.
    pub const DEFAULT_LOG_N: u8 = 14;
    /// Block size.
    pub const DEFAULT_R: u32 = 8;
    /// Parallelisation.
    pub const DEFAULT_P: u32 = 1;

    /// Build and validate a parameter set.
    ///
    /// # Errors
    ///
    /// Returns [`KdfError::InvalidParams`] if scrypt rejects the combination.
    pub fn new(log_n: u8, r: u32, p: u32) -> Result<Self, KdfError> {
        let params = Self { log_n, r, p };
        params.to_scrypt()?;
        Ok(params)
    }

    pub fn log_n(&self) -> u8 {
        self.log_n
    }

    pub fn r(&self) -> u32 {
        self.r
    }

    pub fn p(&self) -> u32 {
        self.p
    }

    fn to_scrypt(self) -> Result<Params, KdfError> {
        Params::new(self.log_n, self.r, self.p, KEY_LEN).map_err(|_| KdfError::InvalidParams {
            log_n: self.log_n,
            r: self.r,
            p: self.p,
        })
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            log_n: Self::DEFAULT_LOG_N,
            r: Self::DEFAULT_R,
            p: Self::DEFAULT_P,
        }
    }
}

/// Derive the AES key for `secret` under [`KDF_SALT`].
///
/// Deterministic: the same secret and parameters always give the same key.
/// Deliberately slow; callers should not assume it is cheap.
///
/// # Errors
///
/// Returns [`KdfError::InvalidParams`] if `params` were built without
/// validation and scrypt rejects them.
pub fn derive_key(secret: &[u8], params: &KdfParams) -> Result<DerivedKey, KdfError> {
    let scrypt_params = params.to_scrypt()?;
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    // The output length is fixed by `scrypt_params`, so this cannot fail.
    scrypt::scrypt(secret, KDF_SALT, &scrypt_params, &mut key[..]).map_err(|_| {
        KdfError::InvalidParams {
            log_n: params.log_n,
            r: params.r,
            p: params.p,
        }
    })?;
    Ok(key)
}
