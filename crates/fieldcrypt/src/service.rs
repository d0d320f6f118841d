//! [`FieldCipher`]: the reversible field encryption service.
//!
//! Each call reads the Master Secret from the injected [`SecretSource`],
//! re-derives the key, and runs one CBC operation. The service holds no mutable
//! state, so a single instance can be shared across threads and tasks without
//! locking.

use common::FieldCryptError;
use zeroize::Zeroize;

use crate::config::Config;
use crate::crypto::cipher::{self, CipherError};
use crate::crypto::kdf::{self, DerivedKey, KdfError, KdfParams};
use crate::crypto::token::{CipherToken, TokenError};
use crate::secret::{EnvSecret, MasterSecret, SecretSource};

impl From<TokenError> for FieldCryptError {
    fn from(e: TokenError) -> Self {
        FieldCryptError::MalformedToken(e.reason())
    }
}

impl From<CipherError> for FieldCryptError {
    fn from(e: CipherError) -> Self {
        FieldCryptError::Decryption(e.reason())
    }
}

impl From<KdfError> for FieldCryptError {
    fn from(e: KdfError) -> Self {
        FieldCryptError::Configuration(e.to_string())
    }
}

/// Encrypts and decrypts individual string fields for storage at rest.
#[derive(Debug, Clone)]
pub struct FieldCipher<S> {
    source: S,
    kdf: KdfParams,
}

impl FieldCipher<EnvSecret> {
    /// Build a cipher reading the secret from the variable named in `cfg`.
    ///
    /// # Errors
    ///
    /// Returns [`FieldCryptError::Configuration`] if the KDF values are invalid.
    pub fn from_config(cfg: &Config) -> Result<Self, FieldCryptError> {
        let kdf = KdfParams::new(cfg.kdf_log_n, cfg.kdf_r, cfg.kdf_p)?;
        Ok(Self::with_kdf_params(EnvSecret::new(cfg.secret_var.clone()), kdf))
    }
}

impl<S: SecretSource> FieldCipher<S> {
    /// Create a cipher with the deployed KDF parameters.
    pub fn new(source: S) -> Self {
        Self::with_kdf_params(source, KdfParams::default())
    }

    /// Create a cipher with explicit KDF parameters.
    ///
    /// Tokens are only readable by a cipher using the same parameters.
    pub fn with_kdf_params(source: S, kdf: KdfParams) -> Self {
        Self { source, kdf }
    }

    /// The secret source this cipher reads from.
    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn kdf_params(&self) -> KdfParams {
        self.kdf
    }

    /// Encrypt a UTF-8 string into a `<iv-hex>:<ciphertext-hex>` token.
    ///
    /// Two calls with the same input return different tokens.
    ///
    /// # Errors
    ///
    /// Returns [`FieldCryptError::Configuration`] if no Master Secret is set.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, FieldCryptError> {
        self.encrypt_bytes(plaintext.as_bytes())
    }

    /// Encrypt arbitrary bytes into a token.
    ///
    /// # Errors
    ///
    /// Returns [`FieldCryptError::Configuration`] if no Master Secret is set.
    pub fn encrypt_bytes(&self, plaintext: &[u8]) -> Result<String, FieldCryptError> {
        let secret = self.secret()?;
        let key = self.derive(&secret)?;
        let iv = cipher::generate_iv();
        let ciphertext = cipher::encrypt_cbc(plaintext, &key[..], &iv)?;
        Ok(CipherToken::new(iv, ciphertext).to_string())
    }

    /// Decrypt a token produced by [`FieldCipher::encrypt`].
    ///
    /// # Errors
    ///
    /// - [`FieldCryptError::Configuration`] if no Master Secret is set.
    /// - [`FieldCryptError::MalformedToken`] if `token` is not hex-colon-hex.
    /// - [`FieldCryptError::Decryption`] if the token does not decrypt under the
    ///   current secret, or the result is not UTF-8.
    pub fn decrypt(&self, token: &str) -> Result<String, FieldCryptError> {
        let plaintext = self.decrypt_bytes(token)?;
        String::from_utf8(plaintext).map_err(|e| {
            e.into_bytes().zeroize();
            FieldCryptError::Decryption("plaintext is not valid UTF-8")
        })
    }

    /// Decrypt a token back to raw bytes.
    ///
    /// # Errors
    ///
    /// Same as [`FieldCipher::decrypt`], minus the UTF-8 check.
    ///
    /// # Security
    ///
    /// There is no authentication tag. Under the wrong secret roughly one
    /// token in 256 still has valid padding, and this returns garbage bytes
    /// with `Ok`. Callers holding text must use [`FieldCipher::decrypt`],
    /// whose UTF-8 check rejects those.
    pub fn decrypt_bytes(&self, token: &str) -> Result<Vec<u8>, FieldCryptError> {
        let secret = self.secret()?;
        // Parse before deriving so garbage input does not pay for scrypt.
        let token: CipherToken = token.parse()?;
        let key = self.derive(&secret)?;
        Ok(cipher::decrypt_cbc(&token.ciphertext, &key[..], &token.iv)?)
    }

    fn secret(&self) -> Result<MasterSecret, FieldCryptError> {
        self.source
            .master_secret()
            .filter(|s| !s.is_empty())
            .ok_or_else(FieldCryptError::missing_secret)
    }

    fn derive(&self, secret: &MasterSecret) -> Result<DerivedKey, FieldCryptError> {
        Ok(kdf::derive_key(secret.expose(), &self.kdf)?)
    }
}
