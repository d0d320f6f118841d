//! Error taxonomy returned by every field encryption operation.

use thiserror::Error;

/// Top-level field encryption error type.
///
/// Callers can tell "not our format" ([`FieldCryptError::MalformedToken`]) from
/// "our format, but it does not decrypt" ([`FieldCryptError::Decryption`]).
/// None of the variants carry plaintext, ciphertext, or key material.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldCryptError {
    /// The Master Secret is missing or empty, or the key-derivation parameters
    /// are unusable. Raised before any cryptographic work is attempted.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The input is not a `<iv-hex>:<ciphertext-hex>` token.
    #[error("malformed token: {0}")]
    MalformedToken(&'static str),

    /// The token is well-formed but could not be decrypted: wrong key,
    /// corrupted ciphertext, or invalid padding.
    #[error("decryption failed: {0}")]
    Decryption(&'static str),
}

impl FieldCryptError {
    /// Error raised when no Master Secret is available at call time.
    pub fn missing_secret() -> Self {
        FieldCryptError::Configuration("encryption key not defined".into())
    }

    /// Short machine-readable code, stable across releases.
    pub fn code(&self) -> &'static str {
        match self {
            FieldCryptError::Configuration(_) => "configuration_error",
            FieldCryptError::MalformedToken(_) => "malformed_token",
            FieldCryptError::Decryption(_) => "decryption_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct() {
        assert_eq!(FieldCryptError::missing_secret().code(), "configuration_error");
        assert_eq!(FieldCryptError::MalformedToken("x").code(), "malformed_token");
        assert_eq!(FieldCryptError::Decryption("x").code(), "decryption_error");
    }

    #[test]
    fn missing_secret_message() {
        let e = FieldCryptError::missing_secret();
        assert!(e.to_string().contains("encryption key not defined"));
    }

    #[test]
    fn display_includes_reason() {
        let e = FieldCryptError::MalformedToken("missing ':' separator");
        assert!(e.to_string().contains("missing ':' separator"));
    }
}
