//! The `<iv-hex>:<ciphertext-hex>` token codec.
//!
//! Parsing checks the *shape* only: a colon, and lowercase hex with an even
//! number of digits on both sides. Whether the IV is the right length and the
//! ciphertext a whole number of blocks is the cipher layer's call, so `"00:00"`
//! parses here and fails later as a decryption error.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Separator between the IV and ciphertext halves.
pub const SEPARATOR: char = ':';

/// Errors produced while parsing a token string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("missing ':' separator")]
    MissingSeparator,

    #[error("empty IV or ciphertext")]
    EmptyField,

    #[error("not lowercase hex")]
    InvalidHex,

    #[error("odd number of hex digits")]
    OddLength,
}

impl TokenError {
    /// Static description for the public error taxonomy.
    pub fn reason(&self) -> &'static str {
        match self {
            TokenError::MissingSeparator => "missing ':' separator",
            TokenError::EmptyField => "empty IV or ciphertext",
            TokenError::InvalidHex => "not lowercase hex",
            TokenError::OddLength => "odd number of hex digits",
        }
    }
}

/// A parsed ciphertext token.
///
/// The string form is `hex(iv):hex(ciphertext)`, lowercase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CipherToken {
    /// Raw IV bytes. Sixteen for any token this crate produced.
    pub iv: Vec<u8>,
    /// Raw ciphertext bytes, padded to the block size.
    pub ciphertext: Vec<u8>,
}

impl CipherToken {
    pub fn new(iv: impl Into<Vec<u8>>, ciphertext: Vec<u8>) -> Self {
        Self {
            iv: iv.into(),
            ciphertext,
        }
    }
}

impl fmt::Display for CipherToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            hex::encode(&self.iv),
            SEPARATOR,
            hex::encode(&self.ciphertext)
        )
    }
}

impl FromStr for CipherToken {
    type Err = TokenError;

    /// Split on the first colon and hex-decode both halves.
    ///
    /// # Errors
    ///
    /// Returns a [`TokenError`] if `s` is not `<hex>:<hex>` in lowercase.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (iv_hex, ct_hex) = s
            .split_once(SEPARATOR)
            .ok_or(TokenError::MissingSeparator)?;
        Ok(Self {
            iv: decode_lower_hex(iv_hex)?,
            ciphertext: decode_lower_hex(ct_hex)?,
        })
    }
}

fn decode_lower_hex(s: &str) -> Result<Vec<u8>, TokenError> {
    if s.is_empty() {
        return Err(TokenError::EmptyField);
    }
    // `hex` accepts uppercase too; stored tokens never contain it.
    if !s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
        return Err(TokenError::InvalidHex);
    }
    if s.len() % 2 != 0 {
        return Err(TokenError::OddLength);
    }
    hex::decode(s).map_err(|_| TokenError::InvalidHex)
}
