//! AES-256-CBC field encryption primitives.
//!
//! This module is free of configuration and secret-source concerns. It provides
//! key derivation, the token codec, and the raw cipher operations used by
//! [`crate::service::FieldCipher`].
//!
//! # Ciphertext format
//!
//! ```text
//! <hex(iv)>:<hex(ciphertext)>
//! ```
//!
//! Both halves are lowercase hex. The IV is 16 bytes, so a well-formed token
//! always starts with 32 hex characters followed by `:`. There is no version
//! prefix and no authentication tag; tokens written by earlier deployments use
//! this exact shape and must keep decrypting.

pub mod cipher;
pub mod kdf;
pub mod token;

pub use cipher::{BLOCK_LEN, IV_LEN};
pub use kdf::{DerivedKey, KdfParams, KDF_SALT, KEY_LEN};
pub use token::CipherToken;
