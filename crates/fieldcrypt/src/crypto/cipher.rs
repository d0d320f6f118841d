//! AES-256-CBC with PKCS#7 padding.
//!
//! **No authentication.** CBC gives confidentiality only. A modified token can
//! decrypt to garbage when its padding happens to remain valid; the checks here
//! catch what the padding and lengths can reveal and nothing more.
//!
//! **Do NOT switch this to an AEAD mode in place.** That changes the token
//! shape and strands every stored value. A new mode needs a new token format.

use aes::Aes256;
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::{rngs::OsRng, RngCore};
use thiserror::Error;

use super::kdf::KEY_LEN;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Byte length of a CBC initialisation vector (one AES block).
pub const IV_LEN: usize = 16;

/// AES block size in bytes.
pub const BLOCK_LEN: usize = 16;

/// Errors produced by the cipher layer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CipherError {
    /// The key is the wrong length (must be [`KEY_LEN`] bytes).
    #[error("invalid key length: expected {KEY_LEN} bytes")]
    InvalidKeyLength,

    /// The IV is the wrong length (must be [`IV_LEN`] bytes).
    #[error("invalid IV length: expected {IV_LEN} bytes")]
    InvalidIvLength,

    /// The ciphertext is empty or not a whole number of blocks.
    #[error("ciphertext length is not a positive multiple of {BLOCK_LEN}")]
    InvalidCiphertextLength,

    /// PKCS#7 padding did not validate after decryption.
    #[error("invalid padding")]
    BadPadding,
}

impl CipherError {
    /// Static description for the public error taxonomy.
    pub fn reason(&self) -> &'static str {
        match self {
            CipherError::InvalidKeyLength => "invalid key length",
            CipherError::InvalidIvLength => "invalid IV length",
            CipherError::InvalidCiphertextLength => "invalid ciphertext length",
            CipherError::BadPadding => "invalid padding",
        }
    }
}

/// Draw a fresh IV from the OS CSPRNG.
pub fn generate_iv() -> [u8; IV_LEN] {
    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut iv);
    iv
}

/// Encrypt `plaintext` under `key` and `iv`, padding to the block size.
///
/// The output is always a non-empty multiple of [`BLOCK_LEN`]; an empty
/// plaintext encrypts to one block of padding.
///
/// # Errors
///
/// Returns [`CipherError::InvalidKeyLength`] or [`CipherError::InvalidIvLength`]
/// if the inputs have the wrong size.
pub fn encrypt_cbc(plaintext: &[u8], key: &[u8], iv: &[u8]) -> Result<Vec<u8>, CipherError> {
    check_key_iv(key, iv)?;
    let enc = Aes256CbcEnc::new_from_slices(key, iv).map_err(|_| CipherError::InvalidKeyLength)?;
    Ok(enc.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
}

/// Decrypt `ciphertext` under `key` and `iv` and strip the padding.
///
/// # Errors
///
/// Returns a [`CipherError`] on any size mismatch or if the padding is invalid,
/// which is what a wrong key usually produces.
pub fn decrypt_cbc(ciphertext: &[u8], key: &[u8], iv: &[u8]) -> Result<Vec<u8>, CipherError> {
    check_key_iv(key, iv)?;
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_LEN != 0 {
        return Err(CipherError::InvalidCiphertextLength);
    }
    let dec = Aes256CbcDec::new_from_slices(key, iv).map_err(|_| CipherError::InvalidKeyLength)?;
    dec.decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| CipherError::BadPadding)
}

fn check_key_iv(key: &[u8], iv: &[u8]) -> Result<(), CipherError> {
    if key.len() != KEY_LEN {
        return Err(CipherError::InvalidKeyLength);
    }
    if iv.len() != IV_LEN {
        return Err(CipherError::InvalidIvLength);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn random_key() -> [u8; KEY_LEN] {
        let mut key = [0u8; KEY_LEN];
        OsRng.fill_bytes(&mut key);
        key
    }

    #[test]
    fn encrypt_decrypt_round_trip() {
        let key = random_key();
        let iv = generate_iv();
        let plaintext = b"lead notes: call back Tuesday";
        let ct = encrypt_cbc(plaintext, &key, &iv).unwrap();
        assert_eq!(decrypt_cbc(&ct, &key, &iv).unwrap(), plaintext);
    }

    #[test]
    fn empty_plaintext_is_one_block() {
        let key = random_key();
        let iv = generate_iv();
        let ct = encrypt_cbc(b"", &key, &iv).unwrap();
        assert_eq!(ct.len(), BLOCK_LEN);
        assert!(decrypt_cbc(&ct, &key, &iv).unwrap().is_empty());
    }

    #[test]
    fn full_block_plaintext_gains_padding_block() {
        let key = random_key();
        let iv = generate_iv();
        let ct = encrypt_cbc(&[7u8; BLOCK_LEN], &key, &iv).unwrap();
        assert_eq!(ct.len(), 2 * BLOCK_LEN);
    }

    #[test]
    fn generated_ivs_differ() {
        assert_ne!(generate_iv(), generate_iv());
    }

    #[test]
    fn invalid_key_length_rejected() {
        let iv = generate_iv();
        assert_eq!(
            encrypt_cbc(b"x", &[0u8; 16], &iv),
            Err(CipherError::InvalidKeyLength)
        );
    }

    #[test]
    fn short_iv_rejected() {
        let key = random_key();
        assert_eq!(
            decrypt_cbc(&[0u8; BLOCK_LEN], &key, &[0u8]),
            Err(CipherError::InvalidIvLength)
        );
    }

    #[test]
    fn partial_block_rejected() {
        let key = random_key();
        let iv = generate_iv();
        assert_eq!(
            decrypt_cbc(&[0u8; 5], &key, &iv),
            Err(CipherError::InvalidCiphertextLength)
        );
        assert_eq!(
            decrypt_cbc(&[], &key, &iv),
            Err(CipherError::InvalidCiphertextLength)
        );
    }

    #[test]
    fn corrupted_final_block_fails_padding() {
        let key = random_key();
        let iv = generate_iv();
        // Single block: flipping the IV's last byte flips the last plaintext
        // byte, which is the padding length for a one-block message.
        let ct = encrypt_cbc(b"0123456789abcde", &key, &iv).unwrap();
        let mut bad_iv = iv;
        bad_iv[IV_LEN - 1] ^= 0x10;
        assert_eq!(decrypt_cbc(&ct, &key, &bad_iv), Err(CipherError::BadPadding));
    }
}
