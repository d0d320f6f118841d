//! Reversible encryption for individual fields stored at rest.
//!
//! ```no_run
//! use fieldcrypt::{Config, FieldCipher};
//!
//! # fn main() -> anyhow::Result<()> {
//! let cipher = FieldCipher::from_config(&Config::from_env()?)?;
//! let token = cipher.encrypt("crm-api-token-123")?;
//! assert_eq!(cipher.decrypt(&token)?, "crm-api-token-123");
//! # Ok(())
//! # }
//! ```
//!
//! The core performs no logging, no retries, and no fallback: every failure is
//! returned to the caller as a [`FieldCryptError`].

pub mod config;
pub mod crypto;
pub mod secret;
pub mod service;

pub use common::FieldCryptError;
pub use config::Config;
pub use crypto::KdfParams;
pub use secret::{EnvSecret, MasterSecret, SecretSource, SecretStore};
pub use service::FieldCipher;
