//! Configuration loading and validation for the field cipher.
//!
//! Values are read from `FIELDCRYPT_*` environment variables. Note that the
//! Master Secret itself is **not** part of this struct: only the *name* of the
//! variable holding it is, and the secret is looked up on every call.

use anyhow::{Context, Result};
use config::builder::DefaultState;
use config::ConfigBuilder;
use serde::Deserialize;

use crate::crypto::KdfParams;
use crate::secret::env::DEFAULT_SECRET_VAR;

/// Prefix for every configuration variable (`FIELDCRYPT_SECRET_VAR`, ...).
pub const ENV_PREFIX: &str = "FIELDCRYPT";

/// Validated field cipher configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Environment variable the Master Secret is read from.
    #[serde(default = "default_secret_var")]
    pub secret_var: String,

    /// scrypt log2(N). Changing any KDF value makes existing tokens unreadable.
    #[serde(default = "default_kdf_log_n")]
    pub kdf_log_n: u8,

    /// scrypt block size `r`.
    #[serde(default = "default_kdf_r")]
    pub kdf_r: u32,

    /// scrypt parallelisation `p`.
    #[serde(default = "default_kdf_p")]
    pub kdf_p: u32,
}

fn default_secret_var() -> String {
    DEFAULT_SECRET_VAR.into()
}
fn default_kdf_log_n() -> u8 {
    KdfParams::DEFAULT_LOG_N
}
fn default_kdf_r() -> u32 {
    KdfParams::DEFAULT_R
}
fn default_kdf_p() -> u32 {
    KdfParams::DEFAULT_P
}

impl Default for Config {
    fn default() -> Self {
        Self {
            secret_var: default_secret_var(),
            kdf_log_n: default_kdf_log_n(),
            kdf_r: default_kdf_r(),
            kdf_p: default_kdf_p(),
        }
    }
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or fails validation.
    pub fn from_env() -> Result<Self> {
        Self::load(
            config::Config::builder().add_source(
                config::Environment::with_prefix(ENV_PREFIX).try_parsing(true),
            ),
        )
    }

    /// Build, deserialise, and validate from an arbitrary source stack.
    pub fn load(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let cfg = builder
            .build()
            .context("failed to build fieldcrypt configuration")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise fieldcrypt configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// The validated scrypt parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if scrypt rejects the configured combination.
    pub fn kdf_params(&self) -> Result<KdfParams> {
        KdfParams::new(self.kdf_log_n, self.kdf_r, self.kdf_p)
            .context("FIELDCRYPT_KDF_* values are not valid scrypt parameters")
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        if self.secret_var.trim().is_empty() {
            anyhow::bail!("FIELDCRYPT_SECRET_VAR must not be empty");
        }
        self.kdf_params()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        assert_eq!(default_secret_var(), "ENCRYPTION_KEY");
        assert_eq!(default_kdf_log_n(), 14);
        assert_eq!(default_kdf_r(), 8);
        assert_eq!(default_kdf_p(), 1);
    }

    #[test]
    fn empty_source_yields_defaults() {
        let cfg = Config::load(config::Config::builder()).unwrap();
        assert_eq!(cfg.secret_var, "ENCRYPTION_KEY");
        assert_eq!(cfg.kdf_params().unwrap(), KdfParams::default());
    }

    #[test]
    fn overrides_are_applied() {
        let builder = config::Config::builder()
            .set_override("secret_var", "LEADS_FIELD_KEY")
            .unwrap()
            .set_override("kdf_log_n", 10)
            .unwrap();
        let cfg = Config::load(builder).unwrap();
        assert_eq!(cfg.secret_var, "LEADS_FIELD_KEY");
        assert_eq!(cfg.kdf_log_n, 10);
    }

    #[test]
    fn validate_rejects_empty_secret_var() {
        let cfg = Config {
            secret_var: "  ".into(),
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_kdf_params() {
        let cfg = Config {
            kdf_p: 0,
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_accepts_defaults() {
        assert!(Config::default().validate().is_ok());
    }
}
