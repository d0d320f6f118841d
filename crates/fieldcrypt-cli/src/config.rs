//! Configuration loading and validation for the `fieldcrypt` tool.
//!
//! Cipher settings (secret variable, KDF cost) come from
//! [`fieldcrypt::Config`]; this struct only holds what the tool adds on top.

use anyhow::{Context, Result};
use serde::Deserialize;

/// Validated tool configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Environment variable holding the secret tokens are being moved *from*
    /// during `rekey`.
    #[serde(default = "default_previous_secret_var")]
    pub previous_secret_var: String,

    /// Tracing log level.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_previous_secret_var() -> String {
    "ENCRYPTION_KEY_PREVIOUS".into()
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from `FIELDCRYPT_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::with_prefix(fieldcrypt::config::ENV_PREFIX))
            .build()
            .context("failed to build fieldcrypt tool configuration")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise fieldcrypt tool configuration")?;

        c.validate()?;
        Ok(c)
    }

    fn validate(&self) -> Result<()> {
        if self.previous_secret_var.trim().is_empty() {
            anyhow::bail!("FIELDCRYPT_PREVIOUS_SECRET_VAR must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        assert_eq!(default_previous_secret_var(), "ENCRYPTION_KEY_PREVIOUS");
        assert_eq!(default_log_level(), "info");
    }

    #[test]
    fn validate_rejects_empty_previous_var() {
        let cfg = Config {
            previous_secret_var: " ".into(),
            log_level: "info".into(),
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_accepts_valid_config() {
        let cfg = Config {
            previous_secret_var: "OLD_KEY".into(),
            log_level: "debug".into(),
        };
        assert!(cfg.validate().is_ok());
    }
}
