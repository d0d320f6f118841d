//! [`EnvSecret`]: read the Master Secret from an environment variable.

use super::{MasterSecret, SecretSource};

/// Default variable holding the Master Secret.
pub const DEFAULT_SECRET_VAR: &str = "ENCRYPTION_KEY";

/// Reads the named environment variable on every call.
///
/// An unset variable or one that is not valid UTF-8 reads as "no secret".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvSecret {
    var: String,
}

impl EnvSecret {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    /// Name of the variable this source reads.
    pub fn var(&self) -> &str {
        &self.var
    }
}

impl Default for EnvSecret {
    fn default() -> Self {
        Self::new(DEFAULT_SECRET_VAR)
    }
}

impl SecretSource for EnvSecret {
    fn master_secret(&self) -> Option<MasterSecret> {
        std::env::var(&self.var).ok().map(MasterSecret::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test uses its own variable; tests run in parallel within one process.

    #[test]
    fn default_var_name() {
        assert_eq!(EnvSecret::default().var(), "ENCRYPTION_KEY");
    }

    #[test]
    fn unset_variable_reads_as_none() {
        let src = EnvSecret::new("FIELDCRYPT_TEST_UNSET_SECRET");
        std::env::remove_var(src.var());
        assert!(src.master_secret().is_none());
    }

    #[test]
    fn change_is_seen_by_next_call() {
        let src = EnvSecret::new("FIELDCRYPT_TEST_ROTATING_SECRET");
        std::env::set_var(src.var(), "first");
        assert_eq!(src.master_secret().unwrap().expose(), b"first");
        std::env::set_var(src.var(), "second");
        assert_eq!(src.master_secret().unwrap().expose(), b"second");
        std::env::remove_var(src.var());
        assert!(src.master_secret().is_none());
    }
}
