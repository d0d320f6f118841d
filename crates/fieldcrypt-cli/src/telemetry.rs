//! Telemetry initialisation for the `fieldcrypt` tool.
//!
//! Structured JSON logs go to stderr so stdout carries only command output.
//! Log fields are limited to record ids, counts, and error codes: no
//! plaintext, tokens, or secrets.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Initialise the tracing subscriber at the configured log level.
///
/// `RUST_LOG`, when set, takes precedence.
///
/// # Errors
///
/// Returns an error if the subscriber has already been set.
pub fn init(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise fieldcrypt tracing subscriber: {e}"))
}
