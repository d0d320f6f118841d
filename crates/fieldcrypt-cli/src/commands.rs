//! Subcommands: `encrypt`, `decrypt`, and `rekey`.
//!
//! Each command reads stdin and writes stdout; nothing here touches a database.
//! Operators pipe rows out of storage, through the tool, and back.

use std::io::{BufRead, Read, Write};

use anyhow::{Context, Result};
use common::protocol::{FieldRecord, RekeyOutcome};
use common::FieldCryptError;
use fieldcrypt::{FieldCipher, SecretSource};
use thiserror::Error;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

/// A parsed command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Encrypt,
    Decrypt,
    Rekey,
}

/// Errors in the command line itself.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("missing command")]
    Missing,

    #[error("unknown command: {0}")]
    Unknown(String),

    #[error("unexpected argument: {0}")]
    Unexpected(String),
}

impl Command {
    /// Parse the arguments following the program name.
    pub fn parse(args: &[String]) -> Result<Self, UsageError> {
        let (first, rest) = args.split_first().ok_or(UsageError::Missing)?;
        if let Some(extra) = rest.first() {
            return Err(UsageError::Unexpected(extra.clone()));
        }
        match first.as_str() {
            "encrypt" => Ok(Command::Encrypt),
            "decrypt" => Ok(Command::Decrypt),
            "rekey" => Ok(Command::Rekey),
            other => Err(UsageError::Unknown(other.to_owned())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Encrypt => "encrypt",
            Command::Decrypt => "decrypt",
            Command::Rekey => "rekey",
        }
    }
}

/// Encrypt all of `input` and write the token followed by a newline.
///
/// A single trailing newline (`\n` or `\r\n`) is stripped first so that
/// `echo value | fieldcrypt encrypt` encrypts `value`.
pub fn encrypt<S, R, W>(cipher: &FieldCipher<S>, mut input: R, mut out: W) -> Result<()>
where
    S: SecretSource,
    R: Read,
    W: Write,
{
    let mut buf = Zeroizing::new(String::new());
    input
        .read_to_string(&mut buf)
        .context("failed to read plaintext from stdin")?;
    let plaintext = strip_line_ending(&buf);

    let token = cipher.encrypt(plaintext)?;
    writeln!(out, "{token}").context("failed to write token")?;
    debug!(bytes = plaintext.len(), "encrypted");
    Ok(())
}

/// Decrypt the token in `input` and write the plaintext followed by a newline.
///
/// Surrounding whitespace is ignored; tokens never contain any.
pub fn decrypt<S, R, W>(cipher: &FieldCipher<S>, mut input: R, mut out: W) -> Result<()>
where
    S: SecretSource,
    R: Read,
    W: Write,
{
    let mut buf = String::new();
    input
        .read_to_string(&mut buf)
        .context("failed to read token from stdin")?;

    let plaintext = Zeroizing::new(cipher.decrypt(buf.trim())?);
    writeln!(out, "{}", plaintext.as_str()).context("failed to write plaintext")?;
    debug!(bytes = plaintext.len(), "decrypted");
    Ok(())
}

/// Counts reported at the end of a `rekey` run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RekeySummary {
    pub total: usize,
    pub rekeyed: usize,
    pub failed: usize,
}

/// Move every token in `input` from `previous` to `current`.
///
/// Input and output are newline-delimited JSON ([`FieldRecord`] in,
/// [`RekeyOutcome`] out, in input order). A record that is malformed or does
/// not decrypt under the previous secret is reported in its outcome and the
/// batch continues. Blank lines are skipped.
///
/// # Errors
///
/// Aborts on I/O failure, on a line that is not a JSON field record, and on a
/// configuration error (a missing secret would fail every record the same way).
pub fn rekey<P, C, R, W>(
    previous: &FieldCipher<P>,
    current: &FieldCipher<C>,
    input: R,
    mut out: W,
) -> Result<RekeySummary>
where
    P: SecretSource,
    C: SecretSource,
    R: BufRead,
    W: Write,
{
    let mut summary = RekeySummary::default();

    for (idx, line) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.with_context(|| format!("failed to read line {line_no}"))?;
        if line.trim().is_empty() {
            continue;
        }
        let record: FieldRecord = serde_json::from_str(&line)
            .with_context(|| format!("line {line_no} is not a field record"))?;
        summary.total += 1;

        let outcome = match rekey_one(previous, current, &record.value) {
            Ok(token) => {
                summary.rekeyed += 1;
                RekeyOutcome::ok(record.id, token)
            }
            Err(e @ FieldCryptError::Configuration(_)) => {
                return Err(e).context("cannot re-key: secrets are not configured");
            }
            Err(e) => {
                summary.failed += 1;
                warn!(id = %record.id, code = e.code(), "record not re-keyed");
                RekeyOutcome::failed(record.id, &e)
            }
        };

        serde_json::to_writer(&mut out, &outcome).context("failed to write outcome")?;
        out.write_all(b"\n").context("failed to write outcome")?;
    }

    out.flush().context("failed to flush output")?;
    info!(
        total = summary.total,
        rekeyed = summary.rekeyed,
        failed = summary.failed,
        "rekey finished"
    );
    Ok(summary)
}

// Stored fields are strings: the UTF-8 check in `decrypt` is what rejects
// most wrong-key tokens whose padding happens to validate.
fn rekey_one<P: SecretSource, C: SecretSource>(
    previous: &FieldCipher<P>,
    current: &FieldCipher<C>,
    token: &str,
) -> Result<String, FieldCryptError> {
    let plaintext = Zeroizing::new(previous.decrypt(token)?);
    current.encrypt(&plaintext)
}

fn strip_line_ending(s: &str) -> &str {
    s.strip_suffix("\r\n")
        .or_else(|| s.strip_suffix('\n'))
        .unwrap_or(s)
}
