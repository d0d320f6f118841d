//! `fieldcrypt`: maintenance tool entry point.
//!
//! Startup sequence:
//! 1. Parse the command line.
//! 2. Load and validate [`config::Config`] and [`fieldcrypt::Config`] from
//!    environment variables.
//! 3. Initialise structured JSON logging on stderr.
//! 4. Run the command over stdin/stdout.
//!
//! Exit codes: 0 success, 1 failure, 2 usage error, 3 configuration error.

mod commands;
mod config;
mod telemetry;

use std::io;
use std::process::ExitCode;

use anyhow::Result;
use common::FieldCryptError;
use fieldcrypt::{EnvSecret, FieldCipher};
use tracing::{error, info};

use commands::Command;

const EXIT_USAGE: u8 = 2;
const EXIT_CONFIG: u8 = 3;

fn main() -> ExitCode {
    // -----------------------------------------------------------------------
    // 1. Command line
    // -----------------------------------------------------------------------
    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match Command::parse(&args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("ERROR: {e}");
            usage();
            return ExitCode::from(EXIT_USAGE);
        }
    };

    // -----------------------------------------------------------------------
    // 2. Configuration
    // -----------------------------------------------------------------------
    let (cfg, cipher_cfg) = match config::Config::from_env()
        .and_then(|c| fieldcrypt::Config::from_env().map(|f| (c, f)))
    {
        Ok(v) => v,
        Err(e) => {
            // Telemetry is not yet up; write to stderr directly.
            eprintln!("ERROR: configuration invalid: {e:#}");
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    // -----------------------------------------------------------------------
    // 3. Telemetry
    // -----------------------------------------------------------------------
    if let Err(e) = telemetry::init(&cfg.log_level) {
        eprintln!("ERROR: {e:#}");
        return ExitCode::FAILURE;
    }
    info!(
        version = env!("CARGO_PKG_VERSION"),
        command = command.name(),
        secret_var = %cipher_cfg.secret_var,
        "fieldcrypt starting"
    );

    // -----------------------------------------------------------------------
    // 4. Command
    // -----------------------------------------------------------------------
    match run(command, &cfg, &cipher_cfg) {
        Ok(code) => code,
        Err(e) => {
            let msg = format!("{e:#}");
            error!(command = command.name(), error = %msg, "command failed");
            match e.downcast_ref::<FieldCryptError>() {
                Some(FieldCryptError::Configuration(_)) => ExitCode::from(EXIT_CONFIG),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

fn run(
    command: Command,
    cfg: &config::Config,
    cipher_cfg: &fieldcrypt::Config,
) -> Result<ExitCode> {
    let current = FieldCipher::from_config(cipher_cfg)?;
    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();

    match command {
        Command::Encrypt => commands::encrypt(&current, stdin, stdout)?,
        Command::Decrypt => commands::decrypt(&current, stdin, stdout)?,
        Command::Rekey => {
            if cfg.previous_secret_var == cipher_cfg.secret_var {
                anyhow::bail!(
                    "previous and current secrets are both read from {}",
                    cfg.previous_secret_var
                );
            }
            let previous = FieldCipher::with_kdf_params(
                EnvSecret::new(cfg.previous_secret_var.clone()),
                current.kdf_params(),
            );
            let summary = commands::rekey(&previous, &current, stdin, stdout)?;
            if summary.failed > 0 {
                return Ok(ExitCode::FAILURE);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn usage() {
    eprintln!("usage: fieldcrypt <encrypt|decrypt|rekey>");
    eprintln!();
    eprintln!("  encrypt   read plaintext on stdin, print a token");
    eprintln!("  decrypt   read a token on stdin, print the plaintext");
    eprintln!("  rekey     read JSON lines {{\"id\",\"value\"}} on stdin and re-encrypt each");
    eprintln!("            value from $ENCRYPTION_KEY_PREVIOUS to $ENCRYPTION_KEY");
    eprintln!();
    eprintln!("  FIELDCRYPT_SECRET_VAR / FIELDCRYPT_PREVIOUS_SECRET_VAR rename those variables.");
}
