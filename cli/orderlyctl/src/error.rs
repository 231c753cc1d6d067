//! Error handling and display for the CLI.

use colored::Colorize;
use orderlyid::IdError;
use thiserror::Error;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("No ID given.")]
    EmptyInput,

    #[error("Checksum accepted tampered ID {0}")]
    TamperAccepted(String),
}

/// Print an error in a user-friendly format.
pub fn print_error(err: &anyhow::Error) {
    eprintln!("{} {:#}", "Error:".red().bold(), err);

    if let Some(hint) = hint(err) {
        eprintln!("\n{}", format!("Hint: {hint}").yellow());
    }
}

fn hint(err: &anyhow::Error) -> Option<&'static str> {
    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        return match cli_err {
            CliError::TamperAccepted(_) => {
                Some("The input had no checksum. Generate it with --checksum first.")
            }
            CliError::EmptyInput => None,
        };
    }

    let id_err = err.chain().find_map(|e| e.downcast_ref::<IdError>())?;
    match id_err {
        IdError::InvalidPrefix { .. } => {
            Some("Prefixes are 2-31 characters: a lowercase letter, then lowercase letters or digits.")
        }
        IdError::ChecksumMismatch { .. } | IdError::BadChecksumLength { .. } => {
            Some("The ID was likely mistyped. Check the characters against the original.")
        }
        IdError::InvalidSymbol { .. } => Some("Payloads use digits and lowercase letters other than u."),
        IdError::BadPayloadLength { .. } => Some("Payloads are exactly 32 characters."),
        _ => None,
    }
}
