//! Tamper command (checksum demonstration).

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use orderlyid::OrderlyId;

use crate::error::CliError;

use super::CommandContext;

/// Tamper command - replace the last character and confirm parsing fails.
#[derive(Debug, Args)]
pub struct TamperCommand {
    /// The ID to tamper with (normally one carrying a checksum).
    id: String,
}

/// Replaces the last character with `0`, or `1` if it already is `0`.
fn tamper(id: &str) -> Option<String> {
    let mut chars: Vec<char> = id.trim().chars().collect();
    let last = chars.last_mut()?;
    *last = if *last == '0' { '1' } else { '0' };
    Some(chars.into_iter().collect())
}

impl TamperCommand {
    pub fn run(self, _ctx: CommandContext) -> Result<()> {
        let bad = tamper(&self.id).ok_or(CliError::EmptyInput)?;
        println!("{} {}", "Tampered:".bold(), bad);

        match OrderlyId::parse(&bad) {
            Err(e) => {
                println!("{} {}", "Parse error (expected):".green(), e);
                Ok(())
            }
            Ok(_) => Err(CliError::TamperAccepted(bad).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tamper_replaces_last_char() {
        assert_eq!(tamper("order_abc-9xgg").as_deref(), Some("order_abc-9xg0"));
        assert_eq!(tamper("order_abc-9xg0").as_deref(), Some("order_abc-9xg1"));
        assert_eq!(tamper("  \n"), None);
    }

    #[test]
    fn test_tampered_checksum_is_rejected() {
        let bad = tamper("order_00myngy59c0003000dfk59mg3e36j3rr-9xgg").unwrap();
        let err = OrderlyId::parse(&bad).unwrap_err();
        assert!(err.is_checksum_error());
    }
}
