//! CLI configuration.
//!
//! Generation defaults come from the environment; command-line flags
//! override them.

use anyhow::{Context, Result};
use orderlyid::Options;

/// CLI configuration (env-driven).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Default generation options.
    pub options: Options,

    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            options: Options::new(),
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let tenant: u16 = lookup("ORDERLYID_TENANT")
            .map(|v| v.parse())
            .transpose()
            .context("ORDERLYID_TENANT must be an integer in 0..=65535.")?
            .unwrap_or(0);

        let shard: u16 = lookup("ORDERLYID_SHARD")
            .map(|v| v.parse())
            .transpose()
            .context("ORDERLYID_SHARD must be an integer in 0..=65535.")?
            .unwrap_or(0);

        let checksum = lookup("ORDERLYID_CHECKSUM")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(false);

        let bucket_seconds: u32 = lookup("ORDERLYID_BUCKET_SECONDS")
            .map(|v| v.parse())
            .transpose()
            .context("ORDERLYID_BUCKET_SECONDS must be an integer (seconds).")?
            .unwrap_or(0);

        let log_level = lookup("ORDERLYID_LOG_LEVEL").unwrap_or_else(|| "warn".to_string());

        Ok(Self {
            options: Options {
                tenant,
                shard,
                checksum,
                bucket_seconds,
            },
            log_level,
        })
    }
}
