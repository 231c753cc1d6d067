//! CLI commands.

mod generate;
mod parse;
mod tamper;

pub use parse::FieldRow;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::output::OutputFormat;

/// orderlyid - Generate and inspect typed, time-sortable IDs.
#[derive(Debug, Parser)]
#[command(name = "orderlyid")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format (table or json).
    #[arg(long, global = true, default_value = "table")]
    format: String,

    /// Emit logs as JSON (logs go to stderr).
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate one or more IDs.
    Generate(generate::GenerateCommand),

    /// Verify and inspect an existing ID.
    Parse(parse::ParseCommand),

    /// Break an ID's last character and show that parsing rejects it.
    Tamper(tamper::TamperCommand),

    /// Show CLI version.
    Version,
}

impl Cli {
    pub fn log_json(&self) -> bool {
        self.log_json
    }

    /// Run the CLI command.
    pub fn run(self, config: Config) -> Result<()> {
        let format = match self.format.as_str() {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Table,
        };

        let ctx = CommandContext { config, format };

        match self.command {
            Commands::Generate(cmd) => cmd.run(ctx),
            Commands::Parse(cmd) => cmd.run(ctx),
            Commands::Tamper(cmd) => cmd.run(ctx),
            Commands::Version => {
                println!("orderlyid {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

/// Shared command context.
pub struct CommandContext {
    pub config: Config,
    pub format: OutputFormat,
}
