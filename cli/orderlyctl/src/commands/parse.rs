//! Parse command (verify and inspect an ID).

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use orderlyid::OrderlyId;

use crate::output::{print_fields, print_single, OutputFormat};

use super::CommandContext;

/// Parse command - verify an ID (including its checksum) and print its fields.
#[derive(Debug, Args)]
pub struct ParseCommand {
    /// The ID to inspect.
    id: String,
}

#[derive(Debug, Serialize)]
struct ParsedView {
    id: String,
    prefix: String,
    time_ms: u64,
    time: String,
    flags: String,
    version: u8,
    privacy_bucketed: bool,
    tenant: u16,
    seq: u16,
    shard: u16,
    random60: String,
}

impl ParsedView {
    fn new(input: &str, id: &OrderlyId) -> Self {
        Self {
            id: input.trim().to_string(),
            prefix: id.prefix().to_string(),
            time_ms: id.time_ms(),
            time: id
                .created_at()
                .to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            flags: id.flags().to_string(),
            version: id.flags().version(),
            privacy_bucketed: id.flags().is_privacy_bucketed(),
            tenant: id.tenant(),
            seq: id.seq(),
            shard: id.shard(),
            random60: format!("0x{:016x}", id.random()),
        }
    }

    fn rows(&self) -> Vec<FieldRow> {
        let row = |field: &'static str, value: String| FieldRow { field, value };
        vec![
            row("id", self.id.clone()),
            row("prefix", self.prefix.clone()),
            row("time (ms)", self.time_ms.to_string()),
            row("time (iso)", self.time.clone()),
            row("flags", self.flags.clone()),
            row("tenant", self.tenant.to_string()),
            row("seq", self.seq.to_string()),
            row("shard", self.shard.to_string()),
            row("random60", self.random60.clone()),
        ]
    }
}

#[derive(Debug, Tabled)]
pub struct FieldRow {
    #[tabled(rename = "Field")]
    pub field: &'static str,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl ParseCommand {
    pub fn run(self, ctx: CommandContext) -> Result<()> {
        let id = OrderlyId::parse(&self.id)?;
        let view = ParsedView::new(&self.id, &id);

        match ctx.format {
            OutputFormat::Table => print_fields(&view.rows()),
            OutputFormat::Json => print_single(&view),
        }
        Ok(())
    }
}
