//! Conformance runner: checks every vector in a vectors file against the
//! library, or rewrites the golden IDs from their fields.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use orderlyid::conformance::{self, Outcome, Summary, VectorFile};

#[derive(Debug, Parser)]
#[command(name = "orderlyid-conformance")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the vectors file.
    #[arg(long, default_value = "spec/test-vectors.json")]
    vectors: PathBuf,

    /// Print passing checks too.
    #[arg(short, long)]
    verbose: bool,

    /// Stop on the first failure.
    #[arg(long)]
    fail_fast: bool,

    /// Rewrite golden IDs from the vector fields instead of checking.
    #[arg(long)]
    regenerate: bool,
}

fn read_vectors(path: &Path) -> Result<VectorFile> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let file: VectorFile = serde_json::from_str(&contents)
        .with_context(|| format!("invalid vectors JSON: {}", path.display()))?;
    if file.vectors.is_empty() {
        return Err(anyhow!("no vectors found in {}", path.display()));
    }
    Ok(file)
}

fn ok(message: &str) {
    println!("{} {}", "✓".green(), message);
}

fn fail(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

fn run_checks(file: &VectorFile, verbose: bool, fail_fast: bool) -> Summary {
    let mut summary = Summary::default();

    for (i, vector) in file.vectors.iter().enumerate() {
        let label = format!("[{i:02}] {}", vector.desc);
        let report = conformance::check(vector);
        summary.record(&report);

        match &report.encode {
            Some(Outcome::Fail(reason)) => fail(&format!("{label} {reason}")),
            Some(_) if verbose => ok(&format!("{label} encode ok")),
            _ => {}
        }
        match &report.parse {
            Outcome::Fail(reason) => fail(&format!("{label} {reason}")),
            Outcome::ExpectedFailure(e) if verbose => {
                ok(&format!("{label} parse correctly failed: {e}"))
            }
            Outcome::Pass if verbose => ok(&format!("{label} parse ok")),
            _ => {}
        }

        if fail_fast && !report.is_ok() {
            break;
        }
    }

    summary
}

fn regenerate(path: &Path) -> Result<()> {
    let mut file = read_vectors(path)?;
    let updates = conformance::regenerate(&mut file).context("failed to encode vectors")?;

    for update in &updates {
        println!("{} {}", "updated".yellow(), update.desc);
        println!("  old: {}", update.old);
        println!("  new: {}", update.new);
    }

    if updates.is_empty() {
        info!(path = %path.display(), "vectors already up to date");
        println!("No changes.");
        return Ok(());
    }

    let mut json = serde_json::to_string_pretty(&file).context("failed to serialize vectors")?;
    json.push('\n');
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    println!("Wrote {} ({} updated)", path.display(), updates.len());
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if args.regenerate {
        return regenerate(&args.vectors);
    }

    let file = read_vectors(&args.vectors)?;
    debug!(count = file.vectors.len(), path = %args.vectors.display(), "loaded vectors");

    let summary = run_checks(&file, args.verbose, args.fail_fast);

    println!();
    println!(
        "Encode: {} ok, {} fail",
        summary.encode_ok, summary.encode_fail
    );
    println!(
        "Parse:  {} ok, {} fail",
        summary.parse_ok, summary.parse_fail
    );

    if !summary.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn golden() -> VectorFile {
        serde_json::from_str(include_str!("../../../spec/test-vectors.json")).unwrap()
    }

    #[test]
    fn test_golden_vectors_pass() {
        let summary = run_checks(&golden(), false, false);
        assert!(summary.is_success(), "{summary:?}");
        assert!(summary.encode_ok > 0);
    }

    #[test]
    fn test_fail_fast_stops_at_first_failure() {
        let mut file = golden();
        for vector in &mut file.vectors {
            vector.tenant = vector.tenant.wrapping_add(1);
        }
        let summary = run_checks(&file, false, true);
        assert_eq!(summary.encode_fail, 1);
        assert_eq!(summary.parse_fail, 1);
    }

    #[test]
    fn test_read_vectors_rejects_empty_file() {
        let dir = std::env::temp_dir().join(format!("orderlyid-conformance-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("empty.json");
        std::fs::write(&path, r#"{"vectors": []}"#).unwrap();

        let err = read_vectors(&path).unwrap_err();
        assert!(err.to_string().contains("no vectors"));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_args_definition_is_valid() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
