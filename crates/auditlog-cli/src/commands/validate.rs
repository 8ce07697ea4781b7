//! Validate command implementation.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use auditlog_core::{AuditLogConfigSpec, Validate};

/// Arguments for the validate command.
#[derive(Args)]
pub struct ValidateArgs {
    /// Path to an audit log config file
    pub path: PathBuf,

    /// Show detailed output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Runs the validate command.
pub fn run(args: &ValidateArgs) -> Result<()> {
    info!(path = ?args.path, "Validating audit log config");

    let json = fs::read_to_string(&args.path)
        .with_context(|| format!("Failed to read {}", args.path.display()))?;
    let spec = AuditLogConfigSpec::from_json(&json)
        .with_context(|| format!("Failed to parse {}", args.path.display()))?;

    if args.verbose {
        println!("Validating: {}", args.path.display());
        println!("  Bootstrap servers: {}", spec.destinations.bootstrap_servers.len());
        println!("  Topics: {}", spec.destinations.topics.len());
        println!("  Routes: {}", spec.routes().count());
        println!("  Excluded principals: {}", spec.excluded_principals().len());
    }

    if let Err(errors) = spec.validate() {
        println!("\nErrors:");
        for error in errors.iter() {
            println!("✗ {error}");
        }
        anyhow::bail!("{} validation errors", errors.len());
    }

    println!("✓ {}", args.path.display());
    Ok(())
}
