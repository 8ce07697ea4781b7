//! Migrate command implementation.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use auditlog_core::{AuditLogConfigSpec, Validate};
use auditlog_migrate::{MigrationConfig, Migrator};

/// Arguments for the migrate command.
#[derive(Args)]
pub struct MigrateArgs {
    /// Cluster configs to combine, as `<cluster-id>=<path>`
    #[arg(long, required = true, value_delimiter = ',', value_parser = parse_cluster_file)]
    pub combine: Vec<(String, PathBuf)>,

    /// Bootstrap servers of the combined audit log destination
    #[arg(long, required = true, value_delimiter = ',')]
    pub bootstrap_servers: Vec<String>,

    /// CRN authority every route is moved onto
    #[arg(long, env = "AUDITLOG_CRN_AUTHORITY")]
    pub crn_authority: String,

    /// Write the combined config to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the config and warnings as one JSON object
    #[arg(long)]
    pub json: bool,
}

/// Runs the migrate command.
pub fn run(args: &MigrateArgs) -> Result<()> {
    info!(clusters = args.combine.len(), authority = %args.crn_authority, "Combining audit log configs");

    let configs = load_cluster_configs(&args.combine)?;
    let config = MigrationConfig::new(&args.crn_authority)
        .with_bootstrap_servers(args.bootstrap_servers.iter().map(|s| s.trim()));

    let migration = Migrator::new(config).migrate(&configs)?;

    // warnings are part of the JSON document in --json mode
    if !args.json {
        for warning in &migration.warnings {
            eprintln!("⚠ {warning}");
        }
    }
    for finding in validation_findings(&migration.spec) {
        eprintln!("⚠ {finding}");
    }

    let content = if args.json {
        serde_json::to_string_pretty(&migration)?
    } else {
        migration.spec.to_json_pretty()?
    };
    write_output(args.output.as_deref(), &content)
}

/// Renders the validation findings on a combined config.
fn validation_findings(spec: &AuditLogConfigSpec) -> Vec<String> {
    spec.validate()
        .err()
        .map(|errors| errors.iter().map(ToString::to_string).collect())
        .unwrap_or_default()
}

/// Parses a `<cluster-id>=<path>` argument.
fn parse_cluster_file(value: &str) -> std::result::Result<(String, PathBuf), String> {
    match value.split_once('=') {
        Some((cluster_id, path)) if !cluster_id.is_empty() && !path.is_empty() => {
            Ok((cluster_id.to_string(), PathBuf::from(path)))
        }
        _ => Err(format!("expected <cluster-id>=<path>, got '{value}'")),
    }
}

/// Reads each cluster's config file.
fn load_cluster_configs(files: &[(String, PathBuf)]) -> Result<BTreeMap<String, String>> {
    let mut configs = BTreeMap::new();
    for (cluster_id, path) in files {
        let json = fs::read_to_string(path).with_context(|| {
            format!(
                "Failed to read config for cluster {cluster_id}: {}",
                path.display()
            )
        })?;
        if configs.insert(cluster_id.clone(), json).is_some() {
            anyhow::bail!("Cluster {cluster_id} given more than once");
        }
    }
    Ok(configs)
}

fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, format!("{content}\n"))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "Wrote combined config");
        }
        None => println!("{content}"),
    }
    Ok(())
}
