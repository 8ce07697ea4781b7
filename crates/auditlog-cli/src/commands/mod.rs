//! CLI commands and argument parsing.

pub mod migrate;
pub mod validate;

use clap::{Parser, Subcommand};

/// Audit log configuration tooling
#[derive(Parser)]
#[command(name = "auditlog")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Combine per-cluster audit log configs into one
    Migrate(migrate::MigrateArgs),

    /// Validate an audit log config
    Validate(validate::ValidateArgs),

    /// Print version information
    Version,
}
