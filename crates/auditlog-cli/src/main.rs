//! Audit log CLI - Command-line interface for audit log configuration migration.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{Cli, Commands};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auditlog=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Migrate(args) => commands::migrate::run(&args),
        Commands::Validate(args) => commands::validate::run(&args),
        Commands::Version => {
            println!("auditlog {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
