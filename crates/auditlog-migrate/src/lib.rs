//! # Audit Log Migrate
//!
//! Consolidation of independently administered, per-cluster audit log
//! configurations into a single organization-wide configuration.
//!
//! The [`Migrator`] runs a fixed pipeline:
//!
//! 1. [`parser`] - parse each cluster's JSON document
//! 2. [`normalizer`] - fold the legacy `other` category into `management` and
//!    make custom default topics explicit on routes
//! 3. [`conflicts`] - report authority, cluster id and bootstrap server drift
//! 4. [`merger`] - combine servers, topics, excluded principals and routes
//! 5. [`rewriter`] - move every route onto the target CRN authority
//! 6. [`alternate`] - keep routing custom default topics through explicit routes
//!
//! Conflicts never abort a migration; they are returned as sorted warning
//! messages next to the merged document. Only a malformed input document is an
//! error.
//!
//! ## Example
//!
//! ```rust
//! use auditlog_migrate::{MigrationConfig, Migrator};
//!
//! let config = MigrationConfig::new("mds.example.com")
//!     .with_bootstrap_servers(["b1:9092", "b2:9092"]);
//!
//! let migration = Migrator::new(config)
//!     .migrate([
//!         ("lkc-1", r#"{"destinations": {"bootstrap_servers": ["b1:9092"]}}"#),
//!         ("lkc-2", r#"{"destinations": {"bootstrap_servers": ["b2:9092"]}}"#),
//!     ])
//!     .unwrap();
//!
//! assert_eq!(migration.spec.destinations.bootstrap_servers, vec!["b1:9092", "b2:9092"]);
//! assert_eq!(migration.warnings.len(), 2);
//! ```

pub mod alternate;
pub mod config;
pub mod conflicts;
pub mod error;
pub mod merger;
pub mod migrator;
pub mod normalizer;
pub mod parser;
pub mod rewriter;
pub mod warning;


pub use config::{MigrationConfig, DEFAULT_RETENTION_MS, DEFAULT_TOPIC};
pub use error::{MigrationError, Result};
pub use migrator::{Migration, Migrator};
pub use parser::parse_cluster_configs;
pub use warning::Warning;
