//! The consolidation pipeline.

use std::collections::BTreeMap;

use auditlog_core::AuditLogConfigSpec;
use serde::Serialize;
use tracing::{debug, info};

use crate::alternate::generate_alternate_default_topic_routes;
use crate::config::MigrationConfig;
use crate::conflicts::{
    warn_mismatched_kafka_clusters, warn_multiple_crn_authorities, warn_new_bootstrap_servers,
    warn_new_excluded_principals,
};
use crate::error::Result;
use crate::merger::{
    merge_bootstrap_servers, merge_destination_topics, merge_excluded_principals, merge_routes,
    set_default_topic,
};
use crate::normalizer::normalize_categories;
use crate::parser::parse_cluster_configs;
use crate::rewriter::rewrite_authorities;
use crate::warning::Warning;

/// Outcome of a migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Migration {
    /// The consolidated configuration.
    pub spec: AuditLogConfigSpec,
    /// Conflicts resolved along the way, sorted alphabetically.
    pub warnings: Vec<String>,
}

/// Consolidates per-cluster audit log configurations.
///
/// # Examples
///
/// ```rust
/// use auditlog_migrate::{MigrationConfig, Migrator};
///
/// let migrator = Migrator::new(
///     MigrationConfig::new("mds.example.com").with_bootstrap_servers(["b1:9092"]),
/// );
///
/// let migration = migrator
///     .migrate([(
///         "lkc-1",
///         r#"{
///             "destinations": { "bootstrap_servers": ["b1:9092"] },
///             "default_topics": {
///                 "allowed": "confluent-audit-log-events",
///                 "denied": "confluent-audit-log-events"
///             },
///             "routes": {
///                 "crn://old.example.com/kafka=*/topic=*": {
///                     "produce": { "allowed": "confluent-audit-log-events" }
///                 }
///             }
///         }"#,
///     )])
///     .unwrap();
///
/// assert!(migration.warnings.is_empty());
/// assert!(migration.spec.routes.unwrap().contains_key("crn://mds.example.com/kafka=lkc-1/topic=*"));
/// ```
#[derive(Debug, Clone)]
pub struct Migrator {
    config: MigrationConfig,
}

impl Migrator {
    /// Creates a migrator for the given target settings.
    #[must_use]
    pub const fn new(config: MigrationConfig) -> Self {
        Self { config }
    }

    /// Returns the target settings.
    #[must_use]
    pub const fn config(&self) -> &MigrationConfig {
        &self.config
    }

    /// Parses raw per-cluster JSON configurations and consolidates them.
    ///
    /// # Errors
    ///
    /// Returns an error naming the cluster whose configuration is not valid
    /// JSON. No other condition fails a migration.
    pub fn migrate<I, K, V>(&self, cluster_configs: I) -> Result<Migration>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let specs = parse_cluster_configs(cluster_configs)?;
        Ok(self.migrate_specs(specs))
    }

    /// Consolidates already parsed per-cluster configurations.
    #[must_use]
    pub fn migrate_specs(&self, mut specs: BTreeMap<String, AuditLogConfigSpec>) -> Migration {
        let target_servers = &self.config.bootstrap_servers;
        let authority = self.config.crn_authority.as_str();

        info!(
            clusters = specs.len(),
            authority,
            "Migrating audit log configs"
        );

        let mut merged = AuditLogConfigSpec::default();
        let mut warnings: Vec<Warning> = Vec::new();

        warnings.extend(normalize_categories(&mut specs));
        warnings.extend(warn_multiple_crn_authorities(&specs));
        warnings.extend(warn_mismatched_kafka_clusters(&specs));
        warnings.extend(warn_new_bootstrap_servers(&specs, target_servers));
        debug!(warnings = warnings.len(), "Scanned cluster configs");

        merge_bootstrap_servers(&mut merged, target_servers);
        warnings.extend(merge_destination_topics(&specs, &mut merged));
        set_default_topic(&mut merged);
        let principals = merge_excluded_principals(&specs, &mut merged);
        warnings.extend(warn_new_excluded_principals(&specs, &principals));
        warnings.extend(merge_routes(&specs, &mut merged));
        warnings.extend(rewrite_authorities(&mut merged, authority));
        generate_alternate_default_topic_routes(&specs, &mut merged, authority);

        let mut warnings: Vec<String> = warnings.iter().map(ToString::to_string).collect();
        warnings.sort();

        info!(
            routes = merged.routes().count(),
            topics = merged.destinations.topics.len(),
            warnings = warnings.len(),
            "Migration complete"
        );

        Migration {
            spec: merged,
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_TOPIC;
    use crate::error::MigrationError;

    fn migrator() -> Migrator {
        Migrator::new(MigrationConfig::new("new").with_bootstrap_servers(["b1:9092"]))
    }

    #[test]
    fn test_parse_error_short_circuits() {
        let result = migrator().migrate([("ok", "{}"), ("bad", "{")]);
        assert!(matches!(
            result,
            Err(MigrationError::InvalidClusterConfig { ref cluster_id, .. }) if cluster_id == "bad"
        ));
    }

    #[test]
    fn test_no_clusters() {
        let migration = migrator().migrate_specs(BTreeMap::new());

        assert!(migration.warnings.is_empty());
        assert_eq!(migration.spec.destinations.bootstrap_servers, vec!["b1:9092"]);
        assert!(migration.spec.destinations.topics.contains_key(DEFAULT_TOPIC));
        assert_eq!(migration.spec.excluded_principals, Some(Vec::new()));
        assert_eq!(migration.spec.routes, Some(BTreeMap::new()));
    }

    #[test]
    fn test_warnings_sorted() {
        let specs = BTreeMap::from([
            (
                "c1".to_string(),
                AuditLogConfigSpec::default()
                    .with_bootstrap_servers(["x:9092"])
                    .with_topic("t", 1)
                    .with_excluded_principal("User:z"),
            ),
            (
                "c2".to_string(),
                AuditLogConfigSpec::default()
                    .with_bootstrap_servers(["b1:9092"])
                    .with_topic("t", 2),
            ),
        ]);

        let migration = migrator().migrate_specs(specs);

        let mut sorted = migration.warnings.clone();
        sorted.sort();
        assert_eq!(migration.warnings, sorted);
        assert_eq!(migration.warnings.len(), 3);
        assert!(migration.warnings[0].starts_with("New Bootstrap Servers Warning: Cluster \"c1\""));
        assert!(migration.warnings[1].starts_with("New Excluded Principals Warning: Cluster \"c2\""));
        assert!(migration.warnings[2].starts_with("Retention Time Discrepancy Warning: Topic \"t\""));
    }

    #[test]
    fn test_migration_is_deterministic() {
        let configs = [
            ("b", r#"{"routes": {"crn://x/kafka=shared": {}}, "default_topics": {"allowed": "t", "denied": "t"}}"#),
            ("a", r#"{"routes": {"crn://y/kafka=shared": {}}}"#),
        ];

        let first = migrator().migrate(configs).unwrap();
        let second = migrator().migrate(configs).unwrap();

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
