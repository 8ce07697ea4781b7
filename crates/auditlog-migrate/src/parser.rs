//! Parsing of per-cluster configuration documents.

use std::collections::BTreeMap;

use auditlog_core::AuditLogConfigSpec;
use tracing::debug;

use crate::error::{MigrationError, Result};

/// Parses raw JSON configurations keyed by cluster id.
///
/// Clusters are parsed in sorted id order, so when several documents are
/// malformed the error always names the same one.
///
/// # Errors
///
/// Returns [`MigrationError::InvalidClusterConfig`] naming the first cluster
/// whose document does not parse.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use auditlog_migrate::parse_cluster_configs;
///
/// let mut configs = HashMap::new();
/// configs.insert("lkc-1", r#"{"default_topics": {"allowed": "a", "denied": "a"}}"#);
///
/// let specs = parse_cluster_configs(&configs).unwrap();
/// assert_eq!(specs["lkc-1"].default_topics.allowed, "a");
/// ```
pub fn parse_cluster_configs<I, K, V>(
    cluster_configs: I,
) -> Result<BTreeMap<String, AuditLogConfigSpec>>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut raw: Vec<(K, V)> = cluster_configs.into_iter().collect();
    raw.sort_by(|(a, _), (b, _)| a.as_ref().cmp(b.as_ref()));

    let mut specs = BTreeMap::new();
    for (cluster_id, json) in raw {
        let cluster_id = cluster_id.as_ref();
        debug!(cluster_id, "Parsing audit log config");

        let spec: AuditLogConfigSpec = serde_json::from_str(json.as_ref()).map_err(|source| {
            MigrationError::InvalidClusterConfig {
                cluster_id: cluster_id.to_string(),
                source,
            }
        })?;
        specs.insert(cluster_id.to_string(), spec);
    }

    Ok(specs)
}
