//! CRN rewriting of route keys.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use auditlog_core::crn::{KAFKA_KIND, WILDCARD};
use auditlog_core::{AuditLogConfigSpec, Crn};
use tracing::debug;

use crate::warning::Warning;

/// Binds a `kafka=*` route key to the cluster that owns it.
///
/// Keys naming a specific cluster are returned unchanged. Keys that are not
/// CRNs still have any `kafka=*` path segment bound.
///
/// # Examples
///
/// ```
/// use auditlog_migrate::rewriter::bind_kafka_cluster;
///
/// assert_eq!(bind_kafka_cluster("crn://mds/kafka=*/topic=*", "lkc-1"), "crn://mds/kafka=lkc-1/topic=*");
/// assert_eq!(bind_kafka_cluster("crn://mds/kafka=lkc-2", "lkc-1"), "crn://mds/kafka=lkc-2");
/// assert_eq!(bind_kafka_cluster("kafka=*/topic=*", "lkc-1"), "kafka=lkc-1/topic=*");
/// ```
#[must_use]
pub fn bind_kafka_cluster(route: &str, cluster_id: &str) -> String {
    Crn::parse(route).map_or_else(
        |_| bind_path_segments(route, cluster_id),
        |crn| crn.substitute_wildcard(KAFKA_KIND, cluster_id).to_string(),
    )
}

fn bind_path_segments(route: &str, cluster_id: &str) -> String {
    let wildcard = format!("{KAFKA_KIND}={WILDCARD}");
    route
        .split('/')
        .map(|segment| {
            if segment == wildcard {
                format!("{KAFKA_KIND}={cluster_id}")
            } else {
                segment.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Moves every merged route onto the target CRN authority.
///
/// Routes already on `authority` keep their keys and win any collision.
/// Other routes are moved in key order, so the first of several keys that
/// collapse onto the same rewritten key is kept; each discarded route
/// produces a [`Warning::RepeatedRoute`].
pub fn rewrite_authorities(merged: &mut AuditLogConfigSpec, authority: &str) -> Vec<Warning> {
    let Some(routes) = merged.routes.take() else {
        return Vec::new();
    };

    let mut rewritten = BTreeMap::new();
    let mut moved = Vec::new();
    for (key, route) in routes {
        match Crn::parse(&key) {
            Ok(crn) if crn.authority() != authority => {
                moved.push((crn.with_authority(authority).to_string(), route));
            }
            _ => {
                rewritten.insert(key, route);
            }
        }
    }

    debug!(authority, moved = moved.len(), "Rewriting CRN authorities");

    let mut warnings = Vec::new();
    for (key, route) in moved {
        match rewritten.entry(key) {
            Entry::Vacant(entry) => {
                entry.insert(route);
            }
            Entry::Occupied(entry) => warnings.push(Warning::RepeatedRoute {
                route: entry.key().clone(),
            }),
        }
    }

    merged.routes = Some(rewritten);
    warnings
}
