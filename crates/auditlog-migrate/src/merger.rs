//! Merging of per-cluster configurations into one document.
//!
//! Every function here writes one part of the merged document and returns
//! the conflicts it resolved. Clusters are always visited in sorted id order,
//! which makes every tie-break deterministic:
//!
//! - topic retention: the maximum across clusters wins
//! - routes: the first cluster to produce a key wins

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use auditlog_core::{AuditLogConfigSpec, DefaultTopics, DestinationTopic};
use tracing::debug;

use crate::config::{DEFAULT_RETENTION_MS, DEFAULT_TOPIC};
use crate::rewriter::bind_kafka_cluster;
use crate::warning::Warning;

/// Writes the target bootstrap servers into the merged document.
pub fn merge_bootstrap_servers(merged: &mut AuditLogConfigSpec, target: &[String]) {
    merged.destinations.bootstrap_servers = target.to_vec();
}

/// Combines the destination topics of every cluster.
///
/// A topic declared by several clusters keeps the largest retention; if the
/// clusters disagreed a [`Warning::RetentionDiscrepancy`] carries the
/// retention kept.
pub fn merge_destination_topics(
    specs: &BTreeMap<String, AuditLogConfigSpec>,
    merged: &mut AuditLogConfigSpec,
) -> Vec<Warning> {
    let mut topics: BTreeMap<String, DestinationTopic> = BTreeMap::new();
    let mut discrepancies: BTreeMap<String, i64> = BTreeMap::new();

    for spec in specs.values() {
        for (name, topic) in &spec.destinations.topics {
            match topics.entry(name.clone()) {
                Entry::Vacant(entry) => {
                    entry.insert(*topic);
                }
                Entry::Occupied(mut entry) => {
                    let current = entry.get().retention_ms;
                    if current != topic.retention_ms {
                        let retention_ms = current.max(topic.retention_ms);
                        entry.insert(DestinationTopic::new(retention_ms));
                        discrepancies.insert(name.clone(), retention_ms);
                    }
                }
            }
        }
    }

    debug!(
        topics = topics.len(),
        discrepancies = discrepancies.len(),
        "Merged destination topics"
    );
    merged.destinations.topics = topics;

    discrepancies
        .into_iter()
        .map(|(topic, retention_ms)| Warning::RetentionDiscrepancy {
            topic,
            retention_ms,
        })
        .collect()
}

/// Points the merged default topics at [`DEFAULT_TOPIC`].
///
/// The topic is declared with [`DEFAULT_RETENTION_MS`] if no cluster
/// declared it.
pub fn set_default_topic(merged: &mut AuditLogConfigSpec) {
    merged.default_topics = DefaultTopics::uniform(DEFAULT_TOPIC);
    merged
        .destinations
        .topics
        .entry(DEFAULT_TOPIC.to_string())
        .or_insert(DestinationTopic::new(DEFAULT_RETENTION_MS));
}

/// Unions the excluded principals of every cluster, sorted.
///
/// Returns the merged list.
pub fn merge_excluded_principals(
    specs: &BTreeMap<String, AuditLogConfigSpec>,
    merged: &mut AuditLogConfigSpec,
) -> Vec<String> {
    let principals: BTreeSet<&String> = specs
        .values()
        .flat_map(AuditLogConfigSpec::excluded_principals)
        .collect();
    let principals: Vec<String> = principals.into_iter().cloned().collect();

    merged.excluded_principals = Some(principals.clone());
    principals
}

/// Combines the routes of every cluster.
///
/// `kafka=*` in a route key is bound to the owning cluster first. When two
/// routes end up with the same key the one from the lower sorted cluster id
/// is kept and a [`Warning::RepeatedRoute`] is reported.
pub fn merge_routes(
    specs: &BTreeMap<String, AuditLogConfigSpec>,
    merged: &mut AuditLogConfigSpec,
) -> Vec<Warning> {
    let mut routes = BTreeMap::new();
    let mut warnings = Vec::new();

    for (cluster_id, spec) in specs {
        for (route_name, route) in spec.routes() {
            match routes.entry(bind_kafka_cluster(route_name, cluster_id)) {
                Entry::Vacant(entry) => {
                    entry.insert(route.clone());
                }
                Entry::Occupied(entry) => {
                    debug!(cluster_id = %cluster_id, route = %entry.key(), "Discarding repeated route");
                    warnings.push(Warning::RepeatedRoute {
                        route: entry.key().clone(),
                    });
                }
            }
        }
    }

    merged.routes = Some(routes);
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use auditlog_core::{CategoryTopics, RouteCategories, RouteCategory};

    fn specs(entries: Vec<(&str, AuditLogConfigSpec)>) -> BTreeMap<String, AuditLogConfigSpec> {
        entries
            .into_iter()
            .map(|(id, spec)| (id.to_string(), spec))
            .collect()
    }

    fn route(topic: &str) -> RouteCategories {
        RouteCategories::new().with(RouteCategory::Authorize, CategoryTopics::new(topic, topic))
    }

    #[test]
    fn test_bootstrap_servers_written_verbatim() {
        let mut merged = AuditLogConfigSpec::default();
        let target = vec!["a:9092".to_string(), "b:9092".to_string()];

        merge_bootstrap_servers(&mut merged, &target);

        assert_eq!(merged.destinations.bootstrap_servers, target);
    }

    #[test]
    fn test_topics_take_max_retention() {
        let specs = specs(vec![
            ("c1", AuditLogConfigSpec::default().with_topic("shared", 10).with_topic("only-1", 5)),
            ("c2", AuditLogConfigSpec::default().with_topic("shared", 30)),
            ("c3", AuditLogConfigSpec::default().with_topic("shared", 20)),
        ]);
        let mut merged = AuditLogConfigSpec::default();

        let warnings = merge_destination_topics(&specs, &mut merged);

        assert_eq!(merged.destinations.topics["shared"].retention_ms, 30);
        assert_eq!(merged.destinations.topics["only-1"].retention_ms, 5);
        assert_eq!(
            warnings,
            vec![Warning::RetentionDiscrepancy {
                topic: "shared".to_string(),
                retention_ms: 30,
            }]
        );
    }

    #[test]
    fn test_equal_retention_does_not_warn() {
        let specs = specs(vec![
            ("c1", AuditLogConfigSpec::default().with_topic("shared", 10)),
            ("c2", AuditLogConfigSpec::default().with_topic("shared", 10)),
        ]);
        let mut merged = AuditLogConfigSpec::default();

        assert!(merge_destination_topics(&specs, &mut merged).is_empty());
        assert_eq!(merged.destinations.topics["shared"].retention_ms, 10);
    }

    #[test]
    fn test_default_topic_inserted() {
        let mut merged = AuditLogConfigSpec::default().with_topic("other", 1);

        set_default_topic(&mut merged);

        assert_eq!(merged.default_topics, DefaultTopics::uniform(DEFAULT_TOPIC));
        assert_eq!(
            merged.destinations.topics[DEFAULT_TOPIC].retention_ms,
            7_776_000_000
        );
    }

    #[test]
    fn test_default_topic_keeps_declared_retention() {
        let mut merged = AuditLogConfigSpec::default().with_topic(DEFAULT_TOPIC, 42);

        set_default_topic(&mut merged);

        assert_eq!(merged.destinations.topics[DEFAULT_TOPIC].retention_ms, 42);
    }

    #[test]
    fn test_excluded_principals_union_sorted() {
        let specs = specs(vec![
            (
                "c1",
                AuditLogConfigSpec::default()
                    .with_excluded_principal("User:z")
                    .with_excluded_principal("User:a"),
            ),
            ("c2", AuditLogConfigSpec::default().with_excluded_principal("User:a")),
            ("c3", AuditLogConfigSpec::default()),
        ]);
        let mut merged = AuditLogConfigSpec::default();

        let principals = merge_excluded_principals(&specs, &mut merged);

        assert_eq!(principals, vec!["User:a", "User:z"]);
        assert_eq!(merged.excluded_principals, Some(principals));
    }

    #[test]
    fn test_routes_bind_wildcard_cluster() {
        let specs = specs(vec![
            ("a", AuditLogConfigSpec::default().with_route("crn://mds/kafka=*/topic=*", route("a"))),
            ("b", AuditLogConfigSpec::default().with_route("crn://mds/kafka=*/topic=*", route("b"))),
        ]);
        let mut merged = AuditLogConfigSpec::default();

        let warnings = merge_routes(&specs, &mut merged);

        assert!(warnings.is_empty());
        let routes = merged.routes.unwrap();
        assert_eq!(routes["crn://mds/kafka=a/topic=*"], route("a"));
        assert_eq!(routes["crn://mds/kafka=b/topic=*"], route("b"));
    }

    #[test]
    fn test_repeated_route_first_cluster_wins() {
        let shared = "crn://mds/kafka=shared/topic=*";
        let specs = specs(vec![
            ("b", AuditLogConfigSpec::default().with_route(shared, route("b"))),
            ("a", AuditLogConfigSpec::default().with_route(shared, route("a"))),
        ]);
        let mut merged = AuditLogConfigSpec::default();

        let warnings = merge_routes(&specs, &mut merged);

        assert_eq!(
            warnings,
            vec![Warning::RepeatedRoute {
                route: shared.to_string(),
            }]
        );
        assert_eq!(merged.routes.unwrap()[shared], route("a"));
    }

    #[test]
    fn test_wildcard_collides_with_explicit_id() {
        let specs = specs(vec![(
            "c1",
            AuditLogConfigSpec::default()
                .with_route("crn://mds/kafka=*", route("wildcard"))
                .with_route("crn://mds/kafka=c1", route("explicit")),
        )]);
        let mut merged = AuditLogConfigSpec::default();

        let warnings = merge_routes(&specs, &mut merged);

        assert_eq!(warnings.len(), 1);
        // "kafka=*" sorts before "kafka=c1"
        assert_eq!(merged.routes.unwrap()["crn://mds/kafka=c1"], route("wildcard"));
    }

    #[test]
    fn test_wildcard_bound_in_keys_without_scheme() {
        let specs = specs(vec![
            ("a", AuditLogConfigSpec::default().with_route("kafka=*/topic=*", route("a"))),
            ("b", AuditLogConfigSpec::default().with_route("kafka=*/topic=*", route("b"))),
        ]);
        let mut merged = AuditLogConfigSpec::default();

        let warnings = merge_routes(&specs, &mut merged);

        assert!(warnings.is_empty());
        let routes = merged.routes.unwrap();
        let keys: Vec<_> = routes.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["kafka=a/topic=*", "kafka=b/topic=*"]);
        assert_eq!(routes["kafka=b/topic=*"], route("b"));
    }
}
