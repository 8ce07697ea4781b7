//! Read-only conflict scans.
//!
//! Each scan inspects the parsed per-cluster configurations and reports how
//! the merged configuration will differ from what a cluster had. None of them
//! change any document.

use std::collections::{BTreeMap, BTreeSet};

use auditlog_core::crn::WILDCARD;
use auditlog_core::{AuditLogConfigSpec, Crn};

use crate::warning::Warning;

/// Warns about clusters whose routes use more than one CRN authority.
pub fn warn_multiple_crn_authorities(specs: &BTreeMap<String, AuditLogConfigSpec>) -> Vec<Warning> {
    specs
        .iter()
        .filter_map(|(cluster_id, spec)| {
            let authorities: BTreeSet<&str> = spec
                .routes()
                .filter_map(|(route, _)| Crn::authority_of(route))
                .collect();

            (authorities.len() > 1).then(|| Warning::MultipleCrnAuthorities {
                cluster_id: cluster_id.clone(),
                authorities: authorities.into_iter().map(str::to_string).collect(),
            })
        })
        .collect()
}

/// Warns about routes naming a Kafka cluster other than their owner.
///
/// Wildcard cluster ids are fine; they are bound to the owner when routes
/// are merged.
pub fn warn_mismatched_kafka_clusters(specs: &BTreeMap<String, AuditLogConfigSpec>) -> Vec<Warning> {
    let mut warnings = Vec::new();

    for (cluster_id, spec) in specs {
        for (route, _) in spec.routes() {
            let Ok(crn) = Crn::parse(route) else {
                continue;
            };
            if let Some(kafka) = crn.kafka_cluster() {
                if kafka != WILDCARD && kafka != cluster_id {
                    warnings.push(Warning::MismatchedKafkaCluster {
                        cluster_id: cluster_id.clone(),
                        route: route.clone(),
                    });
                }
            }
        }
    }

    warnings
}

/// Warns about clusters whose bootstrap servers differ from the target.
///
/// `target` must already be sorted; each cluster's list is compared as a
/// sorted copy.
pub fn warn_new_bootstrap_servers(
    specs: &BTreeMap<String, AuditLogConfigSpec>,
    target: &[String],
) -> Vec<Warning> {
    specs
        .iter()
        .filter_map(|(cluster_id, spec)| {
            let mut current = spec.destinations.bootstrap_servers.clone();
            current.sort();

            (current != target).then(|| Warning::NewBootstrapServers {
                cluster_id: cluster_id.clone(),
                current,
                target: target.to_vec(),
            })
        })
        .collect()
}

/// Warns about clusters that will exclude principals they did not before.
///
/// `merged` is the sorted union of every cluster's excluded principals.
pub fn warn_new_excluded_principals(
    specs: &BTreeMap<String, AuditLogConfigSpec>,
    merged: &[String],
) -> Vec<Warning> {
    specs
        .iter()
        .filter_map(|(cluster_id, spec)| {
            let own = spec.excluded_principals();
            let principals: Vec<String> = merged
                .iter()
                .filter(|principal| !own.contains(*principal))
                .cloned()
                .collect();

            (!principals.is_empty()).then(|| Warning::NewExcludedPrincipals {
                cluster_id: cluster_id.clone(),
                principals,
            })
        })
        .collect()
}
