//! Route category normalization.
//!
//! Older configurations may still route events through the legacy `other`
//! category, and clusters with their own default topics rely on those defaults
//! for management and authorization events. Both are made explicit on each
//! cluster's routes before anything is merged.

use std::collections::BTreeMap;

use auditlog_core::{AuditLogConfigSpec, RouteCategory};
use tracing::debug;

use crate::config::DEFAULT_TOPIC;
use crate::warning::Warning;

/// Normalizes the route categories of every cluster.
///
/// Returns the conflicts found while folding `other` into `management`.
pub fn normalize_categories(specs: &mut BTreeMap<String, AuditLogConfigSpec>) -> Vec<Warning> {
    let mut warnings = Vec::new();
    for (cluster_id, spec) in specs.iter_mut() {
        warnings.extend(migrate_other_category(cluster_id, spec));
        fill_default_categories(spec);
    }
    warnings
}

/// Moves the legacy `other` category of each route into `management`.
///
/// `other` is always cleared. When both are set and differ, `management`
/// wins and a warning is returned.
pub fn migrate_other_category(cluster_id: &str, spec: &mut AuditLogConfigSpec) -> Vec<Warning> {
    let mut warnings = Vec::new();

    for (route_name, route) in spec.routes.iter_mut().flatten() {
        let Some(other) = route.other.take() else {
            continue;
        };

        if route.management.is_none() {
            route.management = Some(other);
        } else if route.management.as_ref() != Some(&other) {
            debug!(cluster_id, route = %route_name, "Dropping conflicting other category");
            warnings.push(Warning::OtherCategoryConflict {
                cluster_id: cluster_id.to_string(),
                route: route_name.clone(),
            });
        }
    }

    warnings
}

/// Makes a cluster's own default topics explicit on its routes.
///
/// Only applies when the cluster's default topics are not the
/// organization-wide default. Missing `management` and `authorize`
/// categories are filled; set categories are never overwritten.
pub fn fill_default_categories(spec: &mut AuditLogConfigSpec) {
    if spec.default_topics.is_uniform(DEFAULT_TOPIC) {
        return;
    }

    let defaults = spec.default_topics.to_category_topics();
    for route in spec.routes.iter_mut().flat_map(BTreeMap::values_mut) {
        route.fill(RouteCategory::Management, &defaults);
        route.fill(RouteCategory::Authorize, &defaults);
    }
}
