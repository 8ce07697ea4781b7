//! Routes preserving each cluster's own default topics.
//!
//! Once merged, every cluster shares the organization-wide default topics. A
//! cluster that used to send unmatched events elsewhere keeps doing so through
//! explicit wildcard routes generated from [`ROUTE_TEMPLATES`].

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use auditlog_core::crn::KAFKA_KIND;
use auditlog_core::{AuditLogConfigSpec, CategoryTopics, Crn, RouteCategories, RouteCategory};
use tracing::debug;

const AUTHORIZE: &[RouteCategory] = &[RouteCategory::Authorize];

const AUTHORIZE_AND_MANAGEMENT: &[RouteCategory] =
    &[RouteCategory::Management, RouteCategory::Authorize];

/// A family of resources a default-preserving route is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteTemplate {
    /// Sub-cluster kind under the Kafka cluster (e.g. `connect`), if any.
    pub sub_cluster: Option<&'static str>,
    /// Resource kind, if any; `None` targets the (sub-)cluster itself.
    pub resource: Option<&'static str>,
    /// Categories the route assigns.
    pub categories: &'static [RouteCategory],
}

impl RouteTemplate {
    const fn new(
        sub_cluster: Option<&'static str>,
        resource: Option<&'static str>,
        categories: &'static [RouteCategory],
    ) -> Self {
        Self {
            sub_cluster,
            resource,
            categories,
        }
    }

    /// Builds the route key for a cluster.
    ///
    /// ```
    /// use auditlog_migrate::alternate::ROUTE_TEMPLATES;
    ///
    /// let crn = ROUTE_TEMPLATES[0].crn("mds", "lkc-1");
    /// assert_eq!(crn.to_string(), "crn://mds/kafka=lkc-1");
    /// ```
    #[must_use]
    pub fn crn(&self, authority: &str, cluster_id: &str) -> Crn {
        let mut crn = Crn::new(authority).with_segment(KAFKA_KIND, cluster_id);
        if let Some(sub_cluster) = self.sub_cluster {
            crn = crn.with_wildcard(sub_cluster);
        }
        if let Some(resource) = self.resource {
            crn = crn.with_wildcard(resource);
        }
        crn
    }

    /// Builds the route assigning `topics` to every category of the template.
    #[must_use]
    pub fn route(&self, topics: &CategoryTopics) -> RouteCategories {
        self.categories
            .iter()
            .fold(RouteCategories::new(), |route, category| {
                route.with(*category, topics.clone())
            })
    }
}

/// Resource families covered by default-preserving routes.
pub const ROUTE_TEMPLATES: &[RouteTemplate] = &[
    RouteTemplate::new(None, None, AUTHORIZE_AND_MANAGEMENT),
    RouteTemplate::new(None, Some("topic"), AUTHORIZE_AND_MANAGEMENT),
    RouteTemplate::new(None, Some("transaction-id"), AUTHORIZE),
    RouteTemplate::new(None, Some("group"), AUTHORIZE_AND_MANAGEMENT),
    RouteTemplate::new(None, Some("delegation-token"), AUTHORIZE),
    RouteTemplate::new(None, Some("control-center-broker-metrics"), AUTHORIZE),
    RouteTemplate::new(None, Some("control-center-alerts"), AUTHORIZE),
    RouteTemplate::new(None, Some("cluster-registry"), AUTHORIZE),
    RouteTemplate::new(None, Some("security-metadata"), AUTHORIZE),
    RouteTemplate::new(None, Some("all"), AUTHORIZE),
    RouteTemplate::new(Some("connect"), None, AUTHORIZE_AND_MANAGEMENT),
    RouteTemplate::new(Some("connect"), Some("connector"), AUTHORIZE_AND_MANAGEMENT),
    RouteTemplate::new(Some("connect"), Some("secret"), AUTHORIZE),
    RouteTemplate::new(Some("schema-registry"), None, AUTHORIZE),
    RouteTemplate::new(Some("schema-registry"), Some("subject"), AUTHORIZE_AND_MANAGEMENT),
    RouteTemplate::new(Some("ksql"), None, AUTHORIZE_AND_MANAGEMENT),
];

/// Generates default-preserving routes for every cluster whose default
/// topics differ from the merged document's.
///
/// Routes already present in `merged` win category by category over the
/// generated ones.
pub fn generate_alternate_default_topic_routes(
    specs: &BTreeMap<String, AuditLogConfigSpec>,
    merged: &mut AuditLogConfigSpec,
    authority: &str,
) {
    let default_topics = merged.default_topics.clone();
    let routes = merged.routes.get_or_insert_with(BTreeMap::new);

    for (cluster_id, spec) in specs {
        if spec.default_topics == default_topics {
            continue;
        }

        debug!(
            cluster_id = %cluster_id,
            allowed = %spec.default_topics.allowed,
            denied = %spec.default_topics.denied,
            "Generating alternate default topic routes"
        );

        let topics = spec.default_topics.to_category_topics();
        for template in ROUTE_TEMPLATES {
            let generated = template.route(&topics);
            match routes.entry(template.crn(authority, cluster_id).to_string()) {
                Entry::Vacant(entry) => {
                    entry.insert(generated);
                }
                Entry::Occupied(mut entry) => entry.get_mut().fill_missing_from(&generated),
            }
        }
    }
}
