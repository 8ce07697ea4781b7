//! Soft conflicts found while consolidating configurations.
//!
//! A [`Warning`] never stops a migration. Each stage reports what it had to
//! drop, override or change, and the migrator hands the rendered messages back
//! to the caller sorted alphabetically.

use std::fmt;

/// A conflict the migration resolved on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// The legacy `other` category of a route disagreed with its
    /// `management` category and was dropped.
    OtherCategoryConflict {
        /// Cluster owning the route.
        cluster_id: String,
        /// Route key.
        route: String,
    },

    /// A cluster's routes use more than one CRN authority.
    MultipleCrnAuthorities {
        /// Cluster owning the routes.
        cluster_id: String,
        /// Distinct authorities, sorted.
        authorities: Vec<String>,
    },

    /// A route names a Kafka cluster other than the one it belongs to.
    MismatchedKafkaCluster {
        /// Cluster owning the route.
        cluster_id: String,
        /// Route key.
        route: String,
    },

    /// A cluster's bootstrap servers will be replaced.
    NewBootstrapServers {
        /// Cluster whose servers change.
        cluster_id: String,
        /// The cluster's servers, sorted.
        current: Vec<String>,
        /// The servers of the merged configuration.
        target: Vec<String>,
    },

    /// A topic had different retentions across clusters.
    RetentionDiscrepancy {
        /// Topic name.
        topic: String,
        /// The retention kept.
        retention_ms: i64,
    },

    /// A cluster will exclude principals it did not exclude before.
    NewExcludedPrincipals {
        /// Cluster gaining exclusions.
        cluster_id: String,
        /// Principals new to the cluster, sorted.
        principals: Vec<String>,
    },

    /// A route key was produced more than once; only the first was kept.
    RepeatedRoute {
        /// Route key.
        route: String,
    },
}

struct List<'a>(&'a [String]);

impl fmt::Display for List<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(" "))
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OtherCategoryConflict { cluster_id, route } => write!(
                f,
                "Other Category Warning: The \"other\" category of route {route:?} in cluster {cluster_id:?} \
                 conflicts with its \"management\" category and was dropped."
            ),
            Self::MultipleCrnAuthorities {
                cluster_id,
                authorities,
            } => write!(
                f,
                "Multiple CRN Authorities Warning: Cluster {cluster_id:?} had multiple CRN Authorities in its routes: {}.",
                List(authorities)
            ),
            Self::MismatchedKafkaCluster { cluster_id, route } => write!(
                f,
                "Mismatched Kafka Cluster Warning: Cluster {cluster_id:?} has a route with a different clusterId. Route: {route:?}."
            ),
            Self::NewBootstrapServers {
                cluster_id,
                current,
                target,
            } => write!(
                f,
                "New Bootstrap Servers Warning: Cluster {cluster_id:?} currently has bootstrap servers = {}. \
                 Replacing with {}. Migrated clusters will use the specified bootstrap servers.",
                List(current),
                List(target)
            ),
            Self::RetentionDiscrepancy {
                topic,
                retention_ms,
            } => write!(
                f,
                "Retention Time Discrepancy Warning: Topic {topic:?} had discrepancies on retention time. Using max: {retention_ms}."
            ),
            Self::NewExcludedPrincipals {
                cluster_id,
                principals,
            } => write!(
                f,
                "New Excluded Principals Warning: Cluster {cluster_id:?} will now also exclude the following principals: {}.",
                List(principals)
            ),
            Self::RepeatedRoute { route } => {
                write!(f, "Repeated Route Warning: Route Name : {route:?}.")
            }
        }
    }
}
