//! Audit log configuration document model.
//!
//! An [`AuditLogConfigSpec`] is the configuration document the audit log
//! service stores for a cluster (or, once consolidated, for a whole
//! organization). It names the destination topics audit events are written
//! to, the default allow/deny topics, principals that are never audited, and
//! routes that send events for matching CRNs to specific topics.
//!
//! All maps are ordered so that a document always serializes to the same
//! bytes.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// The audit log configuration document.
///
/// # Examples
///
/// ```
/// use auditlog_core::{AuditLogConfigSpec, DefaultTopics};
///
/// let spec = AuditLogConfigSpec::from_json(r#"{
///     "destinations": {
///         "bootstrap_servers": ["broker-1:9092"],
///         "topics": { "confluent-audit-log-events": { "retention_ms": 7776000000 } }
///     },
///     "default_topics": {
///         "allowed": "confluent-audit-log-events",
///         "denied": "confluent-audit-log-events"
///     }
/// }"#).unwrap();
///
/// assert_eq!(spec.default_topics, DefaultTopics::uniform("confluent-audit-log-events"));
/// assert!(spec.routes.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditLogConfigSpec {
    /// Where audit events are written.
    pub destinations: Destinations,

    /// Principals whose actions are never audited.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excluded_principals: Option<Vec<String>>,

    /// Topics used when no route matches an event.
    pub default_topics: DefaultTopics,

    /// Routes keyed by CRN pattern.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routes: Option<BTreeMap<String, RouteCategories>>,

    /// Server-assigned metadata of a stored document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<AuditLogConfigMetadata>,
}

impl AuditLogConfigSpec {
    /// Parses a document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the document as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Returns the excluded principals, empty if unset.
    #[must_use]
    pub fn excluded_principals(&self) -> &[String] {
        self.excluded_principals.as_deref().unwrap_or_default()
    }

    /// Iterates over the routes in key order.
    pub fn routes(&self) -> impl Iterator<Item = (&String, &RouteCategories)> {
        self.routes.iter().flatten()
    }

    /// Sets the bootstrap servers.
    #[must_use]
    pub fn with_bootstrap_servers<I, S>(mut self, servers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.destinations.bootstrap_servers = servers.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a destination topic.
    #[must_use]
    pub fn with_topic(mut self, name: impl Into<String>, retention_ms: i64) -> Self {
        self.destinations
            .topics
            .insert(name.into(), DestinationTopic::new(retention_ms));
        self
    }

    /// Sets the default topics.
    #[must_use]
    pub fn with_default_topics(mut self, allowed: impl Into<String>, denied: impl Into<String>) -> Self {
        self.default_topics = DefaultTopics::new(allowed, denied);
        self
    }

    /// Adds an excluded principal.
    #[must_use]
    pub fn with_excluded_principal(mut self, principal: impl Into<String>) -> Self {
        self.excluded_principals
            .get_or_insert_with(Vec::new)
            .push(principal.into());
        self
    }

    /// Adds a route.
    #[must_use]
    pub fn with_route(mut self, crn: impl Into<String>, categories: RouteCategories) -> Self {
        self.routes
            .get_or_insert_with(BTreeMap::new)
            .insert(crn.into(), categories);
        self
    }
}

/// Where audit events are written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Destinations {
    /// Broker addresses of the destination cluster.
    pub bootstrap_servers: Vec<String>,

    /// Destination topics by name.
    pub topics: BTreeMap<String, DestinationTopic>,
}

/// Settings of one destination topic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationTopic {
    /// How long events are retained, in milliseconds.
    pub retention_ms: i64,
}

impl DestinationTopic {
    /// Creates a topic with the given retention.
    #[must_use]
    pub const fn new(retention_ms: i64) -> Self {
        Self { retention_ms }
    }
}

/// Topics used when no route matches an event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultTopics {
    /// Topic for allowed events.
    pub allowed: String,
    /// Topic for denied events.
    pub denied: String,
}

impl DefaultTopics {
    /// Creates a default topic pair.
    #[must_use]
    pub fn new(allowed: impl Into<String>, denied: impl Into<String>) -> Self {
        Self {
            allowed: allowed.into(),
            denied: denied.into(),
        }
    }

    /// Creates a pair using the same topic for allowed and denied events.
    #[must_use]
    pub fn uniform(topic: impl Into<String>) -> Self {
        let topic = topic.into();
        Self {
            allowed: topic.clone(),
            denied: topic,
        }
    }

    /// Returns true if both topics equal `topic`.
    #[must_use]
    pub fn is_uniform(&self, topic: &str) -> bool {
        self.allowed == topic && self.denied == topic
    }

    /// Converts the pair into a route category assignment.
    #[must_use]
    pub fn to_category_topics(&self) -> CategoryTopics {
        CategoryTopics::new(self.allowed.clone(), self.denied.clone())
    }
}

/// Allow/deny topic assignment of one route category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryTopics {
    /// Topic for allowed events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed: Option<String>,
    /// Topic for denied events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub denied: Option<String>,
}

impl CategoryTopics {
    /// Creates an assignment with both topics set.
    #[must_use]
    pub fn new(allowed: impl Into<String>, denied: impl Into<String>) -> Self {
        Self {
            allowed: Some(allowed.into()),
            denied: Some(denied.into()),
        }
    }

    /// Returns the topic names this assignment refers to.
    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.allowed.iter().chain(self.denied.iter()).map(String::as_str)
    }
}

/// Event categories a route can assign topics for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteCategory {
    /// Resource creation, deletion and configuration.
    Management,
    /// Authorization checks.
    Authorize,
    /// Writes to topics.
    Produce,
    /// Reads from topics.
    Consume,
    /// Metadata reads.
    Describe,
}

impl RouteCategory {
    /// All categories in wire order.
    pub const ALL: [Self; 5] = [
        Self::Management,
        Self::Authorize,
        Self::Produce,
        Self::Consume,
        Self::Describe,
    ];

    /// Returns the wire name of the category.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Management => "management",
            Self::Authorize => "authorize",
            Self::Produce => "produce",
            Self::Consume => "consume",
            Self::Describe => "describe",
        }
    }
}

impl fmt::Display for RouteCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Topic assignments of a route, per event category.
///
/// `other` is a legacy category that older documents may still carry. The
/// consolidation pipeline folds it into `management`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteCategories {
    /// Management events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub management: Option<CategoryTopics>,
    /// Authorization events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorize: Option<CategoryTopics>,
    /// Produce events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub produce: Option<CategoryTopics>,
    /// Consume events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consume: Option<CategoryTopics>,
    /// Describe events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub describe: Option<CategoryTopics>,
    /// Legacy catch-all category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other: Option<CategoryTopics>,
}

impl RouteCategories {
    /// Creates a route with no categories set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a category.
    #[must_use]
    pub fn with(mut self, category: RouteCategory, topics: CategoryTopics) -> Self {
        self.set(category, Some(topics));
        self
    }

    /// Returns the assignment of a category.
    #[must_use]
    pub const fn get(&self, category: RouteCategory) -> Option<&CategoryTopics> {
        match category {
            RouteCategory::Management => self.management.as_ref(),
            RouteCategory::Authorize => self.authorize.as_ref(),
            RouteCategory::Produce => self.produce.as_ref(),
            RouteCategory::Consume => self.consume.as_ref(),
            RouteCategory::Describe => self.describe.as_ref(),
        }
    }

    /// Sets or clears the assignment of a category.
    pub fn set(&mut self, category: RouteCategory, topics: Option<CategoryTopics>) {
        let slot = match category {
            RouteCategory::Management => &mut self.management,
            RouteCategory::Authorize => &mut self.authorize,
            RouteCategory::Produce => &mut self.produce,
            RouteCategory::Consume => &mut self.consume,
            RouteCategory::Describe => &mut self.describe,
        };
        *slot = topics;
    }

    /// Sets a category only if it is not already set.
    ///
    /// Returns true if the category was filled.
    pub fn fill(&mut self, category: RouteCategory, topics: &CategoryTopics) -> bool {
        if self.get(category).is_some() {
            return false;
        }
        self.set(category, Some(topics.clone()));
        true
    }

    /// Fills every category unset here with the assignment from `other`.
    ///
    /// Categories already set are kept as they are; the legacy `other`
    /// category is not copied.
    pub fn fill_missing_from(&mut self, other: &Self) {
        for category in RouteCategory::ALL {
            if let Some(topics) = other.get(category) {
                self.fill(category, topics);
            }
        }
    }

    /// Returns true if no category, including the legacy one, is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.other.is_none() && RouteCategory::ALL.iter().all(|c| self.get(*c).is_none())
    }

    /// Iterates over the set categories in wire order.
    pub fn iter(&self) -> impl Iterator<Item = (RouteCategory, &CategoryTopics)> {
        RouteCategory::ALL
            .into_iter()
            .filter_map(|c| self.get(c).map(|topics| (c, topics)))
    }
}

/// Server-assigned metadata of a stored document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditLogConfigMetadata {
    /// Opaque version used for optimistic concurrency on update.
    pub resource_version: String,
    /// When the document was last updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Who last updated the document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_by: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "destinations": {
            "bootstrap_servers": ["b1:9092", "b2:9092"],
            "topics": {
                "confluent-audit-log-events": { "retention_ms": 7776000000 },
                "audit-denied": { "retention_ms": 100 }
            }
        },
        "default_topics": {
            "allowed": "confluent-audit-log-events",
            "denied": "audit-denied"
        },
        "excluded_principals": ["User:Alice"],
        "routes": {
            "crn://mds/kafka=*/topic=payments": {
                "produce": { "allowed": "audit-denied" },
                "other": { "allowed": "x", "denied": "y" }
            }
        },
        "metadata": { "resource_version": "abc", "updated_at": "2021-01-01T00:00:00Z" }
    }"#;

    #[test]
    fn test_parse_full_document() {
        let spec = AuditLogConfigSpec::from_json(SAMPLE).unwrap();

        assert_eq!(spec.destinations.bootstrap_servers, vec!["b1:9092", "b2:9092"]);
        assert_eq!(
            spec.destinations.topics["audit-denied"],
            DestinationTopic::new(100)
        );
        assert_eq!(spec.default_topics.denied, "audit-denied");
        assert_eq!(spec.excluded_principals(), ["User:Alice".to_string()]);

        let route = &spec.routes.as_ref().unwrap()["crn://mds/kafka=*/topic=payments"];
        assert_eq!(
            route.produce,
            Some(CategoryTopics {
                allowed: Some("audit-denied".to_string()),
                denied: None,
            })
        );
        assert!(route.other.is_some());
        assert_eq!(spec.metadata.unwrap().resource_version, "abc");
    }

    #[test]
    fn test_missing_fields_default() {
        let spec = AuditLogConfigSpec::from_json("{}").unwrap();
        assert!(spec.destinations.topics.is_empty());
        assert!(spec.excluded_principals().is_empty());
        assert_eq!(spec.routes().count(), 0);
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(AuditLogConfigSpec::from_json("{\"destinations\": ").is_err());
        assert!(AuditLogConfigSpec::from_json(r#"{"destinations": {"topics": []}}"#).is_err());
    }

    #[test]
    fn test_serialization_skips_unset_fields() {
        let spec = AuditLogConfigSpec::default()
            .with_default_topics("a", "b")
            .with_route(
                "crn://mds/kafka=c1",
                RouteCategories::new().with(RouteCategory::Authorize, CategoryTopics::new("a", "b")),
            );

        let json = serde_json::to_string(&spec).unwrap();
        assert!(!json.contains("excluded_principals"));
        assert!(!json.contains("metadata"));
        assert!(!json.contains("management"));
        assert!(json.contains(r#""authorize":{"allowed":"a","denied":"b"}"#));

        let back = AuditLogConfigSpec::from_json(&json).unwrap();
        assert_eq!(back, spec);
    }

    #[test]
    fn test_route_categories_get_set() {
        let mut route = RouteCategories::new();
        assert!(route.is_empty());

        route.set(RouteCategory::Consume, Some(CategoryTopics::new("c", "c")));
        assert_eq!(route.get(RouteCategory::Consume), Some(&CategoryTopics::new("c", "c")));
        assert!(route.get(RouteCategory::Produce).is_none());
        assert!(!route.is_empty());

        route.set(RouteCategory::Consume, None);
        assert!(route.is_empty());
    }

    #[test]
    fn test_fill_never_overwrites() {
        let mut route =
            RouteCategories::new().with(RouteCategory::Management, CategoryTopics::new("m", "m"));

        assert!(!route.fill(RouteCategory::Management, &CategoryTopics::new("x", "x")));
        assert!(route.fill(RouteCategory::Authorize, &CategoryTopics::new("x", "x")));

        assert_eq!(route.management, Some(CategoryTopics::new("m", "m")));
        assert_eq!(route.authorize, Some(CategoryTopics::new("x", "x")));
    }

    #[test]
    fn test_fill_missing_from() {
        let mut existing =
            RouteCategories::new().with(RouteCategory::Authorize, CategoryTopics::new("mine", "mine"));
        let mut synthesized = RouteCategories::new()
            .with(RouteCategory::Authorize, CategoryTopics::new("def", "def"))
            .with(RouteCategory::Management, CategoryTopics::new("def", "def"));
        synthesized.other = Some(CategoryTopics::new("o", "o"));

        existing.fill_missing_from(&synthesized);

        assert_eq!(existing.authorize, Some(CategoryTopics::new("mine", "mine")));
        assert_eq!(existing.management, Some(CategoryTopics::new("def", "def")));
        assert!(existing.other.is_none());
    }

    #[test]
    fn test_iter_in_wire_order() {
        let route = RouteCategories::new()
            .with(RouteCategory::Describe, CategoryTopics::new("d", "d"))
            .with(RouteCategory::Management, CategoryTopics::new("m", "m"));
        let categories: Vec<_> = route.iter().map(|(c, _)| c).collect();
        assert_eq!(categories, vec![RouteCategory::Management, RouteCategory::Describe]);
    }

    #[test]
    fn test_default_topics_uniform() {
        let topics = DefaultTopics::uniform("t");
        assert!(topics.is_uniform("t"));
        assert!(!DefaultTopics::new("t", "u").is_uniform("t"));
        assert_eq!(topics.to_category_topics(), CategoryTopics::new("t", "t"));
    }
}
