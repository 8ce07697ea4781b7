//! # Audit Log Core
//!
//! Core types for audit log configuration management.
//!
//! This crate provides the data structures shared by the audit log tooling:
//!
//! - [`AuditLogConfigSpec`] - the audit log configuration document
//! - [`RouteCategories`] - per-category topic assignments of a route
//! - [`Crn`] - structured Confluent Resource Names used as route keys
//! - [`validation`] - consistency checks over a document
//!
//! ## Example
//!
//! ```rust
//! use auditlog_core::{AuditLogConfigSpec, CategoryTopics, Crn, RouteCategories, RouteCategory};
//!
//! let route = Crn::new("mds.example.com").with_segment("kafka", "lkc-1").with_wildcard("topic");
//!
//! let spec = AuditLogConfigSpec::default()
//!     .with_bootstrap_servers(["broker-1:9092"])
//!     .with_topic("confluent-audit-log-events", 7_776_000_000)
//!     .with_default_topics("confluent-audit-log-events", "confluent-audit-log-events")
//!     .with_route(
//!         route.to_string(),
//!         RouteCategories::new().with(
//!             RouteCategory::Produce,
//!             CategoryTopics::new("confluent-audit-log-events", "confluent-audit-log-events"),
//!         ),
//!     );
//!
//! assert_eq!(spec.routes().count(), 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod crn;
pub mod error;
pub mod spec;
pub mod validation;


// Re-export main types at crate root
pub use crn::{Crn, CrnSegment};
pub use error::{Error, Result};
pub use spec::{
    AuditLogConfigMetadata, AuditLogConfigSpec, CategoryTopics, DefaultTopics, DestinationTopic,
    Destinations, RouteCategories, RouteCategory,
};
pub use validation::{Validate, ValidationError, ValidationErrors};
