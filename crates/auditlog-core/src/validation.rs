//! Validation of audit log configuration documents.
//!
//! Validation reports documents that the audit log service would route events
//! out of poorly: topics referenced but never declared as destinations,
//! non-positive retention, or a destination without brokers.

use std::fmt;

use crate::spec::AuditLogConfigSpec;

/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field or path that failed validation.
    pub field: String,
    /// A human-readable description of the validation failure.
    pub message: String,
    /// The kind of validation that failed.
    pub kind: ValidationErrorKind,
}

impl ValidationError {
    /// Creates a new validation error.
    ///
    /// # Examples
    ///
    /// ```
    /// use auditlog_core::ValidationError;
    /// use auditlog_core::validation::ValidationErrorKind;
    ///
    /// let error = ValidationError::new(
    ///     "default_topics.allowed",
    ///     "topic 'audit' is not a destination topic",
    ///     ValidationErrorKind::UnknownTopic,
    /// );
    /// assert_eq!(error.kind, ValidationErrorKind::UnknownTopic);
    /// ```
    pub fn new(field: impl Into<String>, message: impl Into<String>, kind: ValidationErrorKind) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            kind,
        }
    }

    /// Creates a validation error for a reference to an undeclared topic.
    pub fn unknown_topic(field: impl Into<String>, topic: &str) -> Self {
        Self::new(
            field,
            format!("topic '{topic}' is not a destination topic"),
            ValidationErrorKind::UnknownTopic,
        )
    }

    /// Creates a validation error for a value out of range.
    pub fn range(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(field, message, ValidationErrorKind::Range)
    }

    /// Creates a validation error for an empty collection.
    pub fn empty(field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            message: format!("'{field}' must not be empty"),
            field,
            kind: ValidationErrorKind::Empty,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation error for '{}': {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// The category of validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorKind {
    /// A topic is referenced but not declared under destinations.
    UnknownTopic,
    /// The value is outside the allowed range.
    Range,
    /// A collection is empty when it shouldn't be.
    Empty,
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownTopic => write!(f, "unknown-topic"),
            Self::Range => write!(f, "range"),
            Self::Empty => write!(f, "empty"),
        }
    }
}

/// A collection of validation errors.
#[derive(Debug, Clone, Default)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    /// Creates an empty validation errors collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a validation error to the collection.
    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Returns true if there are no validation errors.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of validation errors.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns an iterator over the validation errors.
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter()
    }

    fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            write!(f, "no validation errors")
        } else if self.errors.len() == 1 {
            write!(f, "{}", self.errors[0])
        } else {
            writeln!(f, "{} validation errors:", self.errors.len())?;
            for error in &self.errors {
                writeln!(f, "  - {error}")?;
            }
            Ok(())
        }
    }
}

impl std::error::Error for ValidationErrors {}

/// Trait for types that can be validated.
pub trait Validate {
    /// Validates this instance and returns every finding.
    ///
    /// # Errors
    ///
    /// Returns `ValidationErrors` containing all validation failures found.
    fn validate(&self) -> Result<(), ValidationErrors>;

    /// Returns true if this instance is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

impl Validate for AuditLogConfigSpec {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let topics = &self.destinations.topics;

        if self.destinations.bootstrap_servers.is_empty() {
            errors.add(ValidationError::empty("destinations.bootstrap_servers"));
        }

        for (name, topic) in topics {
            if topic.retention_ms <= 0 {
                errors.add(ValidationError::range(
                    format!("destinations.topics.{name}.retention_ms"),
                    format!("retention must be positive, got {}", topic.retention_ms),
                ));
            }
        }

        for (field, topic) in [
            ("default_topics.allowed", &self.default_topics.allowed),
            ("default_topics.denied", &self.default_topics.denied),
        ] {
            if !topics.contains_key(topic) {
                errors.add(ValidationError::unknown_topic(field, topic));
            }
        }

        for (crn, route) in self.routes() {
            for (category, assignment) in route.iter() {
                for topic in assignment.topics() {
                    if !topics.contains_key(topic) {
                        errors.add(ValidationError::unknown_topic(
                            format!("routes.{crn}.{category}"),
                            topic,
                        ));
                    }
                }
            }
        }

        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{CategoryTopics, RouteCategories, RouteCategory};

    fn valid_spec() -> AuditLogConfigSpec {
        AuditLogConfigSpec::default()
            .with_bootstrap_servers(["b1:9092"])
            .with_topic("events", 1000)
            .with_default_topics("events", "events")
    }

    #[test]
    fn test_valid_spec() {
        assert!(valid_spec().is_valid());
    }

    #[test]
    fn test_missing_default_topic() {
        let spec = valid_spec().with_default_topics("events", "denied");
        let errors = spec.validate().unwrap_err();
        assert_eq!(errors.len(), 1);

        let error = errors.iter().next().unwrap();
        assert_eq!(error.field, "default_topics.denied");
        assert_eq!(error.kind, ValidationErrorKind::UnknownTopic);
    }

    #[test]
    fn test_route_topic_must_exist() {
        let spec = valid_spec().with_route(
            "crn://mds/kafka=c1",
            RouteCategories::new().with(RouteCategory::Produce, CategoryTopics::new("events", "nope")),
        );
        let errors = spec.validate().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["routes.crn://mds/kafka=c1.produce"]);
    }

    #[test]
    fn test_retention_and_bootstrap() {
        let spec = valid_spec().with_topic("events", 0).with_bootstrap_servers(Vec::<String>::new());
        let errors = spec.validate().unwrap_err();
        let kinds: Vec<_> = errors.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![ValidationErrorKind::Empty, ValidationErrorKind::Range]);
    }

    #[test]
    fn test_validation_errors_display_multiple() {
        let mut errors = ValidationErrors::new();
        errors.add(ValidationError::empty("field1"));
        errors.add(ValidationError::range("field2", "bad"));

        let display = format!("{errors}");
        assert!(display.contains("2 validation errors"));
        assert!(display.contains("field1"));
        assert!(display.contains("field2"));
    }

    #[test]
    fn test_validation_errors_display_single() {
        let mut errors = ValidationErrors::new();
        errors.add(ValidationError::empty("field"));

        let display = format!("{errors}");
        assert!(display.contains("field"));
        assert!(!display.contains("validation errors:"));
    }

    #[test]
    fn test_validation_error_kind_display() {
        assert_eq!(ValidationErrorKind::UnknownTopic.to_string(), "unknown-topic");
        assert_eq!(ValidationErrorKind::Range.to_string(), "range");
        assert_eq!(ValidationErrorKind::Empty.to_string(), "empty");
    }
}
