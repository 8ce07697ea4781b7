//! Error types for audit log migration.

use thiserror::Error;

/// Result type alias for migration operations.
pub type Result<T> = std::result::Result<T, MigrationError>;

/// Errors that abort a migration.
///
/// Conflicts between clusters are never errors; they are reported as
/// [`Warning`](crate::Warning)s.
#[derive(Error, Debug)]
pub enum MigrationError {
    /// A cluster's configuration is not a valid audit log configuration document.
    #[error("Failed to parse audit log config for cluster {cluster_id}: {source}")]
    InvalidClusterConfig {
        /// Cluster whose configuration failed to parse.
        cluster_id: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_cluster_config_display() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = MigrationError::InvalidClusterConfig {
            cluster_id: "lkc-1".to_string(),
            source,
        };
        assert!(err
            .to_string()
            .starts_with("Failed to parse audit log config for cluster lkc-1: "));
    }
}
