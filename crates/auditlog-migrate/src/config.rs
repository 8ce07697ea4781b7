//! Configuration for a migration run.

/// Topic name of the organization-wide default allow/deny topic.
pub const DEFAULT_TOPIC: &str = "confluent-audit-log-events";

/// Retention given to [`DEFAULT_TOPIC`] when no cluster declares it (90 days).
pub const DEFAULT_RETENTION_MS: i64 = 7_776_000_000;

/// Target settings of the consolidated configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationConfig {
    /// CRN authority every merged route is rewritten onto.
    pub crn_authority: String,

    /// Bootstrap servers of the merged destination, sorted and de-duplicated.
    pub bootstrap_servers: Vec<String>,
}

impl MigrationConfig {
    /// Creates a configuration targeting the given CRN authority.
    ///
    /// # Examples
    ///
    /// ```
    /// use auditlog_migrate::MigrationConfig;
    ///
    /// let config = MigrationConfig::new("mds.example.com")
    ///     .with_bootstrap_servers(["b2:9092", "b1:9092", "b2:9092"]);
    /// assert_eq!(config.crn_authority, "mds.example.com");
    /// assert_eq!(config.bootstrap_servers, vec!["b1:9092", "b2:9092"]);
    /// ```
    #[must_use]
    pub fn new(crn_authority: impl Into<String>) -> Self {
        Self {
            crn_authority: crn_authority.into(),
            bootstrap_servers: Vec::new(),
        }
    }

    /// Sets the bootstrap servers of the merged destination.
    ///
    /// The list is sorted and de-duplicated.
    #[must_use]
    pub fn with_bootstrap_servers<I, S>(mut self, servers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut servers: Vec<String> = servers.into_iter().map(Into::into).collect();
        servers.sort();
        servers.dedup();
        self.bootstrap_servers = servers;
        self
    }
}
