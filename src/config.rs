//! Configuration for EntityStore
//!
//! Provides a builder pattern for configuring the entity store, plus an
//! environment loader for the connection string.

use crate::error::{Result, StoreError};

/// Environment variable holding the connection string
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Environment variable holding the optional pool size
pub const MAX_CONNECTIONS_VAR: &str = "TEAMTASK_MAX_CONNECTIONS";

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// How join-table inserts treat a pair that already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinPolicy {
    /// Insert unconditionally; a repeated pair produces a duplicate row
    #[default]
    AllowDuplicates,
    /// Insert only when the `(left, right)` pair is not present yet
    Deduplicate,
}

/// Configuration for the entity store
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// SQLite database URL (`sqlite::memory:`, `sqlite://tasks.db`, ...)
    pub database_url: String,
    /// Upper bound of pooled connections (in-memory databases always use one)
    pub max_connections: u32,
    /// Join-table insert policy
    pub join_policy: JoinPolicy,
}

impl StoreConfig {
    /// Create a new configuration builder
    pub fn builder(database_url: impl Into<String>) -> StoreConfigBuilder {
        StoreConfigBuilder::new(database_url)
    }

    /// Configuration for a private in-memory database
    pub fn in_memory() -> Self {
        Self::builder("sqlite::memory:").build()
    }

    /// Load the configuration from `DATABASE_URL` and `TEAMTASK_MAX_CONNECTIONS`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup(DATABASE_URL_VAR)
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| StoreError::config(format!("{} is not set", DATABASE_URL_VAR)))?;

        let mut builder = Self::builder(database_url);
        if let Some(raw) = lookup(MAX_CONNECTIONS_VAR) {
            let max = raw.trim().parse::<u32>().map_err(|e| {
                StoreError::config(format!("{} must be a positive integer: {}", MAX_CONNECTIONS_VAR, e))
            })?;
            if max == 0 {
                return Err(StoreError::config(format!(
                    "{} must be greater than zero",
                    MAX_CONNECTIONS_VAR
                )));
            }
            builder = builder.max_connections(max);
        }

        Ok(builder.build())
    }

    /// Whether the URL points at an in-memory SQLite database
    pub fn is_in_memory(&self) -> bool {
        self.database_url.contains(":memory:") || self.database_url.contains("mode=memory")
    }
}

/// Builder for StoreConfig
#[derive(Debug)]
pub struct StoreConfigBuilder {
    database_url: String,
    max_connections: u32,
    join_policy: JoinPolicy,
}

impl StoreConfigBuilder {
    /// Create a new builder with the database URL
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            join_policy: JoinPolicy::default(),
        }
    }

    /// Set the pool size (default: 5)
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Set the join-table insert policy (default: allow duplicates)
    pub fn join_policy(mut self, policy: JoinPolicy) -> Self {
        self.join_policy = policy;
        self
    }

    /// Skip join-table inserts for pairs that already exist
    pub fn deduplicate_join_rows(mut self) -> Self {
        self.join_policy = JoinPolicy::Deduplicate;
        self
    }

    /// Build the configuration
    pub fn build(self) -> StoreConfig {
        StoreConfig {
            database_url: self.database_url,
            max_connections: self.max_connections,
            join_policy: self.join_policy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    // =========================================================================
    // Builder Tests
    // =========================================================================

    #[test]
    fn test_default_config() {
        let config = StoreConfig::builder("sqlite://tasks.db").build();

        assert_eq!(config.database_url, "sqlite://tasks.db");
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.join_policy, JoinPolicy::AllowDuplicates);
    }

    #[test]
    fn test_builder_accepts_string() {
        let config = StoreConfig::builder(String::from("sqlite://db")).build();
        assert_eq!(config.database_url, "sqlite://db");
    }

    #[test]
    fn test_full_custom_config() {
        let config = StoreConfig::builder("sqlite://tasks.db")
            .max_connections(12)
            .deduplicate_join_rows()
            .build();

        assert_eq!(config.max_connections, 12);
        assert_eq!(config.join_policy, JoinPolicy::Deduplicate);
    }

    #[test]
    fn test_join_policy_setter() {
        let config = StoreConfig::builder("sqlite://tasks.db")
            .deduplicate_join_rows()
            .join_policy(JoinPolicy::AllowDuplicates)
            .build();

        assert_eq!(config.join_policy, JoinPolicy::AllowDuplicates);
    }

    // =========================================================================
    // In-memory Detection Tests
    // =========================================================================

    #[test]
    fn test_in_memory() {
        assert!(StoreConfig::in_memory().is_in_memory());
        assert!(StoreConfig::builder("sqlite://file:tasks?mode=memory").build().is_in_memory());
        assert!(!StoreConfig::builder("sqlite://tasks.db").build().is_in_memory());
    }

    // =========================================================================
    // Environment Tests
    // =========================================================================

    #[test]
    fn test_from_lookup_requires_url() {
        let err = StoreConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));

        let err = StoreConfig::from_lookup(lookup_from(&[("DATABASE_URL", "  ")])).unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
    }

    #[test]
    fn test_from_lookup_reads_pool_size() {
        let config = StoreConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "sqlite://tasks.db"),
            ("TEAMTASK_MAX_CONNECTIONS", "3"),
        ]))
        .unwrap();

        assert_eq!(config.database_url, "sqlite://tasks.db");
        assert_eq!(config.max_connections, 3);
    }

    #[test]
    fn test_from_lookup_rejects_bad_pool_size() {
        let err = StoreConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "sqlite://tasks.db"),
            ("TEAMTASK_MAX_CONNECTIONS", "many"),
        ]))
        .unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));

        let err = StoreConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "sqlite://tasks.db"),
            ("TEAMTASK_MAX_CONNECTIONS", "0"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("greater than zero"));
    }

    #[test]
    fn test_config_debug() {
        let config = StoreConfig::in_memory();
        let debug_str = format!("{:?}", config);
        assert!(debug_str.contains("StoreConfig"));
        assert!(debug_str.contains("join_policy"));
    }
}
