//! # Pool Settings
//!
//! Canonical pool-tuning configuration, bound from the `pool.` namespace of a
//! provisioning dictionary. Property names follow the pooled-JMS convention
//! configuration authors already know, so existing dictionaries keep working.

use serde::{Deserialize, Serialize};

use crate::config::{Bindable, PropertySchema};

/// Tuning knobs forwarded to the pooling composer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSettings {
    pub max_connections: i32,
    pub max_sessions_per_connection: i32,
    /// Idle time in milliseconds before a pooled connection is eligible for
    /// eviction
    pub connection_idle_timeout: i32,
    /// Interval in milliseconds between liveness sweeps; zero disables them
    pub connection_check_interval: i64,
    pub block_if_session_pool_is_full: bool,
    /// How long a blocked session request waits, in milliseconds; negative
    /// means indefinitely
    pub block_if_session_pool_is_full_timeout: i64,
    pub use_anonymous_producers: bool,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 1,
            max_sessions_per_connection: 500,
            connection_idle_timeout: 30_000,
            connection_check_interval: 0,
            block_if_session_pool_is_full: true,
            block_if_session_pool_is_full_timeout: -1,
            use_anonymous_producers: true,
        }
    }
}

impl Bindable for PoolSettings {
    fn schema() -> PropertySchema<Self> {
        PropertySchema::<Self>::builder()
            .int("maxConnections", |s, v| s.max_connections = v)
            .int("maxSessionsPerConnection", |s, v| {
                s.max_sessions_per_connection = v;
            })
            .int("connectionIdleTimeout", |s, v| s.connection_idle_timeout = v)
            .long("connectionCheckInterval", |s, v| {
                s.connection_check_interval = v;
            })
            .bool("blockIfSessionPoolIsFull", |s, v| {
                s.block_if_session_pool_is_full = v;
            })
            .long("blockIfSessionPoolIsFullTimeout", |s, v| {
                s.block_if_session_pool_is_full_timeout = v;
            })
            .bool("useAnonymousProducers", |s, v| s.use_anonymous_producers = v)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{configure, ConfigMap};
    use crate::error::ProvisionError;

    #[test]
    fn test_binding_from_pool_namespace_view() {
        let cfg = ConfigMap::from_pairs([
            ("name", "testCF"),
            ("pool.maxConnections", "8"),
            ("pool.connectionIdleTimeout", "60000"),
            ("pool.useAnonymousProducers", "false"),
        ]);

        let mut settings = PoolSettings::default();
        configure(&mut settings, &cfg.pool_properties()).unwrap();

        assert_eq!(settings.max_connections, 8);
        assert_eq!(settings.connection_idle_timeout, 60_000);
        assert!(!settings.use_anonymous_producers);
        // Untouched knobs keep their defaults
        assert_eq!(settings.max_sessions_per_connection, 500);
    }

    #[test]
    fn test_malformed_pool_value_leaves_defaults_intact() {
        let mut settings = PoolSettings::default();
        let err = configure(
            &mut settings,
            &ConfigMap::from_pairs([("maxConnections", "many")]),
        )
        .unwrap_err();

        assert!(matches!(err, ProvisionError::BindingFailure { .. }));
        assert_eq!(settings, PoolSettings::default());
    }
}
