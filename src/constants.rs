//! # System Constants
//!
//! Property namespaces, reserved keys, masked-value syntax, and lifecycle
//! event names shared across the provisioning pipeline.
//!
//! The string values here are wire-compatible with the flat property
//! dictionaries produced by existing deployment tooling, so renaming any of
//! them is a breaking change for configuration authors.

/// Namespace prefixes that partition a flat configuration dictionary
pub mod namespaces {
    /// Keys forwarded to the pooling layer, prefix stripped
    pub const POOL_PREFIX: &str = "pool.";

    /// Keys reserved for factory discovery by an outer consumer, never
    /// forwarded to connection-factory construction
    pub const FACTORY_PREFIX: &str = "factory.";
}

/// Well-known connection-factory property keys
pub mod keys {
    /// Logical name of the provisioned factory; stripped from the plain
    /// property view and carried as metadata instead
    pub const CONNECTION_FACTORY_NAME: &str = "name";

    pub const USER: &str = "user";
    pub const PASSWORD: &str = "password";
    pub const URL: &str = "url";
    pub const TYPE: &str = "type";
}

/// Masked-value syntax for encrypted configuration entries
pub mod masking {
    /// A masked value is `ENC(<ciphertext>)` or `ENC(<ciphertext>,<alias>)`
    pub const MASK_PREFIX: &str = "ENC(";
    pub const MASK_SUFFIX: &str = ")";

    /// Separates the ciphertext from the optional key alias
    pub const ALIAS_SEPARATOR: char = ',';
}

/// Lifecycle events emitted by the provisioning core
pub mod events {
    // Coordinator selection events
    pub const COORDINATOR_SELECTED: &str = "coordinator.selected";
    pub const COORDINATOR_IGNORED: &str = "coordinator.ignored";
    pub const COORDINATOR_LOST: &str = "coordinator.lost";

    // Factory provisioning events
    pub const FACTORY_PROVISIONED: &str = "factory.provisioned";
    pub const FACTORY_PROVISION_FAILED: &str = "factory.provision_failed";
}

/// System-wide constants
pub mod system {
    /// Version compatibility marker
    pub const WIREUP_CORE_VERSION: &str = "0.1.0";

    /// Default capacity of the lifecycle event channel
    pub const DEFAULT_EVENT_CAPACITY: usize = 1000;
}
