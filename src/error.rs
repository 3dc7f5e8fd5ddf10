//! # Provisioning Error Types
//!
//! Structured error handling for the provisioning pipeline using thiserror
//! instead of `Box<dyn Error>` patterns at the public surface.
//!
//! Collaborator failures (factory construction, composition, decryption) keep
//! their original cause attached as an error source, so callers can walk the
//! chain while still matching on a closed taxonomy. Selection-layer anomalies
//! (a second coordinator appearing, a stale removal) are handled in place and
//! never surface here.

use thiserror::Error;

/// Opaque failure reported by an external collaborator
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Provisioning pipeline error types
#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("Conflicting encryption key aliases in one configuration: {first} vs {second}")]
    AliasConflict { first: String, second: String },

    #[error("Decryption failed for configuration key {key}: {source}")]
    DecryptionFailure {
        key: String,
        #[source]
        source: BoxError,
    },

    #[error("Cannot bind property {key}={value}: {reason}")]
    BindingFailure {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Transaction coordinator unavailable: {message}")]
    ResourceUnavailable { message: String },

    #[error("Connection factory provisioning failed: {message}")]
    ProvisioningFailure {
        message: String,
        #[source]
        source: BoxError,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl ProvisionError {
    /// Create an alias conflict error
    pub fn alias_conflict(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self::AliasConflict {
            first: first.into(),
            second: second.into(),
        }
    }

    /// Create a decryption failure carrying the collaborator's cause
    pub fn decryption_failure(key: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::DecryptionFailure {
            key: key.into(),
            source: source.into(),
        }
    }

    /// Create a property binding failure
    pub fn binding_failure(
        key: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::BindingFailure {
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a coordinator unavailable error
    pub fn resource_unavailable(message: impl Into<String>) -> Self {
        Self::ResourceUnavailable {
            message: message.into(),
        }
    }

    /// Create a provisioning failure wrapping the collaborator's cause
    pub fn provisioning_failure(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::ProvisioningFailure {
            message: message.into(),
            source: source.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

/// Conversion from serde_json::Error for JSON configuration capture
impl From<serde_json::Error> for ProvisionError {
    fn from(err: serde_json::Error) -> Self {
        ProvisionError::configuration(err.to_string())
    }
}

/// Conversion from serde_yaml::Error for YAML configuration capture
impl From<serde_yaml::Error> for ProvisionError {
    fn from(err: serde_yaml::Error) -> Self {
        ProvisionError::configuration(err.to_string())
    }
}

/// Result type alias for provisioning operations
pub type ProvisionResult<T> = Result<T, ProvisionError>;
