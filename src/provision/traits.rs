//! # Provisioning Collaborator Seams
//!
//! Trait boundaries between the provisioning core and the external libraries
//! it orchestrates. Everything behind these traits is a black box: provider
//! connection-factory construction, pooling/XA composition, and the registry
//! surface where the derived XA composer is published. The core never
//! implements them beyond test doubles.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::ConfigMap;
use crate::error::BoxError;
use crate::registry::{CoordinatorRef, DerivedRegistration};

use super::pool::PoolSettings;

/// Transaction participation level requested for a provisioned factory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionSupport {
    /// Plain factory, no pooling
    None,
    /// Pooled factory with local transactions
    Local,
    /// Pooled factory enlisted with the selected transaction coordinator
    Xa,
}

impl TransactionSupport {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionSupport::None => "none",
            TransactionSupport::Local => "local",
            TransactionSupport::Xa => "xa",
        }
    }

    /// Whether this level routes through the pooling composer
    pub fn is_pooled(&self) -> bool {
        !matches!(self, TransactionSupport::None)
    }

    /// Whether this level requires the selected coordinator
    pub fn requires_coordinator(&self) -> bool {
        matches!(self, TransactionSupport::Xa)
    }
}

/// A provisioned messaging connection factory
pub trait ConnectionFactory: Send + Sync {
    /// Messaging provider this factory connects to, for logs and events
    fn provider(&self) -> &str;
}

/// XA-capable connection factory used for transactional composition
pub trait XaConnectionFactory: Send + Sync {
    fn provider(&self) -> &str;
}

/// Provider-specific construction of connection factories from plain
/// properties.
///
/// Implementations receive only the plain property view; pool-namespaced and
/// discovery-namespaced keys never reach them.
pub trait ConnectionFactorySource: Send + Sync {
    fn create_connection_factory(
        &self,
        props: &ConfigMap,
    ) -> Result<Arc<dyn ConnectionFactory>, BoxError>;

    fn create_xa_connection_factory(
        &self,
        props: &ConfigMap,
    ) -> Result<Arc<dyn XaConnectionFactory>, BoxError>;
}

/// Pooling and XA composition library.
///
/// `coordinator` is present exactly when `support` requires one; the XA
/// factory is present for XA composition.
pub trait PooledFactoryComposer: Send + Sync {
    fn compose(
        &self,
        base: Arc<dyn ConnectionFactory>,
        xa: Option<Arc<dyn XaConnectionFactory>>,
        support: TransactionSupport,
        coordinator: Option<CoordinatorRef>,
        pool: &PoolSettings,
    ) -> Result<Arc<dyn ConnectionFactory>, BoxError>;
}

/// Registry surface where the derived XA composer is published.
///
/// The registration is keyed by the coordinator instance and stays live
/// until its handle is unregistered.
pub trait ServiceRegistrar: Send + Sync {
    fn register_xa_composer(
        &self,
        coordinator: &CoordinatorRef,
        composer: Arc<dyn PooledFactoryComposer>,
    ) -> Arc<dyn DerivedRegistration>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_support_levels() {
        assert!(!TransactionSupport::None.is_pooled());
        assert!(TransactionSupport::Local.is_pooled());
        assert!(TransactionSupport::Xa.is_pooled());

        assert!(!TransactionSupport::None.requires_coordinator());
        assert!(!TransactionSupport::Local.requires_coordinator());
        assert!(TransactionSupport::Xa.requires_coordinator());
    }

    #[test]
    fn test_transaction_support_serializes_snake_case() {
        let json = serde_json::to_string(&TransactionSupport::Xa).unwrap();
        assert_eq!(json, "\"xa\"");
        assert_eq!(TransactionSupport::Local.as_str(), "local");
    }
}
