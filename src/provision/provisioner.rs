//! # Factory Provisioning
//!
//! Orchestrates one provisioning run: decrypt the configuration, partition
//! it by namespace, build the provider factories, and, for pooled levels,
//! compose the final factory against the pool settings and the currently
//! selected transaction coordinator.
//!
//! ## Failure shape
//!
//! Collaborator failures during construction and composition are caught,
//! logged with their proximate message, and re-raised as a single
//! [`ProvisionError::ProvisioningFailure`] carrying the original cause.
//! Failures the core detects itself keep their own taxon: secrets problems
//! surface as decryption or alias errors, malformed pool values as binding
//! errors, and a missing coordinator for XA as
//! [`ProvisionError::ResourceUnavailable`]. Nothing is retried.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::config::{configure, ConfigMap};
use crate::constants::{events, keys};
use crate::error::{BoxError, ProvisionError, ProvisionResult};
use crate::events::EventPublisher;
use crate::logging::log_provision_operation;
use crate::registry::CoordinatorTracker;
use crate::secrets::Decryptor;

use super::pool::PoolSettings;
use super::traits::{
    ConnectionFactory, ConnectionFactorySource, PooledFactoryComposer, TransactionSupport,
};

/// Result of a successful provisioning run
pub struct ProvisionedFactory {
    /// Correlation id shared by the run's logs and events
    pub id: Uuid,
    /// Logical factory name from the reserved name key, if present
    pub name: Option<String>,
    pub support: TransactionSupport,
    pub factory: Arc<dyn ConnectionFactory>,
    pub provisioned_at: DateTime<Utc>,
}

impl fmt::Debug for ProvisionedFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProvisionedFactory")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("support", &self.support)
            .field("provider", &self.factory.provider())
            .field("provisioned_at", &self.provisioned_at)
            .finish()
    }
}

/// Provisions connection factories from flat configuration dictionaries
pub struct FactoryProvisioner {
    source: Arc<dyn ConnectionFactorySource>,
    composer: Arc<dyn PooledFactoryComposer>,
    tracker: Arc<CoordinatorTracker>,
    decryptor: Arc<Decryptor>,
    events: EventPublisher,
}

impl FactoryProvisioner {
    pub fn new(
        source: Arc<dyn ConnectionFactorySource>,
        composer: Arc<dyn PooledFactoryComposer>,
        tracker: Arc<CoordinatorTracker>,
        decryptor: Arc<Decryptor>,
        events: EventPublisher,
    ) -> Self {
        Self {
            source,
            composer,
            tracker,
            decryptor,
            events,
        }
    }

    /// Run one provisioning pass over `config` at the requested transaction
    /// support level.
    ///
    /// Safe to call concurrently; the only shared state read is the
    /// coordinator selection snapshot.
    #[instrument(skip(self, config), fields(support = support.as_str()))]
    pub fn provision(
        &self,
        config: &ConfigMap,
        support: TransactionSupport,
    ) -> ProvisionResult<ProvisionedFactory> {
        let provision_id = Uuid::new_v4();

        let outcome = self.provision_inner(config, support);
        match outcome {
            Ok((name, factory)) => {
                info!(
                    provision_id = %provision_id,
                    name = name.as_deref(),
                    provider = factory.provider(),
                    "✅ Provisioned connection factory"
                );
                log_provision_operation(
                    "provision",
                    Some(&provision_id.to_string()),
                    name.as_deref(),
                    "provisioned",
                    Some(factory.provider()),
                );
                self.publish_event(
                    events::FACTORY_PROVISIONED,
                    json!({
                        "provision_id": provision_id,
                        "name": name,
                        "support": support.as_str(),
                        "provider": factory.provider(),
                    }),
                );

                Ok(ProvisionedFactory {
                    id: provision_id,
                    name,
                    support,
                    factory,
                    provisioned_at: Utc::now(),
                })
            }
            Err(err) => {
                log_provision_operation(
                    "provision",
                    Some(&provision_id.to_string()),
                    None,
                    "failed",
                    Some(&err.to_string()),
                );
                self.publish_event(
                    events::FACTORY_PROVISION_FAILED,
                    json!({
                        "provision_id": provision_id,
                        "support": support.as_str(),
                        "error": err.to_string(),
                    }),
                );
                Err(err)
            }
        }
    }

    fn provision_inner(
        &self,
        config: &ConfigMap,
        support: TransactionSupport,
    ) -> ProvisionResult<(Option<String>, Arc<dyn ConnectionFactory>)> {
        let resolved = self.decryptor.decrypt(config)?;
        let name = resolved
            .get(keys::CONNECTION_FACTORY_NAME)
            .map(str::to_string);
        let plain = resolved.plain_properties();

        let base = self
            .source
            .create_connection_factory(&plain)
            .map_err(|err| self.collaborator_failure("connection factory construction", err))?;

        let xa = if support.requires_coordinator() {
            let xa = self
                .source
                .create_xa_connection_factory(&plain)
                .map_err(|err| {
                    self.collaborator_failure("XA connection factory construction", err)
                })?;
            Some(xa)
        } else {
            None
        };

        if !support.is_pooled() {
            return Ok((name, base));
        }

        let mut pool = PoolSettings::default();
        configure(&mut pool, &resolved.pool_properties())?;

        let coordinator = if support.requires_coordinator() {
            let coordinator = self.tracker.current().ok_or_else(|| {
                ProvisionError::resource_unavailable(
                    "XA support requested but no transaction coordinator is selected",
                )
            })?;
            Some(coordinator)
        } else {
            None
        };

        let factory = self
            .composer
            .compose(base, xa, support, coordinator, &pool)
            .map_err(|err| self.collaborator_failure("pooled factory composition", err))?;
        Ok((name, factory))
    }

    fn collaborator_failure(&self, stage: &str, err: BoxError) -> ProvisionError {
        error!(stage = %stage, cause = %err, "🔴 Provisioning collaborator failed");
        ProvisionError::provisioning_failure(format!("{stage} failed"), err)
    }

    fn publish_event(&self, name: &str, context: serde_json::Value) {
        if let Err(error) = self.events.publish(name, context) {
            warn!(%error, event = name, "Failed to publish provisioning event");
        }
    }
}
