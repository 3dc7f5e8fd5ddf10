//! # XA Composer Registration
//!
//! The derived service created when a transaction coordinator is selected:
//! the pooling composer gets published through the deployment's
//! [`ServiceRegistrar`], keyed by that coordinator, so XA-capable consumers
//! outside this crate can discover it. When the coordinator disappears the
//! registration is withdrawn and the matching lifecycle event is emitted.

use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use crate::constants::events;
use crate::events::EventPublisher;
use crate::logging::log_registry_operation;
use crate::registry::{CoordinatorRef, DerivedRegistration, DerivedServiceFactory};

use super::traits::{PooledFactoryComposer, ServiceRegistrar};

#[derive(Serialize)]
struct CoordinatorEventPayload<'a> {
    coordinator: &'a str,
}

/// Publishes the pooling composer for the selected coordinator
pub struct XaComposerRegistrar {
    composer: Arc<dyn PooledFactoryComposer>,
    registrar: Arc<dyn ServiceRegistrar>,
    events: EventPublisher,
}

impl XaComposerRegistrar {
    pub fn new(
        composer: Arc<dyn PooledFactoryComposer>,
        registrar: Arc<dyn ServiceRegistrar>,
        events: EventPublisher,
    ) -> Self {
        Self {
            composer,
            registrar,
            events,
        }
    }

    fn publish_event(&self, name: &str, coordinator: &str) {
        let payload = CoordinatorEventPayload { coordinator };
        if let Err(error) = self.events.publish_payload(name, &payload) {
            warn!(%error, event = name, "Failed to publish coordinator lifecycle event");
        }
    }
}

impl DerivedServiceFactory for XaComposerRegistrar {
    fn create_service(&self, coordinator: &CoordinatorRef) -> Arc<dyn DerivedRegistration> {
        let inner = self
            .registrar
            .register_xa_composer(coordinator, self.composer.clone());

        log_registry_operation(
            "register_xa_composer",
            Some(coordinator.name()),
            "registered",
            None,
        );
        self.publish_event(events::COORDINATOR_SELECTED, coordinator.name());

        Arc::new(EventedRegistration {
            inner,
            events: self.events.clone(),
            coordinator: coordinator.name().to_string(),
        })
    }
}

/// Wraps the registrar's handle so withdrawal also emits the loss event
struct EventedRegistration {
    inner: Arc<dyn DerivedRegistration>,
    events: EventPublisher,
    coordinator: String,
}

impl DerivedRegistration for EventedRegistration {
    fn unregister(&self) {
        self.inner.unregister();

        log_registry_operation(
            "unregister_xa_composer",
            Some(&self.coordinator),
            "unregistered",
            None,
        );
        let payload = CoordinatorEventPayload {
            coordinator: &self.coordinator,
        };
        if let Err(error) = self
            .events
            .publish_payload(events::COORDINATOR_LOST, &payload)
        {
            warn!(%error, "Failed to publish coordinator lifecycle event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxError;
    use crate::provision::pool::PoolSettings;
    use crate::provision::traits::{ConnectionFactory, TransactionSupport, XaConnectionFactory};
    use crate::registry::TransactionCoordinator;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubCoordinator;

    impl TransactionCoordinator for StubCoordinator {
        fn name(&self) -> &str {
            "tm-1"
        }
    }

    struct NoopComposer;

    impl PooledFactoryComposer for NoopComposer {
        fn compose(
            &self,
            base: Arc<dyn ConnectionFactory>,
            _xa: Option<Arc<dyn XaConnectionFactory>>,
            _support: TransactionSupport,
            _coordinator: Option<CoordinatorRef>,
            _pool: &PoolSettings,
        ) -> Result<Arc<dyn ConnectionFactory>, BoxError> {
            Ok(base)
        }
    }

    struct CountingRegistrar {
        registered: AtomicUsize,
        unregistered: Arc<AtomicUsize>,
    }

    struct CountingHandle {
        unregistered: Arc<AtomicUsize>,
    }

    impl DerivedRegistration for CountingHandle {
        fn unregister(&self) {
            self.unregistered.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl ServiceRegistrar for CountingRegistrar {
        fn register_xa_composer(
            &self,
            _coordinator: &CoordinatorRef,
            _composer: Arc<dyn PooledFactoryComposer>,
        ) -> Arc<dyn DerivedRegistration> {
            self.registered.fetch_add(1, Ordering::SeqCst);
            Arc::new(CountingHandle {
                unregistered: self.unregistered.clone(),
            })
        }
    }

    #[tokio::test]
    async fn test_registration_publishes_selection_and_loss_events() {
        let publisher = EventPublisher::new(8);
        let mut rx = publisher.subscribe();
        let registrar = Arc::new(CountingRegistrar {
            registered: AtomicUsize::new(0),
            unregistered: Arc::new(AtomicUsize::new(0)),
        });

        let factory =
            XaComposerRegistrar::new(Arc::new(NoopComposer), registrar.clone(), publisher);
        let coordinator: CoordinatorRef = Arc::new(StubCoordinator);

        let registration = factory.create_service(&coordinator);
        assert_eq!(registrar.registered.load(Ordering::SeqCst), 1);

        let selected = rx.recv().await.unwrap();
        assert_eq!(selected.name, events::COORDINATOR_SELECTED);
        assert_eq!(selected.context["coordinator"], "tm-1");

        registration.unregister();
        assert_eq!(registrar.unregistered.load(Ordering::SeqCst), 1);

        let lost = rx.recv().await.unwrap();
        assert_eq!(lost.name, events::COORDINATOR_LOST);
        assert_eq!(lost.context["coordinator"], "tm-1");
    }
}
