//! # Transaction Coordinator Tracking
//!
//! Singleton selection over a dynamically changing set of transaction
//! coordinators.
//!
//! Deployments may expose several coordination services, but XA composition
//! must bind to exactly one. The tracker selects the first coordinator that
//! appears and holds it until that same instance disappears; later arrivals
//! are ignored with a warning rather than causing a failover. Identity is
//! pointer identity of the registered instance, never value equality, so two
//! coordinators that happen to describe themselves identically are still
//! distinct.
//!
//! On selection a derived service is created through the configured
//! [`DerivedServiceFactory`]; on loss of the selected coordinator that
//! service is torn down exactly once. Both the creation hook and the
//! teardown run outside the selection lock, so slow collaborators never
//! block unrelated registry notifications.

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::constants::events;
use crate::events::EventPublisher;

/// An opaque transaction coordination service discovered at runtime
pub trait TransactionCoordinator: Send + Sync {
    /// Short human-readable identifier for logs and events
    fn name(&self) -> &str;
}

/// Shared handle to a registered coordinator; identity is `Arc::ptr_eq`
pub type CoordinatorRef = Arc<dyn TransactionCoordinator>;

/// Registry notifications consumed by the tracker.
///
/// Adapters feed these from whatever discovery mechanism the deployment
/// uses; notifications may arrive on arbitrary threads.
pub trait RegistryListener: Send + Sync {
    fn service_appeared(&self, coordinator: &CoordinatorRef);
    fn service_removed(&self, coordinator: &CoordinatorRef);
    fn service_modified(&self, coordinator: &CoordinatorRef);
}

/// Live handle to a service derived from the selected coordinator
pub trait DerivedRegistration: Send + Sync {
    /// Withdraw the derived service. Called exactly once per registration.
    fn unregister(&self);
}

/// Creates the derived service when a coordinator is selected
pub trait DerivedServiceFactory: Send + Sync {
    fn create_service(&self, coordinator: &CoordinatorRef) -> Arc<dyn DerivedRegistration>;
}

#[derive(Default)]
struct Selection {
    coordinator: Option<CoordinatorRef>,
    registration: Option<Arc<dyn DerivedRegistration>>,
}

/// First-wins tracker of the active transaction coordinator
pub struct CoordinatorTracker {
    factory: Arc<dyn DerivedServiceFactory>,
    selection: Mutex<Selection>,
    publisher: Option<EventPublisher>,
}

impl CoordinatorTracker {
    pub fn new(factory: Arc<dyn DerivedServiceFactory>) -> Self {
        Self {
            factory,
            selection: Mutex::new(Selection::default()),
            publisher: None,
        }
    }

    /// Tracker that additionally announces ignored arrivals on the event bus
    pub fn with_event_publisher(
        factory: Arc<dyn DerivedServiceFactory>,
        publisher: EventPublisher,
    ) -> Self {
        Self {
            factory,
            selection: Mutex::new(Selection::default()),
            publisher: Some(publisher),
        }
    }

    /// Consistent snapshot of the selected coordinator
    pub fn current(&self) -> Option<CoordinatorRef> {
        self.selection.lock().coordinator.clone()
    }

    /// Offer a newly appeared coordinator.
    ///
    /// The first coordinator wins and its derived registration is returned;
    /// any later arrival is ignored with a warning while a selection is
    /// held. The creation hook runs after the selection lock is released.
    pub fn coordinator_appeared(
        &self,
        coordinator: &CoordinatorRef,
    ) -> Option<Arc<dyn DerivedRegistration>> {
        {
            let mut selection = self.selection.lock();
            if let Some(active) = &selection.coordinator {
                let active = active.name().to_string();
                drop(selection);
                warn!(
                    active = %active,
                    ignored = coordinator.name(),
                    "Another transaction coordinator appeared while one is selected. Ignoring it."
                );
                self.publish_ignored(coordinator.name(), &active);
                return None;
            }
            selection.coordinator = Some(coordinator.clone());
        }

        info!(
            coordinator = coordinator.name(),
            "🎯 Selected transaction coordinator"
        );
        let registration = self.factory.create_service(coordinator);

        // The selection may have been cleared while the hook ran; the
        // derived service must not outlive the selection that caused it.
        let stale = {
            let mut selection = self.selection.lock();
            match &selection.coordinator {
                Some(active) if Arc::ptr_eq(active, coordinator) => {
                    selection.registration = Some(registration.clone());
                    false
                }
                _ => true,
            }
        };
        if stale {
            debug!(
                coordinator = coordinator.name(),
                "Coordinator disappeared during derived service creation, tearing it down"
            );
            registration.unregister();
            return None;
        }
        Some(registration)
    }

    /// Handle removal of a coordinator.
    ///
    /// Only the removal of the instance currently selected has any effect:
    /// the selection empties and the derived registration is torn down after
    /// the lock is released. Removals of unknown or previously rejected
    /// instances are ignored.
    pub fn coordinator_removed(&self, coordinator: &CoordinatorRef) {
        let registration = {
            let mut selection = self.selection.lock();
            match &selection.coordinator {
                Some(active) if Arc::ptr_eq(active, coordinator) => {
                    selection.coordinator = None;
                    selection.registration.take()
                }
                _ => {
                    debug!(
                        coordinator = coordinator.name(),
                        "Ignoring removal of an unselected coordinator"
                    );
                    return;
                }
            }
        };

        info!(
            coordinator = coordinator.name(),
            "🔴 Selected transaction coordinator removed"
        );
        if let Some(registration) = registration {
            registration.unregister();
        }
    }

    /// Property changes never affect the selection; identity is what is
    /// tracked, not metadata.
    pub fn coordinator_modified(&self, coordinator: &CoordinatorRef) {
        debug!(
            coordinator = coordinator.name(),
            "Coordinator properties changed, selection unaffected"
        );
    }

    /// Drop any selection and tear down the derived registration. Used when
    /// the surrounding system shuts down tracking altogether.
    pub fn shutdown(&self) {
        let (coordinator, registration) = {
            let mut selection = self.selection.lock();
            (selection.coordinator.take(), selection.registration.take())
        };

        if let Some(coordinator) = &coordinator {
            info!(
                coordinator = coordinator.name(),
                "Shutting down coordinator tracking"
            );
        }
        if let Some(registration) = registration {
            registration.unregister();
        }
    }

    fn publish_ignored(&self, ignored: &str, active: &str) {
        let Some(publisher) = &self.publisher else {
            return;
        };
        let payload = json!({ "ignored": ignored, "active": active });
        if let Err(error) = publisher.publish(events::COORDINATOR_IGNORED, payload) {
            debug!(%error, "Failed to publish coordinator event");
        }
    }
}

impl RegistryListener for CoordinatorTracker {
    fn service_appeared(&self, coordinator: &CoordinatorRef) {
        self.coordinator_appeared(coordinator);
    }

    fn service_removed(&self, coordinator: &CoordinatorRef) {
        self.coordinator_removed(coordinator);
    }

    fn service_modified(&self, coordinator: &CoordinatorRef) {
        self.coordinator_modified(coordinator);
    }
}
