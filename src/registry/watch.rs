//! Channel-fed dispatch of registry notifications to a listener

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument};

use super::tracker::{CoordinatorRef, RegistryListener};

/// A change in the set of registered transaction coordinators
#[derive(Clone)]
pub enum RegistryEvent {
    Appeared(CoordinatorRef),
    Removed(CoordinatorRef),
    Modified(CoordinatorRef),
}

impl RegistryEvent {
    pub fn coordinator(&self) -> &CoordinatorRef {
        match self {
            RegistryEvent::Appeared(c) | RegistryEvent::Removed(c) | RegistryEvent::Modified(c) => {
                c
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RegistryEvent::Appeared(_) => "appeared",
            RegistryEvent::Removed(_) => "removed",
            RegistryEvent::Modified(_) => "modified",
        }
    }
}

impl fmt::Debug for RegistryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RegistryEvent::{}({})", self.kind(), self.coordinator().name())
    }
}

/// Statistics about dispatched registry events
#[derive(Debug, Clone, Default)]
pub struct WatcherStats {
    pub events_dispatched: u64,
    pub appeared: u64,
    pub removed: u64,
    pub modified: u64,
    pub last_event_at: Option<DateTime<Utc>>,
}

/// Drains a channel of [`RegistryEvent`]s and dispatches them, in arrival
/// order, to a [`RegistryListener`] (normally the coordinator tracker).
///
/// The producing side of the channel belongs to whatever discovery adapter
/// the deployment runs; the watcher stops cleanly when every sender is
/// dropped.
pub struct RegistryWatcher {
    listener: Arc<dyn RegistryListener>,
    stats: Arc<RwLock<WatcherStats>>,
}

impl RegistryWatcher {
    pub fn new(listener: Arc<dyn RegistryListener>) -> Self {
        Self {
            listener,
            stats: Arc::new(RwLock::new(WatcherStats::default())),
        }
    }

    /// Get watcher statistics
    pub fn stats(&self) -> WatcherStats {
        self.stats.read().clone()
    }

    /// Dispatch events until the channel closes
    #[instrument(skip(self, events))]
    pub async fn run(&self, mut events: mpsc::Receiver<RegistryEvent>) {
        info!("Registry watcher started");

        while let Some(event) = events.recv().await {
            debug!(
                kind = event.kind(),
                coordinator = event.coordinator().name(),
                "Dispatching registry event"
            );

            match &event {
                RegistryEvent::Appeared(c) => self.listener.service_appeared(c),
                RegistryEvent::Removed(c) => self.listener.service_removed(c),
                RegistryEvent::Modified(c) => self.listener.service_modified(c),
            }

            let mut stats = self.stats.write();
            stats.events_dispatched += 1;
            match &event {
                RegistryEvent::Appeared(_) => stats.appeared += 1,
                RegistryEvent::Removed(_) => stats.removed += 1,
                RegistryEvent::Modified(_) => stats.modified += 1,
            }
            stats.last_event_at = Some(Utc::now());
        }

        info!("Registry event stream closed, watcher stopping");
    }
}
