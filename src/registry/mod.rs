//! # Registry Infrastructure
//!
//! Tracking of dynamically registered transaction coordinators.
//!
//! ## Overview
//!
//! Coordinators come and go at runtime through whatever discovery mechanism
//! the deployment uses. This module keeps the provisioning core decoupled
//! from that mechanism: an adapter feeds [`RegistryEvent`]s into a
//! [`RegistryWatcher`], which dispatches them to the [`CoordinatorTracker`],
//! the first-wins singleton selection every XA provisioning decision reads.
//!
//! ## Architecture
//!
//! ```text
//! discovery adapter ──mpsc──▶ RegistryWatcher ──▶ CoordinatorTracker
//!                                                    │
//!                                                    ├─ current()   (provisioning reads)
//!                                                    └─ DerivedServiceFactory hook
//! ```

pub mod tracker;
pub mod watch;

pub use tracker::{
    CoordinatorRef, CoordinatorTracker, DerivedRegistration, DerivedServiceFactory,
    RegistryListener, TransactionCoordinator,
};
pub use watch::{RegistryEvent, RegistryWatcher, WatcherStats};
