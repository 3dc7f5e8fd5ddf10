#![allow(clippy::doc_markdown)] // Allow technical terms like XA, YAML in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Wireup Core Rust
//!
//! Rust core for provisioning pooled and XA-capable messaging connection
//! factories from dynamic configuration.
//!
//! ## Overview
//!
//! Wireup Core sits between flat provisioning dictionaries and the external
//! libraries that actually talk to brokers. It decrypts masked configuration
//! values, partitions properties by namespace, binds them onto typed targets,
//! tracks the single active transaction coordinator across a changing
//! registry, and orchestrates factory construction and pooled/XA composition
//! through injected collaborators. Broker communication, pooling internals,
//! and cipher implementations all live behind trait seams.
//!
//! ## Key Features
//!
//! - **Singleton coordinator tracking**: first-wins selection over a dynamic
//!   registry, with derived-service lifecycle tied to the selection
//! - **Declarative property binding**: schema-based setters with type
//!   coercion and all-or-nothing application
//! - **Secret resolution**: `ENC(...)` masked values with alias-keyed
//!   decryption backends registered at runtime
//! - **Uniform failure shape**: collaborator errors are logged and re-raised
//!   as one provisioning failure carrying the original cause
//!
//! ## Module Organization
//!
//! - [`config`] - Configuration capture, partitioning, and the property binder
//! - [`secrets`] - Masked-value decryption and the key ring
//! - [`registry`] - Coordinator tracking and registry event dispatch
//! - [`provision`] - Collaborator seams and the provisioning orchestration
//! - [`events`] - Lifecycle event broadcasting
//! - [`error`] - Structured error handling
//! - [`constants`] - Property namespaces, reserved keys, and event names
//! - [`logging`] - Structured logging bootstrap
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use wireup_core::config::ConfigMap;
//! use wireup_core::secrets::{Decryptor, KeyRing};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = ConfigMap::from_yaml_str(
//!     "name: testCF\nurl: tcp://broker:61616\npool.maxConnections: 8\n",
//! )?;
//!
//! let decryptor = Decryptor::new(Arc::new(KeyRing::new()));
//! let resolved = decryptor.decrypt(&cfg)?;
//!
//! assert_eq!(resolved.get("url"), Some("tcp://broker:61616"));
//! assert_eq!(resolved.pool_properties().get("maxConnections"), Some("8"));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod logging;
pub mod provision;
pub mod registry;
pub mod secrets;

pub use config::{configure, Bindable, ConfigMap, PropertySchema};
// Re-export constants events with different name to avoid conflict
pub use constants::events as system_events;
pub use error::{BoxError, ProvisionError, ProvisionResult};
pub use events::{EventPublisher, PublishedEvent};
pub use provision::{
    ConnectionFactory, ConnectionFactorySource, FactoryProvisioner, PoolSettings,
    PooledFactoryComposer, ProvisionedFactory, ServiceRegistrar, TransactionSupport,
    XaComposerRegistrar, XaConnectionFactory,
};
pub use registry::{
    CoordinatorRef, CoordinatorTracker, DerivedRegistration, DerivedServiceFactory, RegistryEvent,
    RegistryListener, RegistryWatcher, TransactionCoordinator,
};
pub use secrets::{Decryptor, KeyRing, SecretDecryptor};
