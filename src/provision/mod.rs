//! # Connection Factory Provisioning
//!
//! The orchestration layer: collaborator seams, pool settings, the XA
//! composer registration hook, and the provisioner that ties decryption,
//! partitioning, construction, and composition into one run.
//!
//! ```text
//! ConfigMap ──decrypt──▶ plain props ──▶ ConnectionFactorySource
//!              │                              │
//!              └─ pool props ─▶ PoolSettings  ▼
//!                                  └──▶ PooledFactoryComposer ──▶ ProvisionedFactory
//!                                            ▲
//!                      CoordinatorTracker ───┘ (XA only)
//! ```

pub mod pool;
pub mod provisioner;
pub mod traits;
pub mod xa;

pub use pool::PoolSettings;
pub use provisioner::{FactoryProvisioner, ProvisionedFactory};
pub use traits::{
    ConnectionFactory, ConnectionFactorySource, PooledFactoryComposer, ServiceRegistrar,
    TransactionSupport, XaConnectionFactory,
};
pub use xa::XaComposerRegistrar;
