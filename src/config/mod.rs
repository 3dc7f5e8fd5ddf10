//! # Configuration Capture and Binding
//!
//! Everything between a raw provisioning dictionary and a configured target
//! object: capture from JSON/YAML, namespace partitioning, and the typed
//! property binder.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use wireup_core::config::ConfigMap;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = ConfigMap::from_yaml_str(
//!     "name: testCF\nurl: tcp://broker:61616\npool.maxConnections: 8\n",
//! )?;
//!
//! let plain = cfg.plain_properties();
//! assert_eq!(plain.get("url"), Some("tcp://broker:61616"));
//! assert!(!plain.contains_key("name"));
//!
//! let pool = cfg.pool_properties();
//! assert_eq!(pool.get("maxConnections"), Some("8"));
//! # Ok(())
//! # }
//! ```

pub mod binder;
pub mod properties;

pub use binder::{configure, Bindable, PropertySchema, PropertySchemaBuilder};
pub use properties::ConfigMap;
