//! # Decryption Key Ring
//!
//! Runtime registry of decryption collaborators, keyed by alias.
//!
//! Deployments can run several decryption backends side by side (one per
//! team, per vault, per rotation generation). Masked configuration values
//! name the backend they were encrypted for through an embedded alias; values
//! without an alias use the default slot. Backends register and unregister
//! while the system is running, so the ring is concurrently mutable.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::error::BoxError;

/// Decryption collaborator for one key alias.
///
/// Implementations wrap whatever cipher the deployment uses; this crate never
/// interprets ciphertext itself.
pub trait SecretDecryptor: Send + Sync {
    /// Decrypt `ciphertext` to plaintext
    fn decrypt(&self, ciphertext: &str) -> Result<String, BoxError>;
}

/// Alias-keyed registry of decryption backends with a default slot
#[derive(Default)]
pub struct KeyRing {
    by_alias: DashMap<String, Arc<dyn SecretDecryptor>>,
    default: RwLock<Option<Arc<dyn SecretDecryptor>>>,
}

impl KeyRing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ring whose default slot is already populated
    pub fn with_default(decryptor: Arc<dyn SecretDecryptor>) -> Self {
        let ring = Self::new();
        ring.set_default(decryptor);
        ring
    }

    /// Install the decryptor used for masked values without an alias
    pub fn set_default(&self, decryptor: Arc<dyn SecretDecryptor>) {
        *self.default.write() = Some(decryptor);
        debug!("Installed default decryption backend");
    }

    /// Register a decryption backend under `alias`, replacing any previous
    /// registration for the same alias
    pub fn register_alias(&self, alias: impl Into<String>, decryptor: Arc<dyn SecretDecryptor>) {
        let alias = alias.into();
        info!(alias = %alias, "🔐 Registered decryption key alias");
        self.by_alias.insert(alias, decryptor);
    }

    /// Remove the backend registered under `alias`; returns whether one was
    /// present
    pub fn unregister_alias(&self, alias: &str) -> bool {
        let removed = self.by_alias.remove(alias).is_some();
        if removed {
            info!(alias = %alias, "Unregistered decryption key alias");
        }
        removed
    }

    /// Currently registered aliases, unordered
    pub fn aliases(&self) -> Vec<String> {
        self.by_alias.iter().map(|e| e.key().clone()).collect()
    }

    /// Look up the backend for `alias`, or the default when `None`
    pub fn resolve(&self, alias: Option<&str>) -> Option<Arc<dyn SecretDecryptor>> {
        match alias {
            Some(alias) => self.by_alias.get(alias).map(|entry| entry.value().clone()),
            None => self.default.read().clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticDecryptor {
        plaintext: &'static str,
    }

    impl SecretDecryptor for StaticDecryptor {
        fn decrypt(&self, _ciphertext: &str) -> Result<String, BoxError> {
            Ok(self.plaintext.to_string())
        }
    }

    #[test]
    fn test_alias_registration_and_resolution() {
        let ring = KeyRing::new();
        ring.register_alias("teamA", Arc::new(StaticDecryptor { plaintext: "a" }));

        let resolved = ring.resolve(Some("teamA")).unwrap();
        assert_eq!(resolved.decrypt("x").unwrap(), "a");
        assert!(ring.resolve(Some("teamB")).is_none());
    }

    #[test]
    fn test_default_slot_serves_unaliased_lookups() {
        let ring = KeyRing::new();
        assert!(ring.resolve(None).is_none());

        ring.set_default(Arc::new(StaticDecryptor { plaintext: "d" }));
        let resolved = ring.resolve(None).unwrap();
        assert_eq!(resolved.decrypt("x").unwrap(), "d");
    }

    #[test]
    fn test_unregister_removes_the_alias() {
        let ring = KeyRing::new();
        ring.register_alias("teamA", Arc::new(StaticDecryptor { plaintext: "a" }));

        assert!(ring.unregister_alias("teamA"));
        assert!(!ring.unregister_alias("teamA"));
        assert!(ring.resolve(Some("teamA")).is_none());
        assert!(ring.aliases().is_empty());
    }
}
