//! # Masked Value Resolution
//!
//! Detects and decrypts masked values in provisioning configuration.
//!
//! A masked value has the shape `ENC(<ciphertext>)` or
//! `ENC(<ciphertext>,<alias>)`. The alias names the decryption backend in the
//! [`KeyRing`](super::KeyRing); one configuration may use at most one alias
//! across all of its masked entries, and entries without an alias are served
//! by the same backend the aliased ones selected (or the ring's default when
//! nothing is aliased).
//!
//! Decryption rewrites the whole map into a new one with identical keys.
//! A backend failure aborts the rewrite; ciphertext never leaks through as a
//! fallback value.

use std::sync::Arc;

use tracing::debug;

use crate::config::ConfigMap;
use crate::constants::masking;
use crate::error::{ProvisionError, ProvisionResult};

use super::keyring::{KeyRing, SecretDecryptor};

/// Resolves masked configuration values through a [`KeyRing`]
pub struct Decryptor {
    keys: Arc<KeyRing>,
}

impl Decryptor {
    pub fn new(keys: Arc<KeyRing>) -> Self {
        Self { keys }
    }

    /// Convenience constructor for a single unaliased backend
    pub fn with_default(decryptor: Arc<dyn SecretDecryptor>) -> Self {
        Self::new(Arc::new(KeyRing::with_default(decryptor)))
    }

    /// Whether `value` is a masked value, by exact prefix and suffix match
    pub fn is_masked(value: &str) -> bool {
        value.starts_with(masking::MASK_PREFIX) && value.ends_with(masking::MASK_SUFFIX)
    }

    /// The single key alias used by `config`, if any.
    ///
    /// Scans every masked value; the payload after the first separator,
    /// trimmed, is a candidate. Masked values without an alias contribute no
    /// candidate and are compatible with any single alias. Two differing
    /// candidates are a hard error, reported before any decryption starts.
    pub fn alias_of(config: &ConfigMap) -> ProvisionResult<Option<String>> {
        let mut alias: Option<String> = None;

        for (_, value) in config.iter() {
            if !Self::is_masked(value) {
                continue;
            }
            let Some(candidate) = Self::split_masked(value).1 else {
                continue;
            };
            match &alias {
                None => alias = Some(candidate.to_string()),
                Some(existing) if existing != candidate => {
                    return Err(ProvisionError::alias_conflict(existing.clone(), candidate));
                }
                Some(_) => {}
            }
        }
        Ok(alias)
    }

    /// Rewrite `config` with every masked value decrypted.
    ///
    /// Returns a new map with the same key set: masked entries carry their
    /// plaintext, everything else passes through unchanged. A map without
    /// masked values comes back as an identical clone without touching the
    /// ring.
    pub fn decrypt(&self, config: &ConfigMap) -> ProvisionResult<ConfigMap> {
        let alias = Self::alias_of(config)?;

        let masked_keys: Vec<&str> = config
            .iter()
            .filter(|(_, value)| Self::is_masked(value))
            .map(|(key, _)| key)
            .collect();
        if masked_keys.is_empty() {
            return Ok(config.clone());
        }

        let backend = self.keys.resolve(alias.as_deref()).ok_or_else(|| {
            let reason = match alias.as_deref() {
                Some(alias) => format!("no decryption backend registered for alias {alias}"),
                None => "no default decryption backend registered".to_string(),
            };
            ProvisionError::decryption_failure(masked_keys[0], reason)
        })?;

        debug!(
            masked = masked_keys.len(),
            alias = alias.as_deref().unwrap_or("<default>"),
            "Decrypting masked configuration values"
        );

        let mut resolved = ConfigMap::new();
        for (key, value) in config.iter() {
            if Self::is_masked(value) {
                let (ciphertext, _) = Self::split_masked(value);
                let plaintext = backend
                    .decrypt(ciphertext)
                    .map_err(|err| ProvisionError::decryption_failure(key, err))?;
                resolved.insert(key, plaintext);
            } else {
                resolved.insert(key, value);
            }
        }
        Ok(resolved)
    }

    /// Split a masked value into (ciphertext, alias). The ciphertext is the
    /// payload before the first separator, the alias is the trimmed remainder.
    fn split_masked(value: &str) -> (&str, Option<&str>) {
        let payload = &value[masking::MASK_PREFIX.len()..value.len() - masking::MASK_SUFFIX.len()];
        match payload.find(masking::ALIAS_SEPARATOR) {
            Some(idx) => (&payload[..idx], Some(payload[idx + 1..].trim())),
            None => (payload, None),
        }
    }
}
