//! # Configuration Properties
//!
//! Flat string-keyed configuration dictionaries and the namespace
//! partitioning that routes entries to the right consumer.
//!
//! A provisioning dictionary mixes three audiences in one flat map:
//! connection-factory properties, `pool.`-prefixed pooling properties, and
//! `factory.`-prefixed discovery properties consumed outside this crate.
//! [`ConfigMap`] keeps the raw map immutable and produces a fresh projection
//! per audience, so each pipeline stage can be inspected independently.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::{keys, namespaces};
use crate::error::{ProvisionError, ProvisionResult};

/// Flat string-to-string configuration mapping.
///
/// Backed by a `BTreeMap` so iteration order, and therefore log output and
/// conflict reporting, is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigMap {
    entries: BTreeMap<String, String>,
}

impl ConfigMap {
    /// Create an empty configuration map
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from key/value pairs
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Capture a flat JSON object as configuration.
    ///
    /// Scalar values are stringified (`2000` becomes `"2000"`, `true` becomes
    /// `"true"`); nested arrays and objects are rejected because provisioning
    /// dictionaries are flat by contract.
    pub fn from_json_value(value: &serde_json::Value) -> ProvisionResult<Self> {
        let object = value.as_object().ok_or_else(|| {
            ProvisionError::configuration("configuration capture expects a JSON object")
        })?;

        let mut entries = BTreeMap::new();
        for (key, value) in object {
            entries.insert(key.clone(), json_scalar(key, value)?);
        }
        Ok(Self { entries })
    }

    /// Capture a flat YAML document as configuration.
    ///
    /// Same scalar rules as [`ConfigMap::from_json_value`]; provisioning
    /// configs ship as flat property files.
    pub fn from_yaml_str(yaml: &str) -> ProvisionResult<Self> {
        let mapping: serde_yaml::Mapping = serde_yaml::from_str(yaml)?;

        let mut entries = BTreeMap::new();
        for (key, value) in &mapping {
            let key = key.as_str().ok_or_else(|| {
                ProvisionError::configuration("configuration keys must be strings")
            })?;
            entries.insert(key.to_string(), yaml_scalar(key, value)?);
        }
        Ok(Self { entries })
    }

    /// Insert an entry, returning the previous value for the key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterate keys in order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Project the entries under `prefix` into a new map with the prefix
    /// stripped from every key. The source map is unchanged.
    pub fn prefixed(&self, prefix: &str) -> ConfigMap {
        let entries = self
            .entries
            .iter()
            .filter_map(|(key, value)| {
                key.strip_prefix(prefix)
                    .map(|stripped| (stripped.to_string(), value.clone()))
            })
            .collect();
        ConfigMap { entries }
    }

    /// Pooling configuration: `pool.`-prefixed entries, prefix stripped
    pub fn pool_properties(&self) -> ConfigMap {
        self.prefixed(namespaces::POOL_PREFIX)
    }

    /// Factory discovery configuration: `factory.`-prefixed entries, prefix
    /// stripped. Reserved for a consumer outside this crate and surfaced
    /// untouched otherwise.
    pub fn factory_properties(&self) -> ConfigMap {
        self.prefixed(namespaces::FACTORY_PREFIX)
    }

    /// Connection-factory configuration: everything that is neither
    /// pool-namespaced, factory-namespaced, nor the reserved name key.
    ///
    /// This is the view handed to connection-factory construction; provider
    /// libraries tend to reject or misbind keys meant for other audiences,
    /// so those never reach them.
    pub fn plain_properties(&self) -> ConfigMap {
        let entries = self
            .entries
            .iter()
            .filter(|(key, _)| {
                !key.starts_with(namespaces::POOL_PREFIX)
                    && !key.starts_with(namespaces::FACTORY_PREFIX)
                    && key.as_str() != keys::CONNECTION_FACTORY_NAME
            })
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        ConfigMap { entries }
    }
}

impl FromIterator<(String, String)> for ConfigMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ConfigMap {
    type Item = (String, String);
    type IntoIter = std::collections::btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Extend<(String, String)> for ConfigMap {
    fn extend<I: IntoIterator<Item = (String, String)>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

fn json_scalar(key: &str, value: &serde_json::Value) -> ProvisionResult<String> {
    match value {
        serde_json::Value::String(s) => Ok(s.clone()),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Bool(b) => Ok(b.to_string()),
        _ => Err(ProvisionError::configuration(format!(
            "property {key} must be a scalar value"
        ))),
    }
}

fn yaml_scalar(key: &str, value: &serde_yaml::Value) -> ProvisionResult<String> {
    match value {
        serde_yaml::Value::String(s) => Ok(s.clone()),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        _ => Err(ProvisionError::configuration(format!(
            "property {key} must be a scalar value"
        ))),
    }
}
