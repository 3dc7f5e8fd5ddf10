//! # Property Binder
//!
//! Maps flat string-keyed configuration onto typed targets.
//!
//! Targets declare their bindable surface as an explicit [`PropertySchema`]
//! of typed setters, one per property name, covering the four scalar kinds
//! configuration can carry: `i32`, `i64`, `bool`, and `String`. Every name is
//! reachable under its declared spelling and the variant with the first
//! letter lowercased, so `CCSID` and `cCSID` resolve to the same setter.
//!
//! Binding is two-phase. All values are coerced before any setter runs, so a
//! malformed value aborts the whole call and leaves the target exactly as it
//! was. Unknown keys are skipped with a warning; configuration dictionaries
//! are shared across heterogeneous targets and routinely carry keys meant
//! for someone else.

use std::collections::HashMap;

use tracing::warn;

use crate::config::properties::ConfigMap;
use crate::error::{ProvisionError, ProvisionResult};

/// Typed setter for one declared property
enum Setter<T> {
    Int(fn(&mut T, i32)),
    Long(fn(&mut T, i64)),
    Bool(fn(&mut T, bool)),
    Str(fn(&mut T, String)),
}

impl<T> Clone for Setter<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Setter<T> {}

/// A setter paired with its already-coerced value, ready to apply
enum Bound<T> {
    Int(fn(&mut T, i32), i32),
    Long(fn(&mut T, i64), i64),
    Bool(fn(&mut T, bool), bool),
    Str(fn(&mut T, String), String),
}

impl<T> Bound<T> {
    fn apply(self, target: &mut T) {
        match self {
            Bound::Int(setter, value) => setter(target, value),
            Bound::Long(setter, value) => setter(target, value),
            Bound::Bool(setter, value) => setter(target, value),
            Bound::Str(setter, value) => setter(target, value),
        }
    }
}

/// Declared bindable surface of a target type
pub struct PropertySchema<T> {
    setters: HashMap<String, Setter<T>>,
}

impl<T> PropertySchema<T> {
    pub fn builder() -> PropertySchemaBuilder<T> {
        PropertySchemaBuilder {
            setters: HashMap::new(),
        }
    }

    /// Whether `key` resolves to a declared setter
    pub fn declares(&self, key: &str) -> bool {
        self.setters.contains_key(key)
    }

    /// Bind every matching entry of `props` onto `target`.
    ///
    /// Unknown keys are warned and skipped. A coercion failure aborts before
    /// anything is applied and reports the offending key and value.
    pub fn configure(&self, target: &mut T, props: &ConfigMap) -> ProvisionResult<()> {
        let mut staged = Vec::with_capacity(props.len());

        for (key, value) in props.iter() {
            let Some(setter) = self.setters.get(key) else {
                warn!(property = key, "Skipping unknown configuration property");
                continue;
            };

            let bound = match *setter {
                Setter::Int(apply) => Bound::Int(apply, parse_number(key, value)?),
                Setter::Long(apply) => Bound::Long(apply, parse_number(key, value)?),
                Setter::Bool(apply) => Bound::Bool(apply, parse_bool(key, value)?),
                Setter::Str(apply) => Bound::Str(apply, value.to_string()),
            };
            staged.push(bound);
        }

        for bound in staged {
            bound.apply(target);
        }
        Ok(())
    }
}

/// Builder registering one setter per property name and scalar kind
pub struct PropertySchemaBuilder<T> {
    setters: HashMap<String, Setter<T>>,
}

impl<T> PropertySchemaBuilder<T> {
    pub fn int(mut self, name: &str, setter: fn(&mut T, i32)) -> Self {
        self.register(name, Setter::Int(setter));
        self
    }

    pub fn long(mut self, name: &str, setter: fn(&mut T, i64)) -> Self {
        self.register(name, Setter::Long(setter));
        self
    }

    pub fn bool(mut self, name: &str, setter: fn(&mut T, bool)) -> Self {
        self.register(name, Setter::Bool(setter));
        self
    }

    pub fn string(mut self, name: &str, setter: fn(&mut T, String)) -> Self {
        self.register(name, Setter::Str(setter));
        self
    }

    pub fn build(self) -> PropertySchema<T> {
        PropertySchema {
            setters: self.setters,
        }
    }

    fn register(&mut self, name: &str, setter: Setter<T>) {
        for spelling in spellings(name) {
            self.setters.insert(spelling, setter);
        }
    }
}

/// The declared spelling plus the lowercase-first-letter variant
fn spellings(name: &str) -> Vec<String> {
    let mut keys = vec![name.to_string()];
    if let Some(first) = name.chars().next() {
        let lowered: String = first.to_lowercase().chain(name.chars().skip(1)).collect();
        if lowered != name {
            keys.push(lowered);
        }
    }
    keys
}

fn parse_number<N: std::str::FromStr>(key: &str, value: &str) -> ProvisionResult<N>
where
    N::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|err: N::Err| ProvisionError::binding_failure(key, value, err.to_string()))
}

fn parse_bool(key: &str, value: &str) -> ProvisionResult<bool> {
    if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ProvisionError::binding_failure(
            key,
            value,
            "expected true or false",
        ))
    }
}

/// Types that declare a bindable property schema
pub trait Bindable: Sized {
    fn schema() -> PropertySchema<Self>;
}

/// Bind `props` onto `target` through its declared schema
pub fn configure<T: Bindable>(target: &mut T, props: &ConfigMap) -> ProvisionResult<()> {
    T::schema().configure(target, props)
}
