//! The unset-sentinel value type.
//!
//! Option fields must distinguish "the caller did not specify" from "the
//! caller explicitly chose the default value". [`ConfigValue`] makes that
//! distinction a sum type: validators run only against the `Set` arm, and
//! merging a partial override onto a base is unambiguous — a `Set` on the
//! override side always wins, an `Unset` never overwrites.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A configuration value that is either unset or explicitly set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigValue<T> {
    /// The caller did not specify a value.
    Unset,
    /// An explicitly chosen value.
    Set(T),
}

// Manual impl: the derive would demand `T: Default` even though `Unset`
// carries no `T`.
impl<T> Default for ConfigValue<T> {
    fn default() -> Self {
        ConfigValue::Unset
    }
}

impl<T> ConfigValue<T> {
    /// Check if no value was specified.
    pub fn is_unset(&self) -> bool {
        matches!(self, ConfigValue::Unset)
    }

    /// Check if a value was explicitly specified.
    pub fn is_set(&self) -> bool {
        !self.is_unset()
    }

    /// The set value, if any.
    pub fn as_set(&self) -> Option<&T> {
        match self {
            ConfigValue::Unset => None,
            ConfigValue::Set(value) => Some(value),
        }
    }

    /// Convert into an `Option`.
    pub fn into_option(self) -> Option<T> {
        match self {
            ConfigValue::Unset => None,
            ConfigValue::Set(value) => Some(value),
        }
    }

    /// The set value, or `default` when unset.
    pub fn set_or(self, default: T) -> T {
        match self {
            ConfigValue::Unset => default,
            ConfigValue::Set(value) => value,
        }
    }

    /// Overlay onto a fallback: `self` wins when set, otherwise `fallback`.
    ///
    /// Merging an override onto a base is `override.or(base)`.
    pub fn or(self, fallback: ConfigValue<T>) -> ConfigValue<T> {
        match self {
            ConfigValue::Unset => fallback,
            set => set,
        }
    }
}

impl<T: Clone> ConfigValue<T> {
    /// The set value cloned, or `default` when unset.
    pub fn cloned_or(&self, default: T) -> T {
        match self {
            ConfigValue::Unset => default,
            ConfigValue::Set(value) => value.clone(),
        }
    }
}

impl<T> From<T> for ConfigValue<T> {
    fn from(value: T) -> Self {
        ConfigValue::Set(value)
    }
}

impl<T> From<Option<T>> for ConfigValue<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            None => ConfigValue::Unset,
            Some(value) => ConfigValue::Set(value),
        }
    }
}

// `Unset` serializes as null, but fields are expected to carry
// `skip_serializing_if = "ConfigValue::is_unset"` so it never reaches the
// wire. Deserializing any value yields `Set`; a missing field stays `Unset`
// through `#[serde(default)]`.
impl<T: Serialize> Serialize for ConfigValue<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ConfigValue::Unset => serializer.serialize_none(),
            ConfigValue::Set(value) => value.serialize(serializer),
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for ConfigValue<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(ConfigValue::Set)
    }
}
