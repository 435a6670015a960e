//! Run configurations and the reset fan-out rule.
//!
//! A run configuration is a named binding of generic values under which a testbench is executed
//! once. The driver attaches exactly two per testbench: one with the reset generic enabled and
//! one with it disabled.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::conventions::{RESET_GENERIC, vhdl_bool};

/// Generic name to string value. Ordered so plans and runner arguments are stable.
pub type GenericMap = BTreeMap<String, String>;

/// A named set of generic values for one testbench execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    pub name: String,
    pub generics: GenericMap,
}

impl RunConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            generics: GenericMap::new(),
        }
    }

    /// Bind a generic, replacing any previous value.
    pub fn with_generic(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.generics.insert(name.into(), value.into());
        self
    }
}

/// Error raised when a configuration pair cannot be used for fan-out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigPairError {
    #[error("configuration names must be distinct, both are '{0}'")]
    SameName(String),

    #[error("configuration names must not be empty")]
    EmptyName,
}

/// Names of the two configurations attached to every testbench.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigPair {
    /// Name of the reset-enabled configuration.
    pub enabled: String,
    /// Name of the reset-disabled configuration.
    pub disabled: String,
}

impl Default for ConfigPair {
    fn default() -> Self {
        Self::with_reset()
    }
}

impl ConfigPair {
    /// `with_reset` / `without_reset`.
    pub fn with_reset() -> Self {
        Self {
            enabled: "with_reset".to_string(),
            disabled: "without_reset".to_string(),
        }
    }

    /// `reset` / `no_reset`.
    pub fn short() -> Self {
        Self {
            enabled: "reset".to_string(),
            disabled: "no_reset".to_string(),
        }
    }

    /// Build a pair from explicit names.
    ///
    /// ## Errors
    ///
    /// Returns [`ConfigPairError`] if either name is empty or both names are equal.
    pub fn new(enabled: impl Into<String>, disabled: impl Into<String>) -> Result<Self, ConfigPairError> {
        let pair = Self {
            enabled: enabled.into(),
            disabled: disabled.into(),
        };
        pair.validate()?;
        Ok(pair)
    }

    /// Check the invariants a deserialized pair must also satisfy.
    pub fn validate(&self) -> Result<(), ConfigPairError> {
        if self.enabled.is_empty() || self.disabled.is_empty() {
            return Err(ConfigPairError::EmptyName);
        }
        if self.enabled == self.disabled {
            return Err(ConfigPairError::SameName(self.enabled.clone()));
        }
        Ok(())
    }
}

/// Produce the two configurations attached to one testbench, enabled first.
///
/// ## Parameters
/// - `pair`: configuration names.
/// - `generic`: generic toggled between the two (normally [`RESET_GENERIC`]).
///
/// ## Returns
/// - (`[RunConfig; 2]`): `generic = "true"` under `pair.enabled`, then `generic = "false"` under
///   `pair.disabled`.
pub fn reset_fan_out(pair: &ConfigPair, generic: &str) -> [RunConfig; 2] {
    [
        RunConfig::new(&pair.enabled).with_generic(generic, vhdl_bool(true)),
        RunConfig::new(&pair.disabled).with_generic(generic, vhdl_bool(false)),
    ]
}

/// [`reset_fan_out`] over the conventional reset generic.
pub fn default_fan_out(pair: &ConfigPair) -> [RunConfig; 2] {
    reset_fan_out(pair, RESET_GENERIC)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pair_names() {
        let pair = ConfigPair::default();
        assert_eq!(pair.enabled, "with_reset");
        assert_eq!(pair.disabled, "without_reset");
    }

    #[test]
    fn test_fan_out_enabled_first() {
        let [first, second] = default_fan_out(&ConfigPair::with_reset());
        assert_eq!(first.name, "with_reset");
        assert_eq!(first.generics.get("g_reset_enable").map(String::as_str), Some("true"));
        assert_eq!(second.name, "without_reset");
        assert_eq!(second.generics.get("g_reset_enable").map(String::as_str), Some("false"));
    }

    #[test]
    fn test_fan_out_binds_only_the_toggled_generic() {
        let configs = reset_fan_out(&ConfigPair::short(), "g_rst");
        for config in &configs {
            assert_eq!(config.generics.len(), 1);
            assert!(config.generics.contains_key("g_rst"));
        }
        assert_eq!(configs[0].name, "reset");
        assert_eq!(configs[1].name, "no_reset");
    }

    #[test]
    fn test_pair_rejects_equal_names() {
        assert_eq!(
            ConfigPair::new("same", "same"),
            Err(ConfigPairError::SameName("same".to_string()))
        );
    }

    #[test]
    fn test_pair_rejects_empty_names() {
        assert_eq!(ConfigPair::new("", "off"), Err(ConfigPairError::EmptyName));
        assert_eq!(ConfigPair::new("on", ""), Err(ConfigPairError::EmptyName));
    }

    #[test]
    fn test_with_generic_overrides() {
        let config = RunConfig::new("x").with_generic("g", "1").with_generic("g", "2");
        assert_eq!(config.generics.get("g").map(String::as_str), Some("2"));
    }
}
