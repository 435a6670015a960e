//! Provide the shared, pure vocabulary of the tbrun testbench driver.
//!
//! This crate is intentionally small and dependency-light. It holds what both the driver and any
//! engine implementation must agree on:
//! - well-known identifiers (library name, reset generic, source extension),
//! - the testbench name pattern and its matching rules,
//! - run configurations and the reset fan-out rule.
//!
//! ## Notes
//!
//! - No IO and no global state. Filesystem discovery and engine state live in the `tbrun` crate.

pub mod config;
pub mod conventions;
pub mod pattern;

pub use config::{ConfigPair, ConfigPairError, GenericMap, RunConfig, default_fan_out, reset_fan_out};
pub use pattern::{NamePattern, PatternError};
