#![forbid(unsafe_code)]
//! tbrun: VHDL testbench discovery and run-configuration driver
//!
//! tbrun walks a small list of source roots for VHDL files, registers them into one library of a
//! test engine, selects the testbenches whose names follow the `tbc` convention, and attaches a
//! reset-enabled and a reset-disabled run configuration to each before handing control to the
//! engine.
//!
//! ## Layout
//!
//! - [`config`]: driver configuration and the `tbrun.json` run manifest
//! - [`discovery`]: root resolution and recursive source discovery
//! - [`driver`]: the discovery-and-configuration driver
//! - [`engine`]: the engine contract and the bundled local engine
//! - [`cli`]: process entry point
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod cli;
pub mod config;
pub mod discovery;
pub mod driver;
pub mod engine;
pub mod version;

pub use config::{DriverConfig, OrderingPolicy, RootRole, SourceRoot};
pub use discovery::SourceFile;
pub use driver::{Driver, DriverError, Prepared};
pub use engine::{EngineError, LibraryId, TestEngine, TestbenchId};
pub use engine::local::{EngineOptions, LocalEngine};
