//! Test engine contract
//!
//! The driver only ever talks to an engine through [`TestEngine`]. An engine owns the library
//! state the driver builds up (libraries, registered files, testbench entities and their run
//! configurations) and decides what happens at dispatch.
//!
//! ## Contract
//!
//! - construct from process arguments (engine-specific, e.g. [`local::LocalEngine::from_argv`])
//! - create or obtain a named library
//! - register a source file into a library
//! - query a library for testbenches whose name matches a wildcard pattern
//! - attach a named run configuration to a testbench
//! - run everything and produce the process exit code
//!
//! [`local::LocalEngine`] is the bundled implementation.

pub mod library;
pub mod local;
pub mod plan;
pub mod report;
pub mod runner;

use tbrun_core::{PatternError, RunConfig};
use thiserror::Error;

use crate::cli::ExitCode;
use crate::discovery::SourceFile;

/// Handle to a library inside an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LibraryId(pub usize);

/// Handle to a testbench entity inside an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TestbenchId {
    pub library: LibraryId,
    pub index: usize,
}

/// Errors reported by an engine
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown library handle {0:?}")]
    UnknownLibrary(LibraryId),

    #[error("unknown testbench handle {0:?}")]
    UnknownTestbench(TestbenchId),

    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error("testbench '{testbench}' already has a configuration named '{config}'")]
    DuplicateConfig { testbench: String, config: String },

    #[error("cannot export run plan: {0}")]
    Export(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Operations a test engine exposes to the driver.
pub trait TestEngine {
    /// Create the library `name`, or return the existing one.
    fn add_library(&mut self, name: &str) -> LibraryId;

    /// Register one source file into `library`.
    fn add_source_file(&mut self, library: LibraryId, file: &SourceFile) -> Result<(), EngineError>;

    /// Testbenches of `library` whose name matches `pattern`.
    ///
    /// With `nested` set, testbenches declared in files below subdirectories of a root qualify too;
    /// otherwise only files directly inside a root are considered.
    fn get_test_benches(&self, library: LibraryId, pattern: &str, nested: bool)
    -> Result<Vec<TestbenchId>, EngineError>;

    /// Attach a run configuration. Names must be unique per testbench.
    fn add_config(&mut self, testbench: TestbenchId, config: RunConfig) -> Result<(), EngineError>;

    /// Compile, run and report. The returned code is the process exit code.
    fn main(&mut self) -> ExitCode;
}
