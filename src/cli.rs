//! CLI module for tbrun
//!
//! `tbrun [ENGINE ARGS]...` defines no flags of its own: every argument belongs to the engine
//! (see [`EngineOptions`](crate::engine::local::EngineOptions)). The driver configuration comes
//! from the run manifest instead.
//!
//! ## Manifest lookup
//!
//! 1. `TBRUN_MANIFEST`, if set
//! 2. `tbrun.json` in the working directory or any of its ancestors
//! 3. built-in defaults, anchored at the working directory
//!
//! ## Design
//!
//! Functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use crate::config::{DriverConfig, MANIFEST_ENV, locate_manifest};
use crate::driver::Driver;
use crate::engine::local::LocalEngine;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called.
pub fn run() {
    // Help, version and usage errors are rendered and exited by clap itself
    let engine = match LocalEngine::from_argv() {
        Ok(engine) => engine,
        Err(e) => e.exit(),
    };

    match execute(engine) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Build the driver, prepare the engine and dispatch.
fn execute(mut engine: LocalEngine) -> CliResult<ExitCode> {
    let cwd = env::current_dir().map_err(|e| CliError::failure(format!("Cannot determine working directory: {}", e)))?;
    let driver = driver_for(&cwd, env::var_os(MANIFEST_ENV).map(PathBuf::from))?;

    driver
        .run(&mut engine)
        .map_err(|e| CliError::failure(format!("error: {}", e)))
}

/// Pick the driver for a run started in `cwd`.
pub fn driver_for(cwd: &Path, explicit_manifest: Option<PathBuf>) -> CliResult<Driver> {
    match locate_manifest(cwd, explicit_manifest) {
        Some(path) => {
            // Anchor on an absolute directory so later lookups do not depend on the working directory
            let path = fs::canonicalize(&path).unwrap_or_else(|_| cwd.join(&path));
            tracing::info!(manifest = %path.display(), "using run manifest");
            Driver::from_manifest(&path).map_err(|e| CliError::failure(format!("{:?}", miette::Report::new(e))))
        }
        None => {
            tracing::warn!(
                "no {} found; using default roots relative to {}",
                crate::config::MANIFEST_FILE_NAME,
                cwd.display()
            );
            Ok(Driver::new(DriverConfig::default(), cwd))
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
