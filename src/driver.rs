//! Discovery-and-configuration driver
//!
//! The driver assembles the state a test engine needs and then hands over control:
//!
//! 1. resolve the source roots against the anchor directory
//! 2. discover source files under every root
//! 3. register them, in order, into the single named library
//! 4. query the library for testbenches matching the name pattern
//! 5. attach the reset-enabled and reset-disabled configurations to each testbench
//! 6. call the engine's main entry point and return its exit code unchanged
//!
//! Steps 1-4 never fail on missing or empty input; they just produce empty results.

use std::path::{Path, PathBuf};

use tbrun_core::{ConfigPairError, reset_fan_out};
use thiserror::Error;

use crate::cli::ExitCode;
use crate::config::{DriverConfig, Manifest, ManifestError};
use crate::discovery::{ResolvedRoot, SourceFile, discover_all, resolve_roots};
use crate::engine::{EngineError, LibraryId, TestEngine, TestbenchId};

/// Errors that stop the driver before dispatch
#[derive(Debug, Error)]
pub enum DriverError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("invalid configuration pair: {0}")]
    Configs(#[from] ConfigPairError),

    #[error("no testbench in library '{library}' matches '{pattern}'")]
    NoTestbenches { library: String, pattern: String },
}

/// State registered into the engine before dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prepared {
    pub library: LibraryId,
    pub files: Vec<SourceFile>,
    pub testbenches: Vec<TestbenchId>,
}

/// Discovery-and-configuration driver bound to one anchor directory.
#[derive(Debug, Clone)]
pub struct Driver {
    config: DriverConfig,
    anchor: PathBuf,
}

impl Driver {
    /// Create a driver whose relative roots resolve against `anchor`.
    pub fn new(config: DriverConfig, anchor: impl Into<PathBuf>) -> Self {
        Self {
            config,
            anchor: anchor.into(),
        }
    }

    /// Create a driver from a run manifest, anchored at the manifest's directory.
    pub fn from_manifest(path: &Path) -> Result<Self, ManifestError> {
        let manifest = Manifest::load(path)?;
        Ok(Self::new(manifest.config, manifest.anchor))
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    pub fn anchor(&self) -> &Path {
        &self.anchor
    }

    /// Step 1: roots joined onto the anchor, in configuration order.
    pub fn roots(&self) -> Vec<ResolvedRoot> {
        resolve_roots(&self.anchor, &self.config.roots)
    }

    /// Step 2: every matching source file under every root.
    pub fn discover(&self) -> Vec<SourceFile> {
        discover_all(&self.roots(), &self.config.extension, self.config.ordering)
    }

    /// Steps 1-5: register sources and configure testbenches without dispatching.
    #[tracing::instrument(skip_all, fields(anchor = %self.anchor.display()))]
    pub fn prepare<E: TestEngine>(&self, engine: &mut E) -> Result<Prepared, DriverError> {
        self.config.configs.validate()?;

        let files = self.discover();
        let library = engine.add_library(&self.config.library);
        for file in &files {
            engine.add_source_file(library, file)?;
        }
        tracing::info!(library = %self.config.library, files = files.len(), "registered sources");

        let testbenches = engine.get_test_benches(library, &self.config.testbench_pattern, self.config.nested)?;
        if testbenches.is_empty() {
            if !self.config.allow_empty {
                return Err(DriverError::NoTestbenches {
                    library: self.config.library.clone(),
                    pattern: self.config.testbench_pattern.clone(),
                });
            }
            tracing::warn!(pattern = %self.config.testbench_pattern, "no testbench matched");
        }

        for &testbench in &testbenches {
            for config in reset_fan_out(&self.config.configs, &self.config.reset_generic) {
                engine.add_config(testbench, config)?;
            }
        }
        tracing::info!(testbenches = testbenches.len(), "attached run configurations");

        Ok(Prepared {
            library,
            files,
            testbenches,
        })
    }

    /// Steps 1-6: prepare, then hand control to the engine.
    pub fn run<E: TestEngine>(&self, engine: &mut E) -> Result<ExitCode, DriverError> {
        self.prepare(engine)?;
        Ok(engine.main())
    }
}
