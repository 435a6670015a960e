//! Driver configuration and the `tbrun.json` run manifest
//!
//! The manifest plays the part of a run script: it sits next to the local testbench sources and
//! every relative root in it is resolved against the manifest's own directory. All fields are
//! optional; an empty `{}` manifest yields [`DriverConfig::default`].
//!
//! ```json
//! {
//!   "library": "lib",
//!   "roots": [
//!     { "path": ".", "role": "local" },
//!     { "path": "../../hdl", "role": "shared" }
//!   ],
//!   "ordering": "sorted",
//!   "testbench_pattern": "*tbc*",
//!   "configs": { "enabled": "with_reset", "disabled": "without_reset" }
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use tbrun_core::conventions::{DEFAULT_LIBRARY, DEFAULT_TESTBENCH_PATTERN, RESET_GENERIC, VHDL_EXTENSION};
use tbrun_core::{ConfigPair, ConfigPairError};
use thiserror::Error;

/// File name searched for when no manifest path is given.
pub const MANIFEST_FILE_NAME: &str = "tbrun.json";

/// Environment variable naming the manifest explicitly.
pub const MANIFEST_ENV: &str = "TBRUN_MANIFEST";

/// What a source root holds. Only `Local` roots are affected by [`OrderingPolicy::Sorted`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RootRole {
    /// Testbench directory next to the manifest.
    #[default]
    Local,
    /// Shared HDL library tree.
    Shared,
    /// Optional board-support tree.
    Board,
}

/// A directory searched recursively for sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceRoot {
    pub path: PathBuf,
    #[serde(default)]
    pub role: RootRole,
}

impl SourceRoot {
    pub fn new(path: impl Into<PathBuf>, role: RootRole) -> Self {
        Self {
            path: path.into(),
            role,
        }
    }

    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self::new(path, RootRole::Local)
    }

    pub fn shared(path: impl Into<PathBuf>) -> Self {
        Self::new(path, RootRole::Shared)
    }

    pub fn board(path: impl Into<PathBuf>) -> Self {
        Self::new(path, RootRole::Board)
    }
}

/// Order in which files of one root are registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderingPolicy {
    /// Whatever order the filesystem walk yields.
    Unordered,
    /// Lexicographic by full path string, for `local` roots only.
    #[default]
    Sorted,
}

/// Everything the driver needs to assemble one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DriverConfig {
    /// Library all discovered files are registered into.
    pub library: String,
    /// Roots in registration order.
    pub roots: Vec<SourceRoot>,
    pub ordering: OrderingPolicy,
    /// Source file extension, without the dot.
    pub extension: String,
    /// Wildcard selecting testbenches among the library's entities.
    pub testbench_pattern: String,
    /// Match testbenches declared in nested subdirectories of a root, not only at its top level.
    pub nested: bool,
    /// Accept a run where no testbench matches.
    pub allow_empty: bool,
    /// Names of the reset-enabled and reset-disabled configurations.
    pub configs: ConfigPair,
    /// Generic toggled between the two configurations.
    pub reset_generic: String,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            library: DEFAULT_LIBRARY.to_string(),
            roots: vec![SourceRoot::local("."), SourceRoot::shared("../../hdl")],
            ordering: OrderingPolicy::default(),
            extension: VHDL_EXTENSION.to_string(),
            testbench_pattern: DEFAULT_TESTBENCH_PATTERN.to_string(),
            nested: true,
            allow_empty: true,
            configs: ConfigPair::default(),
            reset_generic: RESET_GENERIC.to_string(),
        }
    }
}

impl DriverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the root list
    pub fn with_roots(mut self, roots: Vec<SourceRoot>) -> Self {
        self.roots = roots;
        self
    }

    pub fn with_ordering(mut self, ordering: OrderingPolicy) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn with_testbench_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.testbench_pattern = pattern.into();
        self
    }

    pub fn with_nested(mut self, nested: bool) -> Self {
        self.nested = nested;
        self
    }

    pub fn with_allow_empty(mut self, allow_empty: bool) -> Self {
        self.allow_empty = allow_empty;
        self
    }

    pub fn with_configs(mut self, configs: ConfigPair) -> Self {
        self.configs = configs;
        self
    }

    pub fn with_library(mut self, library: impl Into<String>) -> Self {
        self.library = library.into();
        self
    }

    /// Check invariants serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigPairError> {
        self.configs.validate()
    }

    /// Parse a manifest body.
    pub fn from_json_str(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }
}

/// A manifest read from disk together with the directory its roots are relative to.
#[derive(Debug, Clone)]
pub struct Manifest {
    pub path: PathBuf,
    pub anchor: PathBuf,
    pub config: DriverConfig,
}

/// Errors that occur while loading a run manifest
#[derive(Debug, Error, Diagnostic)]
pub enum ManifestError {
    #[error("cannot read manifest '{}'", path.display())]
    #[diagnostic(code(tbrun::manifest::read), help("set TBRUN_MANIFEST to an existing file"))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("manifest '{}' is not valid: {source}", path.display())]
    #[diagnostic(
        code(tbrun::manifest::parse),
        help("every field is optional; unknown fields are rejected")
    )]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("manifest '{}' has unusable configuration names: {source}", path.display())]
    #[diagnostic(code(tbrun::manifest::configs), help("give `configs.enabled` and `configs.disabled` distinct names"))]
    Configs {
        path: PathBuf,
        #[source]
        source: ConfigPairError,
    },
}

impl Manifest {
    /// Read and validate a manifest. Its parent directory becomes the anchor.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let source = fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = DriverConfig::from_json_str(&source).map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate().map_err(|source| ManifestError::Configs {
            path: path.to_path_buf(),
            source,
        })?;

        let anchor = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        tracing::debug!(manifest = %path.display(), anchor = %anchor.display(), "loaded run manifest");

        Ok(Self {
            path: path.to_path_buf(),
            anchor,
            config,
        })
    }
}

/// Find the manifest to use.
///
/// An explicit path (from [`MANIFEST_ENV`]) wins; otherwise `start` and its ancestors are searched for
/// [`MANIFEST_FILE_NAME`].
pub fn locate_manifest(start: &Path, explicit: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path);
    }
    start
        .ancestors()
        .map(|dir| dir.join(MANIFEST_FILE_NAME))
        .find(|candidate| candidate.is_file())
}
