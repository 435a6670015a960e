//! Library state kept by the local engine
//!
//! A library owns its registered files in registration order (duplicates included) and the
//! entities declared in them. Entity names are found with a line-level scan for
//! `entity <name> is`; VHDL is not parsed.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tbrun_core::{NamePattern, RunConfig};

use super::{EngineError, TestbenchId};
use crate::discovery::SourceFile;

static ENTITY_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*entity[ \t]+([a-z][a-z0-9_]*)[ \t\r\n]+is\b")
        .expect("INVARIANT: entity declaration regex is a valid literal")
});

/// Entity names declared in `source`, lower-cased, in declaration order.
pub fn scan_entities(source: &str) -> Vec<String> {
    ENTITY_DECL
        .captures_iter(source)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_ascii_lowercase())
        .collect()
}

/// A design entity and the run configurations attached to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub name: String,
    pub source: PathBuf,
    /// Depth of `source` below its root.
    pub depth: usize,
    pub configs: Vec<RunConfig>,
}

/// A named library.
#[derive(Debug, Clone, Default)]
pub struct Library {
    pub name: String,
    pub files: Vec<SourceFile>,
    pub entities: Vec<Entity>,
}

impl Library {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Register a file and pick up its entities.
    ///
    /// An unreadable file is still registered but contributes no entities. An entity declared
    /// again by a later file keeps its configurations and takes the later file as its source.
    pub fn add_file(&mut self, file: &SourceFile) {
        self.files.push(file.clone());

        let names = match read_source(&file.path) {
            Ok(source) => scan_entities(&source),
            Err(err) => {
                tracing::warn!(file = %file.path.display(), error = %err, "cannot read source file");
                Vec::new()
            }
        };

        for name in names {
            if let Some(existing) = self.entities.iter_mut().find(|e| e.name == name) {
                tracing::warn!(
                    entity = %name,
                    previous = %existing.source.display(),
                    current = %file.path.display(),
                    "entity declared more than once, keeping the later declaration"
                );
                existing.source = file.path.clone();
                existing.depth = file.depth;
            } else {
                self.entities.push(Entity {
                    name,
                    source: file.path.clone(),
                    depth: file.depth,
                    configs: Vec::new(),
                });
            }
        }
    }

    /// Indices of entities matching `pattern`.
    pub fn matching(&self, pattern: &NamePattern, nested: bool) -> Vec<usize> {
        self.entities
            .iter()
            .enumerate()
            .filter(|(_, entity)| nested || entity.depth == 0)
            .filter(|(_, entity)| pattern.matches(&entity.name))
            .map(|(index, _)| index)
            .collect()
    }

    /// Attach `config` to the entity `id` points at.
    pub fn add_config(&mut self, id: TestbenchId, config: RunConfig) -> Result<(), EngineError> {
        let entity = self
            .entities
            .get_mut(id.index)
            .ok_or(EngineError::UnknownTestbench(id))?;
        if entity.configs.iter().any(|c| c.name == config.name) {
            return Err(EngineError::DuplicateConfig {
                testbench: entity.name.clone(),
                config: config.name,
            });
        }
        entity.configs.push(config);
        Ok(())
    }
}

// Sources may carry Latin-1 comments, so decode lossily.
fn read_source(path: &Path) -> std::io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
