//! Run plan: the snapshot of engine state acted on at dispatch
//!
//! Every (testbench, configuration) pair becomes one test named `<library>.<testbench>.<config>`.
//! Entities without configurations are design units, not tests, and do not appear.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tbrun_core::conventions::test_name;
use tbrun_core::{GenericMap, NamePattern};

use super::EngineError;
use super::library::Library;
use crate::version::TBRUN_VERSION;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedLibrary {
    pub name: String,
    /// Registration order, duplicates kept.
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedTest {
    pub name: String,
    pub library: String,
    pub testbench: String,
    pub config: String,
    pub generics: GenericMap,
    pub source: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunPlan {
    pub tbrun_version: String,
    pub libraries: Vec<PlannedLibrary>,
    pub tests: Vec<PlannedTest>,
}

impl RunPlan {
    /// Flatten library state. Test order follows library, entity, then configuration order.
    pub fn from_libraries(libraries: &[Library]) -> Self {
        let mut tests = Vec::new();
        for library in libraries {
            for entity in &library.entities {
                for config in &entity.configs {
                    tests.push(PlannedTest {
                        name: test_name(&library.name, &entity.name, &config.name),
                        library: library.name.clone(),
                        testbench: entity.name.clone(),
                        config: config.name.clone(),
                        generics: config.generics.clone(),
                        source: entity.source.clone(),
                    });
                }
            }
        }

        Self {
            tbrun_version: TBRUN_VERSION.to_string(),
            libraries: libraries
                .iter()
                .map(|library| PlannedLibrary {
                    name: library.name.clone(),
                    files: library.files.iter().map(|f| f.path.clone()).collect(),
                })
                .collect(),
            tests,
        }
    }

    /// Tests whose full name matches any filter; no filters selects everything.
    pub fn select(&self, filters: &[NamePattern]) -> Vec<&PlannedTest> {
        self.tests
            .iter()
            .filter(|test| NamePattern::any_matches(filters, &test.name))
            .collect()
    }

    /// Copy of the plan keeping only the tests [`select`](Self::select) picks. Libraries are kept whole.
    pub fn filtered(&self, filters: &[NamePattern]) -> RunPlan {
        RunPlan {
            tbrun_version: self.tbrun_version.clone(),
            libraries: self.libraries.clone(),
            tests: self.select(filters).into_iter().cloned().collect(),
        }
    }

    /// Registered files of `library`, empty when the library is unknown.
    pub fn sources(&self, library: &str) -> &[PathBuf] {
        self.libraries
            .iter()
            .find(|l| l.name == library)
            .map(|l| l.files.as_slice())
            .unwrap_or(&[])
    }

    /// Serialize the plan as pretty JSON into `path`.
    pub fn write_json(&self, path: &Path) -> Result<(), EngineError> {
        let json = serde_json::to_string_pretty(self).map_err(|e| EngineError::Export(e.to_string()))?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// One test name per line followed by a count line.
pub fn render_listing(tests: &[&PlannedTest]) -> String {
    let mut out = String::new();
    for test in tests {
        out.push_str(&test.name);
        out.push('\n');
    }
    out.push_str(&format!("Listed {} tests\n", tests.len()));
    out
}

#[cfg(test)]
mod tests {
    use tbrun_core::{ConfigPair, default_fan_out};

    use super::*;
    use crate::discovery::SourceFile;
    use crate::engine::library::Entity;

    fn library() -> Library {
        let [on, off] = default_fan_out(&ConfigPair::with_reset());
        let mut lib = Library::new("lib");
        lib.files = vec![SourceFile::new("a.vhd", 0, 0), SourceFile::new("b.vhd", 1, 0)];
        lib.entities = vec![
            Entity {
                name: "a_tbc".to_string(),
                source: PathBuf::from("a.vhd"),
                depth: 0,
                configs: vec![on, off],
            },
            Entity {
                name: "helper".to_string(),
                source: PathBuf::from("b.vhd"),
                depth: 0,
                configs: Vec::new(),
            },
        ];
        lib
    }

    #[test]
    fn test_plan_lists_one_test_per_config() {
        let plan = RunPlan::from_libraries(&[library()]);
        let names: Vec<_> = plan.tests.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["lib.a_tbc.with_reset", "lib.a_tbc.without_reset"]);
        assert_eq!(plan.sources("lib"), &[PathBuf::from("a.vhd"), PathBuf::from("b.vhd")]);
        assert!(plan.sources("other").is_empty());
    }

    #[test]
    fn test_select_filters_by_full_name() {
        let plan = RunPlan::from_libraries(&[library()]);
        let filters = vec![NamePattern::new("*.without_reset").unwrap()];
        let selected = plan.select(&filters);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].config, "without_reset");
        assert_eq!(plan.select(&[]).len(), 2);
    }

    #[test]
    fn test_filtered_plan_keeps_sources_and_selected_tests() {
        let plan = RunPlan::from_libraries(&[library()]);
        let filtered = plan.filtered(&[NamePattern::new("*.with_reset").unwrap()]);
        assert_eq!(filtered.tests.len(), 1);
        assert_eq!(filtered.tests[0].name, "lib.a_tbc.with_reset");
        assert_eq!(filtered.libraries, plan.libraries);
        assert_eq!(plan.filtered(&[]), plan);
    }

    #[test]
    fn test_listing_ends_with_count() {
        let plan = RunPlan::from_libraries(&[library()]);
        let listing = render_listing(&plan.select(&[]));
        assert_eq!(
            listing,
            "lib.a_tbc.with_reset\nlib.a_tbc.without_reset\nListed 2 tests\n"
        );
    }

    #[test]
    fn test_write_json_round_trips_through_serde_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.json");
        RunPlan::from_libraries(&[library()]).write_json(&path).unwrap();

        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["tests"][0]["generics"]["g_reset_enable"], "true");
        assert_eq!(value["tests"][1]["generics"]["g_reset_enable"], "false");
        assert_eq!(value["libraries"][0]["files"].as_array().unwrap().len(), 2);
    }
}
