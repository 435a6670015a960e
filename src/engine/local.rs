//! The bundled in-process engine
//!
//! `LocalEngine` keeps libraries, entities and run configurations in memory. At dispatch it
//! flattens them into a [`RunPlan`] and, depending on its invocation arguments, lists the tests,
//! exports the plan, prints a dry run, or executes every selected test through the runner.

use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use tbrun_core::{NamePattern, RunConfig};

use super::library::Library;
use super::plan::{RunPlan, render_listing};
use super::report::{ConsoleReporter, TestReporter, TestSummary};
use super::runner::{CommandExecutor, RUNNER_ENV, RunnerCommand, TestExecutor};
use super::{EngineError, LibraryId, TestEngine, TestbenchId};
use crate::cli::ExitCode;
use crate::discovery::SourceFile;
use crate::version::TBRUN_VERSION;

const MANIFEST_HELP: &str = "\
Source roots come from tbrun.json, taken from TBRUN_MANIFEST or the nearest one found upward from
the working directory; relative roots resolve against the manifest's directory. Without a manifest
the built-in roots resolve against the working directory, so results then depend on where tbrun runs.";

/// Invocation arguments of the local engine
#[derive(Parser, Debug, Clone, Default, PartialEq, Eq)]
#[command(name = "tbrun")]
#[command(version = TBRUN_VERSION)]
#[command(about = "Discover VHDL testbenches and run them with and without reset", long_about = None)]
#[command(after_help = MANIFEST_HELP)]
pub struct EngineOptions {
    /// Test name patterns to select (`<library>.<testbench>.<config>`, wildcards allowed)
    #[arg(value_name = "PATTERN")]
    pub patterns: Vec<String>,

    /// List selected tests and exit
    #[arg(short, long)]
    pub list: bool,

    /// Write the run plan, restricted to the selected tests, as JSON and exit
    #[arg(long = "export-json", value_name = "FILE")]
    pub export_json: Option<PathBuf>,

    /// Command that simulates one testbench
    #[arg(long, value_name = "CMD", env = RUNNER_ENV)]
    pub runner: Option<String>,

    /// Print the selected tests instead of running them
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Stop on first failure
    #[arg(short = 'x', long = "exit-first")]
    pub exit_first: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// In-memory engine driven by [`EngineOptions`].
pub struct LocalEngine {
    options: EngineOptions,
    libraries: Vec<Library>,
    reporter: Box<dyn TestReporter>,
    executor: Option<Box<dyn TestExecutor>>,
}

impl LocalEngine {
    pub fn new(options: EngineOptions) -> Self {
        let executor = options
            .runner
            .as_deref()
            .and_then(RunnerCommand::parse)
            .map(|command| Box::new(CommandExecutor::new(command)) as Box<dyn TestExecutor>);
        let reporter = Box::new(ConsoleReporter::new(options.verbose));
        Self {
            options,
            libraries: Vec::new(),
            reporter,
            executor,
        }
    }

    /// Parse the process arguments.
    pub fn from_argv() -> Result<Self, clap::Error> {
        Self::from_args(std::env::args_os())
    }

    /// Parse an explicit argument list; the first item is the program name.
    pub fn from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        EngineOptions::try_parse_from(args).map(Self::new)
    }

    pub fn with_reporter(mut self, reporter: Box<dyn TestReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn with_executor(mut self, executor: Box<dyn TestExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn libraries(&self) -> &[Library] {
        &self.libraries
    }

    /// Snapshot of the current state.
    pub fn plan(&self) -> RunPlan {
        RunPlan::from_libraries(&self.libraries)
    }

    fn library(&self, id: LibraryId) -> Result<&Library, EngineError> {
        self.libraries.get(id.0).ok_or(EngineError::UnknownLibrary(id))
    }

    fn library_mut(&mut self, id: LibraryId) -> Result<&mut Library, EngineError> {
        self.libraries.get_mut(id.0).ok_or(EngineError::UnknownLibrary(id))
    }

    fn dispatch(&mut self) -> Result<ExitCode, EngineError> {
        let plan = self.plan();
        let filters = self
            .options
            .patterns
            .iter()
            .map(|p| NamePattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        let selected = plan.select(&filters);

        if let Some(path) = &self.options.export_json {
            let exported = plan.filtered(&filters);
            exported.write_json(path)?;
            tracing::info!(path = %path.display(), tests = exported.tests.len(), "exported run plan");
            return Ok(ExitCode::SUCCESS);
        }

        if self.options.list {
            print!("{}", render_listing(&selected));
            return Ok(ExitCode::SUCCESS);
        }

        let executor = match &self.executor {
            Some(executor) if !self.options.dry_run => executor,
            _ => {
                if !self.options.dry_run {
                    tracing::warn!("no runner configured (--runner or {RUNNER_ENV}); printing the plan only");
                }
                print!("{}", render_listing(&selected));
                return Ok(ExitCode::SUCCESS);
            }
        };

        let start = Instant::now();
        let mut summary = TestSummary::default();
        self.reporter.on_collection_complete(selected.len());

        for test in selected {
            self.reporter.on_test_start(test);
            let result = executor.execute(test, plan.sources(&test.library));
            summary.record(&result);
            self.reporter.on_test_complete(test, &result);

            if self.options.exit_first && result.is_failure() {
                break;
            }
        }

        summary.duration = start.elapsed();
        self.reporter.on_run_complete(&summary);

        if summary.all_passed() {
            Ok(ExitCode::SUCCESS)
        } else {
            Ok(ExitCode::FAILURE)
        }
    }
}

impl TestEngine for LocalEngine {
    fn add_library(&mut self, name: &str) -> LibraryId {
        if let Some(index) = self.libraries.iter().position(|l| l.name == name) {
            return LibraryId(index);
        }
        self.libraries.push(Library::new(name));
        LibraryId(self.libraries.len() - 1)
    }

    fn add_source_file(&mut self, library: LibraryId, file: &SourceFile) -> Result<(), EngineError> {
        self.library_mut(library)?.add_file(file);
        Ok(())
    }

    fn get_test_benches(
        &self,
        library: LibraryId,
        pattern: &str,
        nested: bool,
    ) -> Result<Vec<TestbenchId>, EngineError> {
        let pattern = NamePattern::new(pattern)?;
        Ok(self
            .library(library)?
            .matching(&pattern, nested)
            .into_iter()
            .map(|index| TestbenchId { library, index })
            .collect())
    }

    fn add_config(&mut self, testbench: TestbenchId, config: RunConfig) -> Result<(), EngineError> {
        self.library_mut(testbench.library)?.add_config(testbench, config)
    }

    fn main(&mut self) -> ExitCode {
        match self.dispatch() {
            Ok(code) => code,
            Err(err) => {
                tracing::error!(error = %err, "dispatch failed");
                eprintln!("error: {err}");
                ExitCode::FAILURE
            }
        }
    }
}
