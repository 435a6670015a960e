//! Running one planned test through an external simulator command
//!
//! The runner is any program that can elaborate and simulate a testbench, typically a small
//! wrapper around a simulator. For each test it is invoked as
//!
//! ```text
//! <runner> [runner args]... <testbench> -g<generic>=<value>...
//! ```
//!
//! with `TBRUN_LIBRARY`, `TBRUN_TESTBENCH`, `TBRUN_CONFIG` and `TBRUN_SOURCES` (the library's
//! files as a platform path list, in registration order) in its environment. Exit status 0 is a
//! pass; anything else, including failing to start, is a failure.

use std::env;
use std::path::PathBuf;
use std::process::Command;
use std::time::Instant;

use super::plan::PlannedTest;
use super::report::TestResult;

/// Environment variable supplying the runner when `--runner` is absent.
pub const RUNNER_ENV: &str = "TBRUN_RUNNER";

/// Output lines kept in a failure message.
const FAILURE_TAIL_LINES: usize = 20;

/// A runner program and its leading arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl RunnerCommand {
    /// Split a command line with POSIX shell quoting rules.
    ///
    /// Returns `None` for a blank line or unbalanced quotes.
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = shlex::split(line)?.into_iter();
        let program = words.next()?;
        Some(Self {
            program,
            args: words.collect(),
        })
    }
}

/// Arguments appended after the runner's own: the testbench, then one `-g` per generic.
pub fn runner_arguments(test: &PlannedTest) -> Vec<String> {
    std::iter::once(test.testbench.clone())
        .chain(test.generics.iter().map(|(name, value)| format!("-g{name}={value}")))
        .collect()
}

/// Execute a planned test and capture its result.
///
/// This trait separates process invocation from the engine's orchestration, allowing for
/// custom execution strategies and for mocking in tests.
pub trait TestExecutor {
    fn execute(&self, test: &PlannedTest, sources: &[PathBuf]) -> TestResult;
}

/// Runs each test as a child process of the configured runner.
#[derive(Debug, Clone)]
pub struct CommandExecutor {
    command: RunnerCommand,
}

impl CommandExecutor {
    pub fn new(command: RunnerCommand) -> Self {
        Self { command }
    }
}

impl TestExecutor for CommandExecutor {
    fn execute(&self, test: &PlannedTest, sources: &[PathBuf]) -> TestResult {
        let start = Instant::now();

        let source_list = match env::join_paths(sources) {
            Ok(list) => list,
            Err(e) => return TestResult::Failed(start.elapsed(), format!("Cannot pass source list: {}", e)),
        };

        let output = Command::new(&self.command.program)
            .args(&self.command.args)
            .args(runner_arguments(test))
            .env("TBRUN_LIBRARY", &test.library)
            .env("TBRUN_TESTBENCH", &test.testbench)
            .env("TBRUN_CONFIG", &test.config)
            .env("TBRUN_SOURCES", source_list)
            .output();

        match output {
            Ok(output) => {
                let duration = start.elapsed();
                if output.status.success() {
                    TestResult::Passed(duration)
                } else {
                    let stdout = String::from_utf8_lossy(&output.stdout);
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    let mut msg = format!("runner exited with {}", output.status);
                    let tail = failure_tail(&stdout, &stderr);
                    if !tail.is_empty() {
                        msg.push('\n');
                        msg.push_str(&tail);
                    }
                    TestResult::Failed(duration, msg)
                }
            }
            Err(e) => TestResult::Failed(
                start.elapsed(),
                format!("Failed to start runner '{}': {}", self.command.program, e),
            ),
        }
    }
}

// Prefer stderr; fall back to stdout when the runner reports failures there.
fn failure_tail(stdout: &str, stderr: &str) -> String {
    let text = if stderr.trim().is_empty() { stdout } else { stderr };
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(FAILURE_TAIL_LINES);
    lines[start..].join("\n")
}
