//! Test result reporting
//!
//! ## TestReporter Trait
//!
//! The local engine separates reporting from execution through [`TestReporter`]. The console
//! reporter prints a pytest-style session; other formats only need another implementation.

use std::time::Duration;

use super::plan::PlannedTest;

/// Result of running a single test
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestResult {
    Passed(Duration),
    Failed(Duration, String),
}

impl TestResult {
    pub fn is_failure(&self) -> bool {
        matches!(self, TestResult::Failed(..))
    }
}

/// Summary of a test run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration: Duration,
}

impl TestSummary {
    pub fn record(&mut self, result: &TestResult) {
        self.total += 1;
        match result {
            TestResult::Passed(_) => self.passed += 1,
            TestResult::Failed(..) => self.failed += 1,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// Trait for reporting test execution results.
pub trait TestReporter {
    /// Called once the selected tests are known
    fn on_collection_complete(&mut self, test_count: usize);

    /// Called when a test run begins
    fn on_test_start(&mut self, _test: &PlannedTest) {}

    /// Called when a test completes
    fn on_test_complete(&mut self, test: &PlannedTest, result: &TestResult);

    /// Called when all tests have completed
    fn on_run_complete(&mut self, summary: &TestSummary);
}

/// Default console reporter (pytest-style)
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    pub verbose: bool,
}

impl ConsoleReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl TestReporter for ConsoleReporter {
    fn on_collection_complete(&mut self, test_count: usize) {
        println!("\x1b[1m=================== test session starts ===================\x1b[0m");
        println!("collected {} item(s)", test_count);
        println!();
    }

    fn on_test_start(&mut self, test: &PlannedTest) {
        if self.verbose {
            eprintln!("running {} ({})", test.name, test.source.display());
        }
    }

    fn on_test_complete(&mut self, test: &PlannedTest, result: &TestResult) {
        let status = match result {
            TestResult::Passed(d) => {
                if self.verbose {
                    format!("\x1b[32mPASSED\x1b[0m ({:.0}ms)", d.as_millis())
                } else {
                    "\x1b[32mPASSED\x1b[0m".to_string()
                }
            }
            TestResult::Failed(d, _) => {
                if self.verbose {
                    format!("\x1b[31mFAILED\x1b[0m ({:.0}ms)", d.as_millis())
                } else {
                    "\x1b[31mFAILED\x1b[0m".to_string()
                }
            }
        };
        println!("{} {}", test.name, status);

        if let TestResult::Failed(_, error) = result {
            println!("\x1b[31m{}\x1b[0m", error.trim_end());
        }
    }

    fn on_run_complete(&mut self, summary: &TestSummary) {
        println!();
        let summary_color = if summary.all_passed() { "\x1b[1;32m" } else { "\x1b[1;31m" };

        let mut parts = Vec::new();
        if summary.passed > 0 {
            parts.push(format!("{} passed", summary.passed));
        }
        if summary.failed > 0 {
            parts.push(format!("{} failed", summary.failed));
        }
        if parts.is_empty() {
            parts.push("no tests ran".to_string());
        }

        println!(
            "{}=================== {} in {:.2}s ===================\x1b[0m",
            summary_color,
            parts.join(", "),
            summary.duration.as_secs_f64()
        );
    }
}
