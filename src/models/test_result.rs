//! Test result models
//!
//! Defines result status, per-case results and run summaries.

use std::fmt;
use std::path::PathBuf;

use super::TestComponent;

/// Test execution status
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TestStatus {
    Pass,
    Fail,
    Skip,
    Error,
}

impl TestStatus {
    pub fn symbol(&self) -> &'static str {
        match self {
            TestStatus::Pass => "✓",
            TestStatus::Fail => "✗",
            TestStatus::Skip => "○",
            TestStatus::Error => "!",
        }
    }

    /// Single character used for progress output
    pub fn progress_char(&self) -> char {
        match self {
            TestStatus::Pass => '.',
            TestStatus::Fail => 'F',
            TestStatus::Skip => 's',
            TestStatus::Error => 'E',
        }
    }

    /// Skipped cases do not fail a run
    pub fn is_success(&self) -> bool {
        matches!(self, TestStatus::Pass | TestStatus::Skip)
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestStatus::Pass => write!(f, "PASS"),
            TestStatus::Fail => write!(f, "FAIL"),
            TestStatus::Skip => write!(f, "SKIP"),
            TestStatus::Error => write!(f, "ERROR"),
        }
    }
}

/// Result of a single test execution
#[derive(Clone, Debug)]
pub struct TestResult {
    pub suite: String,
    pub name: String,
    /// Suite file the case came from, empty if it had none
    pub location: PathBuf,
    pub status: TestStatus,
    pub duration_ms: u64,
    pub message: Option<String>,
}

impl TestResult {
    fn new(component: &TestComponent, status: TestStatus, duration_ms: u64) -> Self {
        Self {
            suite: component.suite.clone(),
            name: component.name.clone(),
            location: component.location.clone(),
            status,
            duration_ms,
            message: None,
        }
    }

    pub fn pass(component: &TestComponent, duration_ms: u64) -> Self {
        Self::new(component, TestStatus::Pass, duration_ms)
    }

    pub fn fail(component: &TestComponent, duration_ms: u64, message: impl Into<String>) -> Self {
        Self::new(component, TestStatus::Fail, duration_ms).with_message(message)
    }

    pub fn skip(component: &TestComponent, reason: impl Into<String>) -> Self {
        Self::new(component, TestStatus::Skip, 0).with_message(reason)
    }

    pub fn error(component: &TestComponent, duration_ms: u64, error: impl Into<String>) -> Self {
        Self::new(component, TestStatus::Error, duration_ms).with_message(error)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_ms as f64 / 1000.0
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}/{} [{}ms]",
            self.status.symbol(),
            self.suite,
            self.name,
            self.duration_ms
        )?;
        if let Some(msg) = &self.message {
            write!(f, " - {msg}")?;
        }
        Ok(())
    }
}

/// Totals for a group of results
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub errors: usize,
}

impl StatusCounts {
    pub fn tally<'a>(results: impl IntoIterator<Item = &'a TestResult>) -> Self {
        let mut counts = Self::default();
        for result in results {
            counts.total += 1;
            match result.status {
                TestStatus::Pass => counts.passed += 1,
                TestStatus::Fail => counts.failed += 1,
                TestStatus::Skip => counts.skipped += 1,
                TestStatus::Error => counts.errors += 1,
            }
        }
        counts
    }
}

impl fmt::Display for StatusCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} passed, {} failed, {} errors, {} skipped",
            self.passed, self.failed, self.errors, self.skipped
        )
    }
}

/// Summary of a complete run
#[derive(Clone, Debug)]
pub struct RunSummary {
    pub name: String,
    pub counts: StatusCounts,
    pub total_duration_ms: u64,
    pub results: Vec<TestResult>,
}

impl RunSummary {
    pub fn new(name: impl Into<String>, results: Vec<TestResult>) -> Self {
        let counts = StatusCounts::tally(&results);
        let total_duration_ms = results.iter().map(|r| r.duration_ms).sum();

        Self {
            name: name.into(),
            counts,
            total_duration_ms,
            results,
        }
    }

    pub fn pass_rate(&self) -> f64 {
        if self.counts.total == 0 {
            0.0
        } else {
            (self.counts.passed as f64 / self.counts.total as f64) * 100.0
        }
    }

    /// True iff no case failed or errored
    pub fn success(&self) -> bool {
        self.results.iter().all(|r| r.status.is_success())
    }

    pub fn failures(&self) -> impl Iterator<Item = &TestResult> {
        self.results.iter().filter(|r| !r.status.is_success())
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} tests, {} ({:.2}s)",
            self.name,
            self.counts.total,
            self.counts,
            self.total_duration_ms as f64 / 1000.0
        )
    }
}
