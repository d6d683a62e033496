//! Command test runner
//!
//! Runs each component's command through the configured shell and checks
//! the outcome against its expectation.

use std::process::{Command, Stdio};

use anyhow::{bail, Result};
use tracing::{debug, info};

use super::TestExecutor;
use crate::config::AppConfig;
use crate::models::{Expectation, RunSummary, TestCollection, TestComponent, TestResult};
use crate::sinks::LogSink;
use crate::utils::Timer;

/// Runs test components as shell commands, one at a time
#[derive(Clone, Debug)]
pub struct CommandRunner {
    shell: Vec<String>,
}

impl CommandRunner {
    /// Create a runner using `shell` (program followed by its arguments)
    pub fn new(shell: Vec<String>) -> Self {
        Self { shell }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.shell.clone())
    }

    /// Run a single component
    pub fn run_component(&self, component: &TestComponent) -> TestResult {
        if let Some(reason) = &component.skip {
            return TestResult::skip(component, reason.clone());
        }
        let Some((program, args)) = self.shell.split_first() else {
            return TestResult::error(component, 0, "No shell configured");
        };

        debug!("Running {}: {}", component, component.command);
        let timer = Timer::start(component.id());
        let output = Command::new(program)
            .args(args)
            .arg(&component.command)
            .current_dir(&component.working_dir)
            .envs(&component.env)
            .stdin(Stdio::null())
            .output();
        let duration_ms = timer.stop();

        match output {
            Ok(output) => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                let stderr = String::from_utf8_lossy(&output.stderr);
                match check_expectation(&component.expect, output.status.code(), &stdout, &stderr) {
                    None => TestResult::pass(component, duration_ms),
                    Some(mismatch) => TestResult::fail(component, duration_ms, mismatch),
                }
            }
            Err(e) => TestResult::error(
                component,
                duration_ms,
                format!("Failed to run {program} in {}: {e}", component.working_dir.display()),
            ),
        }
    }
}

impl TestExecutor for CommandRunner {
    fn run(&self, collection: &TestCollection, observer: &mut dyn LogSink) -> Result<bool> {
        if self.shell.is_empty() {
            bail!("No shell configured for running test commands");
        }

        info!("Running {} tests from {}", collection.len(), collection.name);

        let mut results = Vec::with_capacity(collection.len());
        for component in &collection.components {
            observer.on_start(component);
            let result = self.run_component(component);
            debug!("  {}", result);
            observer.on_result(component, &result);
            results.push(result);
        }

        let summary = RunSummary::new(&collection.name, results);
        info!(
            "Run completed in {}ms - Pass: {}/{} ({:.1}%)",
            summary.total_duration_ms,
            summary.counts.passed,
            summary.counts.total,
            summary.pass_rate()
        );
        observer.on_finish(&summary);

        Ok(summary.success())
    }
}

/// Describe the first way an outcome misses its expectation
fn check_expectation(
    expect: &Expectation,
    status: Option<i32>,
    stdout: &str,
    stderr: &str,
) -> Option<String> {
    match status {
        None => return Some(with_stderr("terminated by signal".to_string(), stderr)),
        Some(code) if code != expect.status => {
            return Some(with_stderr(
                format!("exit status {code}, expected {}", expect.status),
                stderr,
            ));
        }
        Some(_) => {}
    }

    if let Some(expected) = &expect.stdout {
        if stdout != expected {
            return Some(format!("stdout {stdout:?} does not match {expected:?}"));
        }
    }
    if let Some(needle) = &expect.stdout_contains {
        if !stdout.contains(needle.as_str()) {
            return Some(format!("stdout does not contain {needle:?}"));
        }
    }
    if let Some(needle) = &expect.stderr_contains {
        if !stderr.contains(needle.as_str()) {
            return Some(format!("stderr does not contain {needle:?}"));
        }
    }
    None
}

fn with_stderr(message: String, stderr: &str) -> String {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        message
    } else {
        format!("{message}\nstderr: {stderr}")
    }
}
