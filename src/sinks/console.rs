//! Console sink
//!
//! Verbose mode prints one line per test. Summary mode prints one
//! progress character per test and lists failures at the end.

use std::io::{self, Write};

use tracing::error;

use super::LogSink;
use crate::models::{RunSummary, TestComponent, TestResult, TestStatus};

/// Progress characters per line in summary mode
const PROGRESS_WIDTH: usize = 60;

pub struct ConsoleSink<W: Write = io::Stdout> {
    out: W,
    verbose: bool,
    colorize: bool,
    column: usize,
}

impl ConsoleSink<io::Stdout> {
    pub fn stdout(verbose: bool) -> Self {
        Self::with_writer(io::stdout(), verbose)
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn with_writer(out: W, verbose: bool) -> Self {
        Self {
            out,
            verbose,
            colorize: false,
            column: 0,
        }
    }

    pub fn colorize(mut self, colorize: bool) -> Self {
        self.colorize = colorize;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, status: TestStatus, text: &str) -> String {
        if !self.colorize {
            return text.to_string();
        }
        let code = match status {
            TestStatus::Pass => "32",
            TestStatus::Fail | TestStatus::Error => "31",
            TestStatus::Skip => "33",
        };
        format!("\x1b[{code}m{text}\x1b[0m")
    }

    fn write_start(&mut self, component: &TestComponent) -> io::Result<()> {
        if self.verbose {
            write!(self.out, "{component} ... ")?;
            self.out.flush()?;
        }
        Ok(())
    }

    fn write_result(&mut self, result: &TestResult) -> io::Result<()> {
        if self.verbose {
            let status = self.paint(result.status, &result.status.to_string());
            writeln!(self.out, "{status} ({}ms)", result.duration_ms)?;
            if let Some(message) = &result.message {
                if !result.status.is_success() {
                    for line in message.lines() {
                        writeln!(self.out, "    {line}")?;
                    }
                }
            }
        } else {
            let mark = self.paint(result.status, &result.status.progress_char().to_string());
            write!(self.out, "{mark}")?;
            self.column += 1;
            if self.column == PROGRESS_WIDTH {
                writeln!(self.out)?;
                self.column = 0;
            }
        }
        self.out.flush()
    }

    fn write_finish(&mut self, summary: &RunSummary) -> io::Result<()> {
        if !self.verbose {
            if self.column > 0 {
                writeln!(self.out)?;
                self.column = 0;
            }
            for failure in summary.failures() {
                let status = self.paint(failure.status, &failure.status.to_string());
                writeln!(self.out, "{status} {}/{}", failure.suite, failure.name)?;
                if let Some(message) = &failure.message {
                    for line in message.lines() {
                        writeln!(self.out, "    {line}")?;
                    }
                }
            }
        }

        writeln!(self.out)?;
        let status = if summary.success() {
            TestStatus::Pass
        } else {
            TestStatus::Fail
        };
        let line = self.paint(status, &summary.to_string());
        writeln!(self.out, "{line}")?;
        self.out.flush()
    }
}

impl<W: Write> LogSink for ConsoleSink<W> {
    fn on_start(&mut self, component: &TestComponent) {
        if let Err(e) = self.write_start(component) {
            error!("Console output failed: {}", e);
        }
    }

    fn on_result(&mut self, _component: &TestComponent, result: &TestResult) {
        if let Err(e) = self.write_result(result) {
            error!("Console output failed: {}", e);
        }
    }

    fn on_finish(&mut self, summary: &RunSummary) {
        if let Err(e) = self.write_finish(summary) {
            error!("Console output failed: {}", e);
        }
    }

    fn describe(&self) -> String {
        let mode = if self.verbose { "verbose" } else { "summary" };
        format!("console({mode})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(sink: &mut dyn LogSink, outcomes: &[(&str, TestStatus)]) {
        let mut results = Vec::new();
        for (name, status) in outcomes {
            let component = TestComponent::new("math", *name, "true");
            sink.on_start(&component);
            let result = match status {
                TestStatus::Pass => TestResult::pass(&component, 5),
                TestStatus::Fail => TestResult::fail(&component, 5, "exit status 1, expected 0"),
                TestStatus::Skip => TestResult::skip(&component, "later"),
                TestStatus::Error => TestResult::error(&component, 0, "spawn failed"),
            };
            sink.on_result(&component, &result);
            results.push(result);
        }
        sink.on_finish(&RunSummary::new("math", results));
    }

    #[test]
    fn test_verbose_prints_line_per_test() {
        let mut sink = ConsoleSink::with_writer(Vec::new(), true);
        run(
            &mut sink,
            &[
                ("add", TestStatus::Pass),
                ("sub", TestStatus::Pass),
                ("mul", TestStatus::Pass),
            ],
        );

        let output = String::from_utf8(sink.into_inner()).unwrap();
        let test_lines: Vec<&str> = output.lines().filter(|l| l.contains(" ... ")).collect();
        assert_eq!(
            test_lines,
            vec![
                "math/add ... PASS (5ms)",
                "math/sub ... PASS (5ms)",
                "math/mul ... PASS (5ms)",
            ]
        );
        assert!(output.contains("3 tests, 3 passed, 0 failed"));
    }

    #[test]
    fn test_summary_mode_progress_and_failures() {
        let mut sink = ConsoleSink::with_writer(Vec::new(), false);
        run(
            &mut sink,
            &[
                ("add", TestStatus::Pass),
                ("sub", TestStatus::Fail),
                ("div", TestStatus::Skip),
            ],
        );

        let output = String::from_utf8(sink.into_inner()).unwrap();
        let mut lines = output.lines();
        assert_eq!(lines.next(), Some(".Fs"));
        assert_eq!(lines.next(), Some("FAIL math/sub"));
        assert_eq!(lines.next(), Some("    exit status 1, expected 0"));
        assert!(output.contains("1 passed, 1 failed, 0 errors, 1 skipped"));
    }

    #[test]
    fn test_colorized_output() {
        let mut sink = ConsoleSink::with_writer(Vec::new(), true).colorize(true);
        run(&mut sink, &[("add", TestStatus::Pass)]);

        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(output.contains("\x1b[32mPASS\x1b[0m"));
    }

    #[test]
    fn test_describe() {
        assert_eq!(ConsoleSink::with_writer(Vec::new(), false).describe(), "console(summary)");
    }
}
