//! Log file sink
//!
//! The file is opened and the preamble written when the sink is created.
//! The handle is owned by the sink and closed when it is dropped.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{debug, error};

use super::LogSink;
use crate::error::{Result, RunError};
use crate::models::{RunSummary, StatusCounts, TestCollection, TestComponent, TestResult};

pub struct FileSink {
    out: BufWriter<File>,
    path: PathBuf,
    verbose: bool,
}

impl FileSink {
    /// Open `path` for writing and write the run preamble
    pub fn create(
        path: &Path,
        collection: &TestCollection,
        verbose: bool,
        timestamp_format: &str,
    ) -> Result<Self> {
        let open_failure = |source: io::Error| RunError::FileOpenFailure {
            path: path.to_path_buf(),
            source,
        };

        let file = File::create(path).map_err(open_failure)?;
        let mut sink = Self {
            out: BufWriter::new(file),
            path: path.to_path_buf(),
            verbose,
        };
        sink.write_preamble(collection, timestamp_format)
            .map_err(open_failure)?;

        debug!("Opened log file {}", path.display());
        Ok(sink)
    }

    fn write_preamble(&mut self, collection: &TestCollection, timestamp_format: &str) -> io::Result<()> {
        writeln!(self.out, "{}", collection.name)?;
        if collection.location_differs() {
            writeln!(self.out, "{}", collection.location_display())?;
        }
        writeln!(self.out, "{}", Local::now().format(timestamp_format))?;
        writeln!(self.out)?;
        self.out.flush()
    }

    fn write_result(&mut self, result: &TestResult) -> io::Result<()> {
        if !self.verbose {
            return Ok(());
        }
        write!(
            self.out,
            "{:<5} {}/{} ({}ms)",
            result.status.to_string(),
            result.suite,
            result.name,
            result.duration_ms
        )?;
        match &result.message {
            Some(message) => writeln!(self.out, " - {}", message.replace('\n', " | ")),
            None => writeln!(self.out),
        }
    }

    fn write_finish(&mut self, summary: &RunSummary) -> io::Result<()> {
        if !self.verbose {
            let mut suites: Vec<&str> = Vec::new();
            for result in &summary.results {
                if !suites.contains(&result.suite.as_str()) {
                    suites.push(&result.suite);
                }
            }
            for suite in suites {
                let counts =
                    StatusCounts::tally(summary.results.iter().filter(|r| r.suite == suite));
                writeln!(self.out, "{suite}: {counts}")?;
            }
        }
        writeln!(self.out)?;
        writeln!(self.out, "{summary}")?;
        self.out.flush()
    }
}

impl LogSink for FileSink {
    fn on_start(&mut self, _component: &TestComponent) {}

    fn on_result(&mut self, _component: &TestComponent, result: &TestResult) {
        if let Err(e) = self.write_result(result) {
            error!("Failed to write log file {}: {}", self.path.display(), e);
        }
    }

    fn on_finish(&mut self, summary: &RunSummary) {
        if let Err(e) = self.write_finish(summary) {
            error!("Failed to write log file {}: {}", self.path.display(), e);
        }
    }

    fn describe(&self) -> String {
        let mode = if self.verbose { "verbose" } else { "summary" };
        format!("file({mode}, {})", self.path.display())
    }
}
