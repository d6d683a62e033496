//! JUnit XML report sink
//!
//! A file target receives one report holding every suite. A directory
//! target receives one report per suite, named `<prefix><suite>.xml`,
//! which is the layout most CI report collectors expect. Suites are keyed
//! by name and suite file, so same-named suites from different
//! directories stay separate, and colliding file names get a numeric
//! suffix rather than overwriting each other.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use std::time::Duration;

use anyhow::Context;
use chrono::Local;
use quick_junit::{NonSuccessKind, Property, Report, TestCase, TestCaseStatus, TestSuite};
use tracing::{debug, error};

use super::LogSink;
use crate::error::{Result, RunError};
use crate::models::{RunSummary, TestComponent, TestResult, TestStatus};

/// Where XML reports are written
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum XmlTarget {
    File(PathBuf),
    Directory(PathBuf),
}

impl XmlTarget {
    /// Existing directories and paths ending in a separator are directories
    pub fn from_path(path: &Path) -> Self {
        let text = path.to_string_lossy();
        if path.is_dir() || text.ends_with('/') || text.ends_with(MAIN_SEPARATOR) {
            XmlTarget::Directory(path.to_path_buf())
        } else {
            XmlTarget::File(path.to_path_buf())
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            XmlTarget::File(path) | XmlTarget::Directory(path) => path,
        }
    }
}

pub struct XmlSink {
    target: XmlTarget,
    file_prefix: String,
    /// Report file for a file target, created up front
    report_file: Option<File>,
}

impl XmlSink {
    /// Prepare the target: create a directory, or create the report file
    pub fn create(path: &Path, file_prefix: impl Into<String>) -> Result<Self> {
        let target = XmlTarget::from_path(path);
        let unusable = |source| RunError::XmlTarget {
            path: path.to_path_buf(),
            source,
        };

        let report_file = match &target {
            XmlTarget::Directory(dir) => {
                std::fs::create_dir_all(dir).map_err(unusable)?;
                None
            }
            XmlTarget::File(file) => Some(File::create(file).map_err(unusable)?),
        };
        debug!("Prepared XML target {}", path.display());

        Ok(Self {
            target,
            file_prefix: file_prefix.into(),
            report_file,
        })
    }

    fn write_reports(&mut self, summary: &RunSummary) -> anyhow::Result<()> {
        let suites = build_suites(&summary.results);

        match &self.target {
            XmlTarget::File(path) => {
                let file = match self.report_file.take() {
                    Some(file) => file,
                    None => File::create(path)
                        .with_context(|| format!("Failed to create {}", path.display()))?,
                };

                let mut report = Report::new(summary.name.as_str());
                report.set_time(Duration::from_millis(summary.total_duration_ms));
                report.add_test_suites(suites.into_iter().map(|(_, suite)| suite));
                write_report(&report, file, path)
            }
            XmlTarget::Directory(dir) => {
                let mut used = HashSet::new();
                for (name, suite) in suites {
                    let path = dir.join(unique_file_name(&self.file_prefix, &name, &mut used));
                    let file = File::create(&path)
                        .with_context(|| format!("Failed to create {}", path.display()))?;

                    let mut report = Report::new(name.as_str());
                    report.add_test_suite(suite);
                    write_report(&report, file, &path)?;
                }
                Ok(())
            }
        }
    }
}

impl LogSink for XmlSink {
    fn on_start(&mut self, _component: &TestComponent) {}

    fn on_result(&mut self, _component: &TestComponent, _result: &TestResult) {}

    fn on_finish(&mut self, summary: &RunSummary) {
        if let Err(e) = self.write_reports(summary) {
            error!(
                "Failed to write XML report to {}: {:#}",
                self.target.path().display(),
                e
            );
        }
    }

    fn describe(&self) -> String {
        match &self.target {
            XmlTarget::File(path) => format!("xml({})", path.display()),
            XmlTarget::Directory(path) => format!("xml(dir {})", path.display()),
        }
    }
}

fn write_report(report: &Report, file: File, path: &Path) -> anyhow::Result<()> {
    debug!("Writing XML report {}", path.display());
    let mut out = BufWriter::new(file);
    report
        .serialize(&mut out)
        .with_context(|| format!("Failed to serialize {}", path.display()))?;
    out.flush()
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// One JUnit suite per (suite name, suite file), in first-seen order
fn build_suites(results: &[TestResult]) -> Vec<(String, TestSuite)> {
    let mut groups: Vec<(&str, &Path, Vec<&TestResult>)> = Vec::new();
    for result in results {
        let key = (result.suite.as_str(), result.location.as_path());
        match groups.iter().position(|(suite, location, _)| (*suite, *location) == key) {
            Some(i) => groups[i].2.push(result),
            None => groups.push((key.0, key.1, vec![result])),
        }
    }

    let timestamp = Local::now();
    groups
        .into_iter()
        .map(|(name, location, results)| {
            let mut suite = TestSuite::new(name);
            suite.set_timestamp(timestamp);
            suite.set_time(Duration::from_millis(results.iter().map(|r| r.duration_ms).sum()));
            if !location.as_os_str().is_empty() {
                suite.add_property(Property::new("location", location.display().to_string()));
            }
            suite.add_test_cases(results.into_iter().map(test_case));
            (name.to_string(), suite)
        })
        .collect()
}

fn test_case(result: &TestResult) -> TestCase {
    let mut status = match result.status {
        TestStatus::Pass => TestCaseStatus::success(),
        TestStatus::Fail => TestCaseStatus::non_success(NonSuccessKind::Failure),
        TestStatus::Error => TestCaseStatus::non_success(NonSuccessKind::Error),
        TestStatus::Skip => TestCaseStatus::skipped(),
    };
    match &result.message {
        Some(message) if result.status != TestStatus::Pass => {
            status.set_message(message.lines().next().unwrap_or_default());
            if message.contains('\n') {
                status.set_description(message.as_str());
            }
        }
        _ => {}
    }

    let mut case = TestCase::new(result.name.as_str(), status);
    case.set_classname(result.suite.as_str());
    case.set_time(Duration::from_millis(result.duration_ms));
    case
}

/// `<prefix><suite>.xml`, made file-safe, suffixed `-2`, `-3`, ... if taken
fn unique_file_name(prefix: &str, suite: &str, used: &mut HashSet<String>) -> String {
    let stem = format!("{prefix}{}", file_safe(suite));
    let mut name = format!("{stem}.xml");
    let mut n = 2;
    // Lowercased so case-insensitive file systems cannot merge two reports
    while !used.insert(name.to_lowercase()) {
        name = format!("{stem}-{n}.xml");
        n += 1;
    }
    name
}

fn file_safe(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn summary() -> RunSummary {
        let add = TestComponent::new("math", "add", "true");
        let sub = TestComponent::new("math", "sub", "false");
        let cat = TestComponent::new("text io", "cat", "true");
        RunSummary::new(
            "all",
            vec![
                TestResult::pass(&add, 10),
                TestResult::fail(&sub, 20, "expected <3> & got 4"),
                TestResult::skip(&cat, "no input"),
            ],
        )
    }

    fn xml_files(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_target_detection() {
        let dir = tempdir().unwrap();
        assert_eq!(
            XmlTarget::from_path(dir.path()),
            XmlTarget::Directory(dir.path().to_path_buf())
        );

        let file = dir.path().join("out.xml");
        assert_eq!(XmlTarget::from_path(&file), XmlTarget::File(file.clone()));

        let trailing = PathBuf::from("reports/");
        assert!(matches!(XmlTarget::from_path(&trailing), XmlTarget::Directory(_)));
    }

    #[test]
    fn test_single_file_report() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.xml");

        let mut sink = XmlSink::create(&path, "TEST-").unwrap();
        sink.on_finish(&summary());

        let xml = std::fs::read_to_string(&path).unwrap();
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("<testsuites name=\"all\""));
        assert!(xml.contains("<testsuite name=\"math\""));
        assert!(xml.contains("<testsuite name=\"text io\""));
        assert!(xml.contains("name=\"add\""));
        assert!(xml.contains("classname=\"math\""));
        assert!(xml.contains("<failure"));
        assert!(xml.contains("expected &lt;3&gt; &amp; got 4"));
        assert!(xml.contains("<skipped"));
        assert!(xml.trim_end().ends_with("</testsuites>"));
    }

    #[test]
    fn test_file_target_created_up_front() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.xml");

        let _sink = XmlSink::create(&path, "TEST-").unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn test_file_target_in_missing_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("out.xml");

        let err = XmlSink::create(&path, "TEST-").err().unwrap();
        assert!(matches!(err, RunError::XmlTarget { path: ref p, .. } if *p == path));
    }

    #[test]
    fn test_directory_report_per_suite() {
        let dir = tempdir().unwrap();
        let reports = dir.path().join("reports");
        let target = PathBuf::from(format!("{}/", reports.display()));

        let mut sink = XmlSink::create(&target, "TEST-").unwrap();
        assert!(reports.is_dir());
        sink.on_finish(&summary());

        assert_eq!(xml_files(&reports), vec!["TEST-math.xml", "TEST-text_io.xml"]);

        let math = std::fs::read_to_string(reports.join("TEST-math.xml")).unwrap();
        assert!(math.contains("<testsuite name=\"math\""));
        assert!(!math.contains("text io"));
    }

    #[test]
    fn test_colliding_file_names_are_kept_apart() {
        let dir = tempdir().unwrap();
        let spaced = TestComponent::new("a b", "one", "true");
        let underscored = TestComponent::new("a_b", "two", "true");
        let summary = RunSummary::new(
            "all",
            vec![TestResult::pass(&spaced, 1), TestResult::pass(&underscored, 1)],
        );

        let mut sink = XmlSink::create(dir.path(), "TEST-").unwrap();
        sink.on_finish(&summary);

        assert_eq!(xml_files(dir.path()), vec!["TEST-a_b-2.xml", "TEST-a_b.xml"]);
        let first = std::fs::read_to_string(dir.path().join("TEST-a_b.xml")).unwrap();
        let second = std::fs::read_to_string(dir.path().join("TEST-a_b-2.xml")).unwrap();
        assert!(first.contains("name=\"one\""));
        assert!(second.contains("name=\"two\""));
    }

    #[test]
    fn test_same_suite_name_from_two_files() {
        let dir = tempdir().unwrap();
        let first = TestComponent::new("test_math", "add", "true")
            .with_location("dirA/test_math.yaml");
        let second = TestComponent::new("test_math", "add", "true")
            .with_location("dirB/test_math.yaml");
        let summary = RunSummary::new(
            "dirA, dirB",
            vec![TestResult::pass(&first, 1), TestResult::pass(&second, 1)],
        );

        let suites = build_suites(&summary.results);
        assert_eq!(suites.len(), 2);

        let mut sink = XmlSink::create(dir.path(), "TEST-").unwrap();
        sink.on_finish(&summary);

        assert_eq!(
            xml_files(dir.path()),
            vec!["TEST-test_math-2.xml", "TEST-test_math.xml"]
        );
        let report = std::fs::read_to_string(dir.path().join("TEST-test_math-2.xml")).unwrap();
        assert!(report.contains("dirB/test_math.yaml"));
    }

    #[test]
    fn test_unique_file_name_ignores_case() {
        let mut used = HashSet::new();
        assert_eq!(unique_file_name("TEST-", "Math", &mut used), "TEST-Math.xml");
        assert_eq!(unique_file_name("TEST-", "math", &mut used), "TEST-math-2.xml");
    }
}
