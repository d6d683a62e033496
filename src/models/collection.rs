//! Test collection models
//!
//! A collection is an ordered list of executable components plus the
//! name and location it was resolved from.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Expected outcome of a test command
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Expectation {
    /// Exit status the command must return
    pub status: i32,

    /// Exact stdout match
    pub stdout: Option<String>,

    /// Substring that stdout must contain
    pub stdout_contains: Option<String>,

    /// Substring that stderr must contain
    pub stderr_contains: Option<String>,
}

/// A single executable test case
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestComponent {
    /// Name of the suite the case belongs to
    pub suite: String,

    /// Case name, unique within its suite
    pub name: String,

    /// Suite file the case was loaded from
    pub location: PathBuf,

    /// Shell command line to execute
    pub command: String,

    /// Directory the command runs in
    pub working_dir: PathBuf,

    /// Extra environment variables
    pub env: BTreeMap<String, String>,

    pub expect: Expectation,

    /// Reason for skipping, if the case is disabled
    pub skip: Option<String>,
}

impl TestComponent {
    pub fn new(suite: impl Into<String>, name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            suite: suite.into(),
            name: name.into(),
            location: PathBuf::new(),
            command: command.into(),
            working_dir: PathBuf::from("."),
            env: BTreeMap::new(),
            expect: Expectation::default(),
            skip: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<PathBuf>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = dir.into();
        self
    }

    pub fn with_expect(mut self, expect: Expectation) -> Self {
        self.expect = expect;
        self
    }

    pub fn with_skip(mut self, reason: impl Into<String>) -> Self {
        self.skip = Some(reason.into());
        self
    }

    /// `suite:name`, the same form accepted as a specifier
    pub fn id(&self) -> String {
        format!("{}:{}", self.suite, self.name)
    }
}

impl fmt::Display for TestComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.suite, self.name)
    }
}

/// Ordered set of test components
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestCollection {
    pub name: String,
    pub location: PathBuf,
    pub components: Vec<TestComponent>,
}

impl TestCollection {
    pub fn new(name: impl Into<String>, location: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            components: Vec::new(),
        }
    }

    pub fn with_components(mut self, components: Vec<TestComponent>) -> Self {
        self.components = components;
        self
    }

    /// Append another collection's components, keeping their order
    pub fn append(&mut self, other: TestCollection) {
        self.components.extend(other.components);
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Location rendered as text, for headers
    pub fn location_display(&self) -> String {
        self.location.display().to_string()
    }

    /// Whether the location line adds information beyond the name
    pub fn location_differs(&self) -> bool {
        Path::new(&self.name) != self.location.as_path()
    }

    /// Suite names in first-seen order
    pub fn suite_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for component in &self.components {
            if !names.contains(&component.suite.as_str()) {
                names.push(&component.suite);
            }
        }
        names
    }
}
