//! YAML suite files
//!
//! A suite file holds a list of shell-command cases:
//!
//! ```yaml
//! name: math
//! env:
//!   LC_ALL: C
//! cases:
//!   - name: addition
//!     run: expr 1 + 2
//!     expect:
//!       stdout: "3\n"
//!   - name: division
//!     run: expr 1 / 0
//!     expect:
//!       status: 2
//!       stderr_contains: division by zero
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::config::is_yaml_file;
use crate::error::{Result, RunError};
use crate::models::{Expectation, TestCollection, TestComponent};

/// On-disk suite definition
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SuiteFile {
    /// Suite name, defaults to the file stem
    pub name: Option<String>,

    /// Environment applied to every case
    pub env: BTreeMap<String, String>,

    pub cases: Vec<CaseDef>,
}

/// One case in a suite file
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaseDef {
    pub name: String,

    /// Shell command line
    pub run: String,

    #[serde(default)]
    pub expect: Expectation,

    /// Case environment, overrides the suite's
    #[serde(default)]
    pub env: BTreeMap<String, String>,

    #[serde(default)]
    pub skip: Option<String>,
}

/// Whether a path names a suite file: `*.yaml`/`*.yml` whose stem starts
/// or ends with "test", ignoring case. Hidden files never qualify.
pub fn is_suite_file(path: &Path) -> bool {
    if !is_yaml_file(path) {
        return false;
    }
    let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
        return false;
    };
    if stem.starts_with('.') {
        return false;
    }
    let stem = stem.to_lowercase();
    stem.starts_with("test") || stem.ends_with("test")
}

/// Load a suite file into a collection named after the suite
pub fn load_suite(path: &Path) -> Result<TestCollection> {
    let content = std::fs::read_to_string(path).map_err(|source| RunError::SuiteRead {
        path: path.to_path_buf(),
        source,
    })?;

    let suite: SuiteFile = if content.trim().is_empty() {
        SuiteFile::default()
    } else {
        serde_yaml::from_str(&content).map_err(|source| RunError::SuiteParse {
            path: path.to_path_buf(),
            source,
        })?
    };

    let suite_name = suite.name.clone().unwrap_or_else(|| {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    });
    let working_dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => Path::new(".").to_path_buf(),
    };

    let components = suite
        .cases
        .into_iter()
        .map(|case| {
            let mut env = suite.env.clone();
            env.extend(case.env);

            let mut component = TestComponent::new(&suite_name, case.name, case.run)
                .with_location(path)
                .with_working_dir(&working_dir)
                .with_expect(case.expect);
            component.env = env;
            component.skip = case.skip;
            component
        })
        .collect();

    Ok(TestCollection::new(suite_name, path).with_components(components))
}
