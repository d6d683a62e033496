//! Error types for test runs
//!
//! Every variant is fatal. Unrecognized flags are reported as
//! [`OptionWarning`](crate::options::OptionWarning) instead.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, RunError>;

/// Fatal conditions that abort a test run
#[derive(Error, Debug)]
pub enum RunError {
    #[error("Missing value for option {0}")]
    MissingOptionValue(String),

    #[error("Unable to resolve \"{0}\" to a test directory, package, suite or case")]
    UnresolvedSpecifier(String),

    #[error("No tests found")]
    NoTestsFound,

    #[error("Console output is suppressed and no -logfile or -xmlfile was given; results would not be observable")]
    ConflictingOutputConfig,

    #[error("Unable to open log file {}", path.display())]
    FileOpenFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read suite file {}", path.display())]
    SuiteRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid suite file {}: {source}", path.display())]
    SuiteParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Unable to open XML report target {}", path.display())]
    XmlTarget {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Test execution failed: {0}")]
    Execution(#[source] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_identify_condition() {
        let err = RunError::MissingOptionValue("-logfile".to_string());
        assert_eq!(err.to_string(), "Missing value for option -logfile");

        let err = RunError::UnresolvedSpecifier("nope".to_string());
        assert!(err.to_string().contains("\"nope\""));

        let err = RunError::FileOpenFailure {
            path: PathBuf::from("/no/such/run.log"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.to_string().contains("/no/such/run.log"));
    }
}
