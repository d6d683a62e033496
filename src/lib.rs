//! Command-style test run orchestrator
//!
//! Parses run options, resolves test specifiers into a collection, builds
//! the requested result sinks and runs the collection once, reporting to
//! every sink through a single composite observer.
//!
//! ## Usage
//!
//! ```bash
//! # Run every suite in the current directory
//! testrun
//!
//! # One line per test, plus a log file
//! testrun -verbose -logfile run.log math_test
//!
//! # JUnit XML per suite, nothing on the console
//! testrun -suppress -xmlfile reports/ pkg.sub
//!
//! # A single case
//! testrun math_test.yaml:adds
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod models;
pub mod options;
pub mod orchestrator;
pub mod resolver;
pub mod sinks;
pub mod utils;

pub use error::{Result, RunError};
pub use orchestrator::{collect, execute};
