//! Test execution engine
//!
//! Runs a resolved collection once, reporting every event to a single
//! observer.

mod runner;

pub use runner::CommandRunner;

use crate::models::TestCollection;
use crate::sinks::LogSink;

/// Executes a collection and reports whether every component succeeded
pub trait TestExecutor {
    fn run(&self, collection: &TestCollection, observer: &mut dyn LogSink) -> anyhow::Result<bool>;
}
