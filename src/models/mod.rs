//! Data models for test runs
//!
//! This module contains the collection, result and summary types shared
//! by the resolver, runner and sinks.

mod collection;
mod test_result;

pub use collection::{Expectation, TestCollection, TestComponent};
pub use test_result::{RunSummary, StatusCounts, TestResult, TestStatus};
