//! Run orchestration
//!
//! Ties option parsing, specifier resolution, sink construction and
//! execution into a single call. Every handle a run opens is owned by the
//! composite logger built here and is released when it goes out of scope,
//! on success and error paths alike.

use tracing::{debug, info};

use crate::error::{Result, RunError};
use crate::executor::TestExecutor;
use crate::models::TestCollection;
use crate::options::{self, RawArg, RunRequest};
use crate::resolver::{self, SpecifierResolver};
use crate::sinks::{build_sinks, CompositeLogger, LogSink, SinkSettings};

/// Parse, resolve, and run; returns whether every component succeeded
pub fn execute(
    args: &[RawArg],
    resolver: &dyn SpecifierResolver,
    executor: &dyn TestExecutor,
    settings: &SinkSettings,
) -> Result<bool> {
    let request = options::parse(args)?.request;

    // Checked before resolution so a misconfigured run has no side effects
    request.check_outputs()?;

    let collection = resolve_request(&request, resolver)?;
    let sinks = build_sinks(&request, &collection, settings)?;
    let mut composite = CompositeLogger::new(sinks);
    debug!("Reporting to {}", composite.describe());

    info!("Starting run of {} ({} tests)", collection.name, collection.len());
    debug!("Suites: {}", collection.suite_names().join(", "));
    let passed = executor
        .run(&collection, &mut composite)
        .map_err(RunError::Execution)?;
    drop(composite);

    info!("Run of {} {}", collection.name, if passed { "passed" } else { "failed" });
    Ok(passed)
}

/// Parse and resolve without executing anything
pub fn collect(args: &[RawArg], resolver: &dyn SpecifierResolver) -> Result<TestCollection> {
    let request = options::parse(args)?.request;
    resolve_request(&request, resolver)
}

fn resolve_request(request: &RunRequest, resolver: &dyn SpecifierResolver) -> Result<TestCollection> {
    let collection = resolver::resolve(&request.names, resolver)?;
    if collection.is_empty() {
        return Err(RunError::NoTestsFound);
    }
    Ok(collection)
}
