//! Sink construction from run options

use tracing::debug;

use super::{ConsoleSink, FileSink, LogSink, XmlSink};
use crate::config::AppConfig;
use crate::error::{Result, RunError};
use crate::models::TestCollection;
use crate::options::RunRequest;

/// Rendering settings taken from the application config
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SinkSettings {
    pub color: bool,
    pub timestamp_format: String,
    pub xml_file_prefix: String,
}

impl Default for SinkSettings {
    fn default() -> Self {
        SinkSettings::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for SinkSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            color: config.color,
            timestamp_format: config.timestamp_format.clone(),
            xml_file_prefix: config.xml_file_prefix.clone(),
        }
    }
}

/// Build the sinks a request asks for, in console, file, xml order
///
/// Nothing is opened unless the collection has tests and results will be
/// observable. The XML target is prepared before the log file is opened,
/// so a failing target leaves no log file behind. If a later sink fails
/// to build, sinks already built are dropped, closing their handles.
pub fn build_sinks(
    request: &RunRequest,
    collection: &TestCollection,
    settings: &SinkSettings,
) -> Result<Vec<Box<dyn LogSink>>> {
    if collection.is_empty() {
        return Err(RunError::NoTestsFound);
    }
    request.check_outputs()?;

    let xml = match &request.xml_file {
        Some(path) => Some(XmlSink::create(path, settings.xml_file_prefix.as_str())?),
        None => None,
    };
    let file = match &request.log_file {
        Some(path) => Some(FileSink::create(
            path,
            collection,
            request.verbose,
            &settings.timestamp_format,
        )?),
        None => None,
    };

    let mut sinks: Vec<Box<dyn LogSink>> = Vec::new();
    if !request.suppress_console {
        sinks.push(Box::new(
            ConsoleSink::stdout(request.verbose).colorize(settings.color),
        ));
    }
    if let Some(file) = file {
        sinks.push(Box::new(file));
    }
    if let Some(xml) = xml {
        sinks.push(Box::new(xml));
    }

    debug!(
        "Built sinks: {}",
        sinks.iter().map(|s| s.describe()).collect::<Vec<_>>().join(", ")
    );
    Ok(sinks)
}
