//! Run option parsing
//!
//! Turns a mixed list of flag tokens, positional names and nested name
//! lists into a [`RunRequest`].
//!
//! ## Recognized flags
//!
//! - `-verbose` - one line per test on every text sink
//! - `-suppress` - no console output
//! - `-logfile <path>` - write a text log
//! - `-xmlfile <path|dir>` - write JUnit XML, one file per suite for a directory
//!
//! Any other `-token` is reported as an [`OptionWarning`] and ignored.

use std::fmt;
use std::path::PathBuf;

use tracing::warn;

use crate::error::{Result, RunError};

pub const VERBOSE: &str = "-verbose";
pub const SUPPRESS: &str = "-suppress";
pub const LOGFILE: &str = "-logfile";
pub const XMLFILE: &str = "-xmlfile";

/// One raw argument: a single token or a nested list of names
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RawArg {
    Token(String),
    List(Vec<String>),
}

impl From<&str> for RawArg {
    fn from(s: &str) -> Self {
        RawArg::Token(s.to_string())
    }
}

impl From<String> for RawArg {
    fn from(s: String) -> Self {
        RawArg::Token(s)
    }
}

impl From<Vec<String>> for RawArg {
    fn from(names: Vec<String>) -> Self {
        RawArg::List(names)
    }
}

impl From<Vec<&str>> for RawArg {
    fn from(names: Vec<&str>) -> Self {
        RawArg::List(names.into_iter().map(str::to_string).collect())
    }
}

/// Build a raw argument list from plain command-line tokens
pub fn raw_args<I, S>(tokens: I) -> Vec<RawArg>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    tokens.into_iter().map(|t| RawArg::Token(t.into())).collect()
}

/// Parsed, immutable run request
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunRequest {
    pub names: Vec<String>,
    pub verbose: bool,
    pub suppress_console: bool,
    pub log_file: Option<PathBuf>,
    pub xml_file: Option<PathBuf>,
}

impl RunRequest {
    /// Whether any destination besides the console is configured
    pub fn has_file_output(&self) -> bool {
        self.log_file.is_some() || self.xml_file.is_some()
    }

    /// Results must be observable somewhere
    pub fn check_outputs(&self) -> Result<()> {
        if self.suppress_console && !self.has_file_output() {
            return Err(RunError::ConflictingOutputConfig);
        }
        Ok(())
    }
}

/// Non-fatal problem found while parsing
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OptionWarning {
    InvalidOption(String),
}

impl fmt::Display for OptionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionWarning::InvalidOption(flag) => write!(f, "Ignoring unrecognized option {flag}"),
        }
    }
}

/// Parser output
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedOptions {
    pub request: RunRequest,
    pub warnings: Vec<OptionWarning>,
}

enum Token<'a> {
    /// Top-level token, may be a flag
    Arg(&'a str),
    /// Member of a nested list, always a name
    Name(&'a str),
}

impl<'a> Token<'a> {
    fn as_str(&self) -> &'a str {
        match self {
            Token::Arg(s) | Token::Name(s) => s,
        }
    }
}

fn flatten(args: &[RawArg]) -> Vec<Token<'_>> {
    let mut tokens = Vec::with_capacity(args.len());
    for arg in args {
        match arg {
            RawArg::Token(s) => tokens.push(Token::Arg(s)),
            RawArg::List(names) => tokens.extend(names.iter().map(|n| Token::Name(n.as_str()))),
        }
    }
    tokens
}

fn path_value(value: &str) -> Option<PathBuf> {
    if value.is_empty() {
        None
    } else {
        Some(PathBuf::from(value))
    }
}

/// Parse raw arguments into a run request
pub fn parse(args: &[RawArg]) -> Result<ParsedOptions> {
    let tokens = flatten(args);
    let mut parsed = ParsedOptions::default();
    let request = &mut parsed.request;

    let mut iter = tokens.iter();
    while let Some(token) = iter.next() {
        let arg = match token {
            Token::Name(name) => {
                request.names.push(name.to_string());
                continue;
            }
            Token::Arg(arg) => *arg,
        };

        match arg {
            VERBOSE => request.verbose = true,
            SUPPRESS => request.suppress_console = true,
            LOGFILE => {
                let value = iter
                    .next()
                    .ok_or_else(|| RunError::MissingOptionValue(LOGFILE.to_string()))?;
                request.log_file = path_value(value.as_str());
            }
            XMLFILE => {
                let value = iter
                    .next()
                    .ok_or_else(|| RunError::MissingOptionValue(XMLFILE.to_string()))?;
                request.xml_file = path_value(value.as_str());
            }
            flag if flag.starts_with('-') => {
                let warning = OptionWarning::InvalidOption(flag.to_string());
                warn!("{}", warning);
                parsed.warnings.push(warning);
            }
            name => request.names.push(name.to_string()),
        }
    }

    Ok(parsed)
}
