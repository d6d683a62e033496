//! CLI argument parsing
//!
//! Defines command-line interface using clap. Run options keep their
//! single-dash form and are passed through untouched to the option parser.

use std::path::PathBuf;

use clap::Parser;

use crate::options::{raw_args, RawArg};
use crate::utils::LogLevel;

/// Command-style test run orchestrator
#[derive(Parser, Debug)]
#[command(name = "testrun")]
#[command(version = "0.1.0")]
#[command(about = "Resolve and run command tests, reporting to console, log file and JUnit XML")]
#[command(
    after_help = "Run options: -verbose, -suppress, -logfile <path>, -xmlfile <path|dir>\n\
                  Names: directories, suite files, packages (a.b), or suite:case"
)]
pub struct Args {
    /// Configuration file (YAML or JSON)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Diagnostic log level, overriding TESTRUN_LOG and the config file
    #[arg(long, value_name = "LEVEL", value_enum, ignore_case = true)]
    pub log_level: Option<LogLevel>,

    /// Disable colored console output
    #[arg(long)]
    pub no_color: bool,

    /// List resolved tests without running them
    #[arg(long)]
    pub list: bool,

    /// Run options and test names
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
    pub args: Vec<String>,
}

impl Args {
    /// Trailing arguments as option parser input
    pub fn run_args(&self) -> Vec<RawArg> {
        raw_args(self.args.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_options_pass_through() {
        let args = Args::parse_from([
            "testrun", "--no-color", "-verbose", "-logfile", "run.log", "math_test",
        ]);
        assert!(args.no_color);
        assert!(!args.list);
        assert_eq!(args.args, vec!["-verbose", "-logfile", "run.log", "math_test"]);
        assert_eq!(args.run_args()[0], RawArg::from("-verbose"));
    }

    #[test]
    fn test_global_options() {
        let args = Args::parse_from([
            "testrun", "--config", "ci.yaml", "--log-level", "debug", "--list",
        ]);
        assert_eq!(args.config, Some(PathBuf::from("ci.yaml")));
        assert_eq!(args.log_level, Some(LogLevel::Debug));
        assert!(args.list);
        assert!(args.args.is_empty());
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        assert!(Args::try_parse_from(["testrun", "--log-level", "chatty"]).is_err());
        let args = Args::parse_from(["testrun", "--log-level", "WARNING"]);
        assert_eq!(args.log_level, Some(LogLevel::Warn));
    }

    #[test]
    fn test_unknown_single_dash_is_kept() {
        let args = Args::parse_from(["testrun", "-bogus", "pkg.sub"]);
        assert_eq!(args.args, vec!["-bogus", "pkg.sub"]);
    }
}
