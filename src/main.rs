//! testrun - resolve and run command tests
//!
//! See the library crate for the run model. This binary only wires the
//! configuration, logging and file-system collaborators together.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use testrun::cli::Args;
use testrun::config::{AppConfig, EnvConfig};
use testrun::executor::CommandRunner;
use testrun::resolver::{FsResolver, WorkingContext};
use testrun::sinks::SinkSettings;
use testrun::utils::init_logger;

fn main() -> Result<()> {
    let args = Args::parse();
    let env = EnvConfig::load();

    let mut config = AppConfig::resolve(args.config.as_deref(), &env)?;
    if args.no_color {
        config.color = false;
    }

    let level = match args.log_level {
        Some(level) => level,
        None => config.log_level()?,
    };
    init_logger(level, config.color);
    if env.has_any() {
        debug!("Environment overrides: {:?}", env);
    }

    let context = WorkingContext::current().context("Failed to read current directory")?;
    let resolver = FsResolver::new(context).recursive(config.recursive);
    let run_args = args.run_args();

    if args.list {
        let collection = testrun::collect(&run_args, &resolver)?;
        for component in &collection.components {
            println!("{}", component.id());
        }
        return Ok(());
    }

    let runner = CommandRunner::from_config(&config);
    let settings = SinkSettings::from(&config);
    let passed = testrun::execute(&run_args, &resolver, &runner, &settings)?;

    if !passed {
        std::process::exit(1);
    }
    Ok(())
}
