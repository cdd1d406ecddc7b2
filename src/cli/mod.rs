//! Command line interface for the packaging pipeline.
//!
//! Parses arguments, derives the runtime configuration, and dispatches to
//! the stage, `doctor` or `upgrade` implementations.

mod args;
pub mod commands;

pub use args::{Args, Command, RuntimeConfig, StageArgs};

use crate::error::Result;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    let config = RuntimeConfig::from(&args);
    log::debug!("{:?}", config);

    match &args.command {
        Command::Doctor => commands::doctor(&config).await,
        Command::Upgrade { tools } => commands::upgrade(&config, tools).await,
        command => match command.stage() {
            Some((stage, selector)) => commands::run_stage(&config, stage, selector).await,
            None => Ok(0),
        },
    }
}
