mod cli;
mod config;
mod logging;
mod storage;
mod tasks;

use std::{io, process::ExitCode};

use clap::Parser;
use color_eyre::Result;
use tracing::debug;

use crate::{
    cli::{Command, ConfigCommand},
    tasks::Disposition,
};

/// Exit status for a command the task list refused (bad id, validation).
const REJECTED: u8 = 2;

/// Entry point: one command per process.
fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let cli = cli::Cli::parse();
    let config = config::load()?;
    let _log_guard = logging::init(&logging::resolve_log_path(cli.log_file, &config))?;
    debug!(?config, "configuration loaded");

    match cli.command {
        Command::Config(ConfigCommand::Init) => {
            init_config(&config)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Task(cmd) => {
            let store = storage::store_from_config(cli.file, &config);
            let disposition =
                tasks::handle(cmd.into(), &store, &mut io::stdout(), &mut io::stderr())?;
            Ok(match disposition {
                Disposition::Applied => ExitCode::SUCCESS,
                Disposition::Rejected => ExitCode::from(REJECTED),
            })
        }
    }
}

fn init_config(config: &config::Config) -> Result<()> {
    let path = config::write_default_if_missing(config)?;
    println!("Config initialized at {}", path.display());
    Ok(())
}
