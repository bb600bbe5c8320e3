mod cli;
mod commands;
mod logging;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use commands::SyncOptions;
use dotsync_core::SyncDirection;

fn main() -> anyhow::Result<ExitCode> {
    // Set up Ctrl+C handler for graceful interruption
    ctrlc::set_handler(|| {
        eprintln!("\n\nInterrupted by user (Ctrl+C)");
        std::process::exit(130); // Standard exit code for SIGINT
    })
    .context("Failed to set Ctrl+C handler")?;

    let cli = Cli::parse();

    logging::init(cli.debug)
        .map_err(|e| anyhow::anyhow!(e))
        .context("Failed to initialize logging")?;

    let options = SyncOptions::new(
        cli.dry_run,
        cli.repository.clone(),
        cli.home.clone(),
        cli.config.as_deref(),
        cli.no_config,
    );

    let code = match &cli.command {
        Commands::Push {
            force,
            skip_existing,
        } => commands::Push::execute(*force, *skip_existing, &options)
            .context("Failed to execute push command")?,
        Commands::Pull { force } => {
            commands::Pull::execute(*force, &options).context("Failed to execute pull command")?
        }
        Commands::Status { pull } => commands::Status::execute(direction(*pull), &options)
            .context("Failed to execute status command")?,
        Commands::Diff { pull } => commands::Diff::execute(direction(*pull), &options)
            .context("Failed to execute diff command")?,
        Commands::Config => {
            commands::Config::execute(&options).context("Failed to execute config command")?
        }
    };

    Ok(ExitCode::from(code))
}

const fn direction(pull: bool) -> SyncDirection {
    if pull {
        SyncDirection::Pull
    } else {
        SyncDirection::Push
    }
}
