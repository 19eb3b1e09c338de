mod actions;
mod commands;
mod logging;
mod progress;
mod prompt;
mod render;
mod shell;

use std::process::ExitCode;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use commands::{Cli, Commands};
use dotenv::dotenv;
use face_compare_core::{AppConfig, Session};
use progress::CliReporter;
use tracing::debug;

fn main() -> anyhow::Result<ExitCode> {
    dotenv().ok();

    let config = face_compare_core::config::load_configuration()
        .context("loading configuration")?;
    let _guard = logging::init_logger(&config.log_file());
    debug!("Base directory {}", config.base_dir().display());

    let args = Cli::parse();

    let code = match args.command {
        Some(Commands::Compare {
            image_one,
            image_two,
        }) => actions::compare(&open_session(&config)?, &image_one, &image_two),
        Some(Commands::History) => {
            render::print_history(&open_session(&config)?.list_history());
            ExitCode::SUCCESS
        }
        Some(Commands::Clear { yes }) => {
            actions::clear(&mut open_session(&config)?, yes)?;
            ExitCode::SUCCESS
        }
        Some(Commands::Shell) => {
            shell::run(open_session(&config)?)?;
            ExitCode::SUCCESS
        }
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:#?}", config);
            println!("Upload directory: {}", config.upload_dir().display());
            println!("Log file: {}", config.log_file().display());
            ExitCode::SUCCESS
        }
        None => {
            let _ = Cli::command().print_long_help();
            ExitCode::SUCCESS
        }
    };

    Ok(code)
}

fn open_session(config: &AppConfig) -> anyhow::Result<Session> {
    let upload_dir = config.upload_dir();
    let session = Session::open(config.clone())
        .with_context(|| format!("creating upload directory {}", upload_dir.display()))?;
    Ok(session.with_reporter(CliReporter::new()))
}
