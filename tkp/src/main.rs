//! TicketPlease - AI-assisted ticket descriptions
//!
//! CLI entry point.

use std::fs;

use clap::{CommandFactory, FromArgMatches};
use eyre::{Context, Result};
use tracing::{debug, info};

use ticketplease::app::{run_config, run_task_generation};
use ticketplease::cli::{Cli, Command, generate_after_help, get_log_path, version_line};
use ticketplease::config::ConfigStore;
use ticketplease::output::ClipboardSink;
use ticketplease::terminal::ConsolePrompter;

fn parse_level(level: &str) -> Option<tracing::Level> {
    match level.to_uppercase().as_str() {
        "TRACE" => Some(tracing::Level::TRACE),
        "DEBUG" => Some(tracing::Level::DEBUG),
        "INFO" => Some(tracing::Level::INFO),
        "WARN" | "WARNING" => Some(tracing::Level::WARN),
        "ERROR" => Some(tracing::Level::ERROR),
        _ => None,
    }
}

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Logging isn't initialized yet, so nothing here can be traced
    let log_path = get_log_path();
    if let Some(log_dir) = log_path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(log_dir).context("Failed to create log directory")?;
    }

    // Priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => parse_level(s).unwrap_or_else(|| {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
            tracing::Level::INFO
        }),
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cmd = Cli::command().after_help(generate_after_help());
    let cli = Cli::from_arg_matches(&cmd.get_matches())?;

    // Load log level from config file early (before full config load)
    let config_log_level = ConfigStore::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    debug!(command = ?cli.command, "main: dispatching command");
    if let Some(Command::Version) = cli.command {
        println!("{}", version_line());
        return Ok(());
    }

    let mut store = ConfigStore::open(cli.config.as_ref()).context("Failed to load configuration")?;
    let mut prompter = ConsolePrompter::new()?;

    match cli.command {
        Some(Command::Config) => {
            debug!("main: matched Config command");
            run_config(&mut prompter, &mut store, true);
        }
        Some(Command::Version) => {}
        None => {
            debug!("main: no subcommand, starting task generation");
            let mut sink = ClipboardSink;
            let accepted = run_task_generation(&mut prompter, &mut sink, &mut store).await;
            info!(%accepted, "main: task generation finished");
        }
    }

    Ok(())
}
