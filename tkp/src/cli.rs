//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use crate::config::default_config_path;

/// TicketPlease - AI-assisted ticket descriptions
#[derive(Parser)]
#[command(
    name = "tkp",
    about = "CLI assistant for generating task descriptions using AI",
    version = env!("GIT_DESCRIBE"),
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute; none starts the interactive flow
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the version of TicketPlease
    Version,

    /// Modify your TicketPlease configuration
    Config,
}

/// Version line printed by `tkp version`
pub fn version_line() -> String {
    format!("TicketPlease version {}", env!("GIT_DESCRIBE"))
}

/// Get the log file path
pub fn get_log_path() -> PathBuf {
    let path = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ticketplease")
        .join("logs")
        .join("ticketplease.log");
    debug!(?path, "get_log_path: returning path");
    path
}

/// Generate the after_help text listing the files the tool uses
pub fn generate_after_help() -> String {
    let mut help = String::new();
    help.push_str("Files:\n");
    help.push_str(&format!("  config  {}\n", default_config_path().display()));
    help.push_str(&format!("  logs    {}\n", get_log_path().display()));
    help
}
