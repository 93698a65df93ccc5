//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Sonarex using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Sonarex - SonarQube Issue Export Tool
#[derive(Parser, Debug)]
#[command(name = "sonarex")]
#[command(version, about, long_about = None)]
#[command(author = "Sonarex Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "sonarex.toml", env = "SONAREX_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "SONAREX_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export issues from SonarQube to CSV
    Export(commands::export::ExportArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Show stored export watermarks
    Status(commands::status::StatusArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
