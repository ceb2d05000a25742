//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for notion-diary using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// notion-diary - incremental Notion diary export
#[derive(Parser, Debug)]
#[command(name = "notion-diary")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "notion-diary.toml", env = "NOTION_DIARY_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "NOTION_DIARY_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export changed diary pages and write their counts back
    Sync(commands::sync::SyncArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Show stored watermarks
    Status(commands::status::StatusArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
