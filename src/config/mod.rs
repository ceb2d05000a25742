//! Configuration management for notion-diary.
//!
//! # Overview
//!
//! notion-diary uses a TOML configuration file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `NOTION_DIARY_<SECTION>_<KEY>` overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use notion_diary::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("notion-diary.toml")?;
//!
//! println!("Database: {}", config.notion.database_id);
//! println!("Concurrency: {}", config.sync.concurrency);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level and dry-run flag
//! - [`NotionConfig`] - Token, database, property names and retry policy
//! - [`SyncConfig`] - Concurrency ceiling and watermark advance policy
//! - [`ExportConfig`] - Output directory and file extension
//! - [`StateConfig`] - Watermark file location and watermark names
//! - [`LoggingConfig`] - Local JSON file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [notion]
//! token = "${NOTION_TOKEN}"
//! database_id = "0123456789abcdef0123456789abcdef"
//!
//! [notion.fields]
//! date = "Date"
//! word_count = "Word Count"
//!
//! [sync]
//! concurrency = 3
//!
//! [export]
//! output_dir = "./diary"
//!
//! [state]
//! path = "./state.json"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, parse_config, read_config, validate_config};
pub use schema::{
    AdvancePolicy, ApplicationConfig, DiaryConfig, ExportConfig, FieldsConfig, LoggingConfig,
    NotionConfig, RetryConfig, StateConfig, SyncConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
