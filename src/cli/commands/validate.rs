//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the notion-diary configuration file.

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Dry Run: {}", config.application.dry_run);
        println!("  Notion API: {}", config.notion.base_url);
        println!("  Notion Version: {}", config.notion.api_version);
        println!("  Database: {}", config.notion.database_id);
        println!("  Sort: {:?}", config.notion.sort);
        println!(
            "  Fields: date = {:?}, word count = {:?}",
            config.notion.fields.date, config.notion.fields.word_count
        );
        println!("  Retry Attempts: {}", config.notion.retry.max_attempts);
        println!("  Concurrency: {}", config.sync.concurrency);
        println!("  Advance Policy: {:?}", config.sync.advance_policy);
        println!(
            "  Output: {}/*.{}",
            config.export.output_dir, config.export.extension
        );
        println!("  State File: {}", config.state.path);
        println!("  Watermarks: {:?}", config.state.watermarks);
        println!();
        Ok(0)
    }
}
