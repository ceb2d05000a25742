//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "notion-diary.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing notion-diary configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        match fs::write(&self.output, Self::sample_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Share your diary database with a Notion integration");
                println!("  2. Set NOTION_DIARY_TOKEN in the environment or a .env file");
                println!("  3. Edit database_id and the property names in {}", self.output);
                println!("  4. Validate configuration: notion-diary validate-config");
                println!("  5. Run a dry run first: notion-diary sync --dry-run");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }

    /// Sample configuration with every section and its defaults
    pub fn sample_config() -> &'static str {
        r#"# notion-diary configuration
# Incremental export of a Notion diary database to Markdown files

[application]
log_level = "info"
dry_run = false

[notion]
token = "${NOTION_DIARY_TOKEN}"
database_id = "your-database-id"
base_url = "https://api.notion.com/v1"
api_version = "2025-09-03"
timeout_seconds = 60
sort = "date"  # date | last_edited

[notion.fields]
date = "Date"
word_count = "Word Count"

[notion.retry]
max_attempts = 5
initial_delay_ms = 1000
max_delay_ms = 30000
backoff_multiplier = 2.0
jitter = true

[sync]
concurrency = 3
advance_policy = "always"  # always | hold_failed

[export]
output_dir = "./diary"
extension = "md"

[state]
path = "./state.json"
watermarks = ["export", "wordCount"]

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"  # daily | hourly | never
"#
    }
}
