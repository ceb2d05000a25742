//! Sync command implementation
//!
//! This module implements the `sync` command, which exports changed diary
//! pages and writes their counts back to Notion.

use crate::config::{read_config, validate_config, DiaryConfig};
use crate::core::sync::{SyncCoordinator, SyncSummary};
use crate::domain::Result;
use clap::Args;

/// Failures shown before the rest are elided
const MAX_LISTED_FAILURES: usize = 10;

/// Arguments for the sync command
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Dry run mode - list and fetch without writing files, counts or state
    #[arg(long)]
    pub dry_run: bool,

    /// Exit with status 1 when any record failed
    #[arg(long)]
    pub strict: bool,

    /// Override the number of records processed concurrently
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,
}

impl SyncArgs {
    /// Execute the sync command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting sync command");

        let config = match self.prepare_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                crate::log_error_with_context!(&e, "Failed to prepare configuration");
                eprintln!("{e}");
                return Ok(2);
            }
        };

        if config.application.dry_run {
            println!("🔍 DRY RUN MODE - No files, counts or watermarks will be written");
            println!();
        }

        let coordinator = match SyncCoordinator::new(&config).await {
            Ok(c) => c,
            Err(e) => {
                crate::log_error_with_context!(&e, "Failed to create sync coordinator");
                eprintln!("Failed to initialize sync: {e}");
                return Ok(4);
            }
        };

        println!("🚀 Starting sync...");
        println!();

        let summary = match coordinator.execute_sync().await {
            Ok(s) => s,
            Err(e) => {
                crate::log_error_with_context!(&e, "Sync failed");
                eprintln!("Sync failed: {e}");
                return Ok(5);
            }
        };

        summary.log_summary();
        print_summary(&summary);

        Ok(exit_code(&summary, self.strict))
    }

    /// Read the configuration, apply the CLI overrides, then validate
    fn prepare_config(&self, config_path: &str) -> Result<DiaryConfig> {
        let mut config = read_config(config_path)?;

        if let Some(concurrency) = self.concurrency {
            tracing::info!(concurrency, "Overriding concurrency from CLI");
            config.sync.concurrency = concurrency;
        }

        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }

        validate_config(&config)?;
        Ok(config)
    }
}

fn print_summary(summary: &SyncSummary) {
    println!("📊 Sync Summary:");
    println!("  Listed: {}", summary.listed);
    println!("  Selected: {}", summary.selected);
    for (name, count) in &summary.per_watermark {
        println!("    via {name}: {count}");
    }
    println!("  Succeeded: {}", summary.succeeded);
    println!("  Failed: {}", summary.failed);
    println!("  Documents Written: {}", summary.documents_written);
    println!("  Counts Changed: {}", summary.counts_changed);
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!("  Success Rate: {:.2}%", summary.success_rate());
    println!();

    println!("🕒 Watermarks{}:", if summary.persisted { "" } else { " (not saved)" });
    for (name, millis) in summary.watermarks.iter() {
        println!(
            "  {name}: {} -> {}",
            summary.previous_watermarks.get(name).to_rfc3339(),
            summary.watermarks.get(name).to_rfc3339()
        );
        tracing::debug!(watermark = name, millis, "Reported watermark");
    }
    println!();

    if !summary.failures.is_empty() {
        println!("⚠️  Failed records:");
        for failure in summary.failures.iter().take(MAX_LISTED_FAILURES) {
            println!("  - {}: {}", failure.record_id, failure.message);
        }
        if summary.failures.len() > MAX_LISTED_FAILURES {
            println!(
                "  ... and {} more failures",
                summary.failures.len() - MAX_LISTED_FAILURES
            );
        }
        println!();
    }
}

/// Exit status for a finished run
///
/// Record failures only change the status under `--strict`.
pub fn exit_code(summary: &SyncSummary, strict: bool) -> i32 {
    if summary.is_successful() {
        println!("✅ Sync completed successfully!");
        0
    } else if strict {
        println!("⚠️  Sync completed with failures");
        1
    } else {
        println!("⚠️  Sync completed with failures (not fatal without --strict)");
        0
    }
}
