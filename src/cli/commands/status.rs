//! Status command implementation
//!
//! This module implements the `status` command for displaying the stored
//! watermarks.

use crate::config::load_config;
use crate::core::state::{FileWatermarkStore, StateManager, BASELINE_MILLIS};
use clap::Args;
use std::sync::Arc;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Show a single watermark
    #[arg(long)]
    pub watermark: Option<String>,
}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Checking sync status");

        println!("📊 Sync Status");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let names: Vec<String> = match &self.watermark {
            Some(name) if !config.state.watermarks.contains(name) => {
                println!("❌ Unknown watermark: {name}");
                println!("   Tracked: {:?}", config.state.watermarks);
                return Ok(2);
            }
            Some(name) => vec![name.clone()],
            None => config.state.watermarks.clone(),
        };

        let state_manager = StateManager::new(
            Arc::new(FileWatermarkStore::new(&config.state.path)),
            names.clone(),
        );

        let watermarks = match state_manager.load_watermarks().await {
            Ok(w) => w,
            Err(e) => {
                println!("❌ Failed to load watermarks");
                println!("   Error: {e}");
                return Ok(5);
            }
        };

        println!("State file: {}", config.state.path);
        println!();
        println!("{:<20} {:<16} {:<30}", "Watermark", "Millis", "Last Sync");
        println!("{}", "-".repeat(66));

        for name in &names {
            let millis = watermarks.get_millis(name);
            let last_sync = if millis == BASELINE_MILLIS {
                "Never".to_string()
            } else {
                watermarks.get(name).format("%Y-%m-%d %H:%M:%S%.3f UTC").to_string()
            };
            println!("{name:<20} {millis:<16} {last_sync:<30}");
        }

        println!();
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_args_defaults() {
        let args = StatusArgs { watermark: None };
        assert!(args.watermark.is_none());
    }

    #[tokio::test]
    async fn test_status_reads_state_file() {
        let dir = tempfile::tempdir().unwrap();
        let state_path = dir.path().join("state.json");
        std::fs::write(&state_path, r#"{"last":{"export":1000,"wordCount":2000}}"#).unwrap();

        let config_path = dir.path().join("notion-diary.toml");
        std::fs::write(
            &config_path,
            format!(
                "[notion]\ntoken = \"secret_x\"\ndatabase_id = \"db\"\n\n[state]\npath = \"{}\"\n",
                state_path.display()
            ),
        )
        .unwrap();

        let args = StatusArgs { watermark: None };
        let code = args.execute(config_path.to_str().unwrap()).await.unwrap();
        assert_eq!(code, 0);

        let unknown = StatusArgs {
            watermark: Some("nope".to_string()),
        };
        let code = unknown.execute(config_path.to_str().unwrap()).await.unwrap();
        assert_eq!(code, 2);
    }
}
