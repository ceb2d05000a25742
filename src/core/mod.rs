//! Core sync logic for notion-diary.
//!
//! # Modules
//!
//! - [`retry`] - Retry policy with exponential backoff for remote calls
//! - [`state`] - Watermark state and its persistence
//! - [`sync`] - Listing, change selection, bounded execution and the run driver
//! - [`transform`] - Text counting, document rendering and file naming
//!
//! # Sync Workflow
//!
//! 1. **Load State**: Read the tracked watermarks
//! 2. **List**: Page through the whole data source
//! 3. **Select**: Keep records edited after any watermark
//! 4. **Process**: Fetch, render, export and write back each record
//! 5. **Checkpoint**: Advance and persist the watermarks
//!
//! # Example
//!
//! ```rust,no_run
//! use notion_diary::config::load_config;
//! use notion_diary::core::sync::SyncCoordinator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("notion-diary.toml")?;
//! let coordinator = SyncCoordinator::new(&config).await?;
//! let summary = coordinator.execute_sync().await?;
//!
//! println!("Selected: {}", summary.selected);
//! println!("Failed: {}", summary.failed);
//! # Ok(())
//! # }
//! ```

pub mod retry;
pub mod state;
pub mod sync;
pub mod transform;
