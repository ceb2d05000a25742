// notion-diary - Incremental Notion diary export
// Copyright (c) 2025 notion-diary Contributors
// Licensed under the MIT License

//! # notion-diary - Incremental Notion diary export
//!
//! notion-diary pages through a Notion diary database, picks the pages edited
//! since the last run, exports each one to a Markdown file with front matter
//! and writes a derived character count back to the page.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Sync engine (retry, state, sync, transform)
//! - [`adapters`] - External integrations (Notion, file output)
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use notion_diary::config::load_config;
//! use notion_diary::core::sync::SyncCoordinator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("notion-diary.toml")?;
//!     let coordinator = SyncCoordinator::new(&config).await?;
//!     let summary = coordinator.execute_sync().await?;
//!
//!     println!("Synced {} of {} changed pages", summary.succeeded, summary.selected);
//!     Ok(())
//! }
//! ```
//!
//! ## Incremental Sync
//!
//! Each run compares page edit times against a set of named watermarks
//! (`export` and `wordCount` by default) kept in a small JSON file. A page
//! newer than any watermark is processed; after every selected page has
//! settled, all watermarks move to the time the listing started.
//!
//! ```rust,no_run
//! use notion_diary::core::state::{FileWatermarkStore, StateManager};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let names = vec!["export".to_string(), "wordCount".to_string()];
//! let state = StateManager::new(Arc::new(FileWatermarkStore::new("state.json")), names);
//! let watermarks = state.load_watermarks().await?;
//! println!("last export: {}", watermarks.get("export"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! The library reports errors as [`domain::DiaryError`]; `anyhow` is only
//! used by the command layer.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
