//! Sync coordinator - main orchestrator for a sync run
//!
//! Wires the paginator, change selector, bounded executor and record
//! pipeline together and owns watermark advancement.

use crate::adapters::notion::NotionClient;
use crate::adapters::store::FileSystemStore;
use crate::config::{AdvancePolicy, DiaryConfig};
use crate::core::retry::{Retrier, RetryPolicy};
use crate::core::state::{hold_target, FileWatermarkStore, StateManager};
use crate::core::sync::context::SyncContext;
use crate::core::sync::executor::BoundedExecutor;
use crate::core::sync::paginator::Paginator;
use crate::core::sync::pipeline::RecordPipeline;
use crate::core::sync::selector::select_changes;
use crate::core::sync::summary::SyncSummary;
use crate::domain::record::SortOrder;
use crate::domain::Result;
use std::sync::Arc;
use std::time::Instant;

/// Run-level settings that are not part of the context
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Label for log output
    pub database_id: String,
    /// Listing order
    pub sort: SortOrder,
    /// Maximum records in flight
    pub concurrency: usize,
    /// Watermark advancement policy
    pub advance_policy: AdvancePolicy,
}

impl SyncOptions {
    /// Options taken from configuration
    pub fn from_config(config: &DiaryConfig) -> Self {
        Self {
            database_id: config.notion.database_id.clone(),
            sort: config.notion.sort,
            concurrency: config.sync.concurrency,
            advance_policy: config.sync.advance_policy,
        }
    }
}

/// Sync coordinator
pub struct SyncCoordinator {
    context: SyncContext,
    state_manager: Arc<StateManager>,
    executor: BoundedExecutor,
    options: SyncOptions,
}

impl SyncCoordinator {
    /// Create a coordinator from configuration
    ///
    /// Connects to Notion and resolves the data source, so failures here are
    /// initialization failures.
    pub async fn new(config: &DiaryConfig) -> Result<Self> {
        let retrier = Retrier::new(RetryPolicy::from(&config.notion.retry));

        let source = Arc::new(NotionClient::connect(&config.notion, &retrier).await?);
        let store = Arc::new(FileSystemStore::new(
            &config.export.output_dir,
            config.export.extension.clone(),
        ));
        let state_manager = Arc::new(StateManager::new(
            Arc::new(FileWatermarkStore::new(&config.state.path)),
            config.state.watermarks.clone(),
        ));

        let context = SyncContext::new(source, store, retrier, config.notion.fields.mapping())
            .with_dry_run(config.application.dry_run);

        Self::with_components(context, state_manager, SyncOptions::from_config(config))
    }

    /// Create a coordinator from already built components
    ///
    /// # Errors
    ///
    /// Returns `Validation` when the concurrency is zero.
    pub fn with_components(
        context: SyncContext,
        state_manager: Arc<StateManager>,
        options: SyncOptions,
    ) -> Result<Self> {
        let executor = BoundedExecutor::new(options.concurrency)?;
        Ok(Self {
            context,
            state_manager,
            executor,
            options,
        })
    }

    /// Execute one sync run
    ///
    /// 1. Loads the tracked watermarks
    /// 2. Lists every record
    /// 3. Selects records edited after any watermark
    /// 4. Runs the pipeline for each selected record, bounded by the
    ///    configured concurrency, and waits for all of them
    /// 5. Advances every watermark to just before the minute the listing was
    ///    fetched in, or holds it before the earliest failure under `HoldFailed`
    /// 6. Persists the watermarks unless this is a dry run
    ///
    /// # Errors
    ///
    /// Watermark load, listing and watermark persistence failures abort the
    /// run. Per-record failures are only counted in the summary.
    pub async fn execute_sync(&self) -> Result<SyncSummary> {
        let start_time = Instant::now();
        let dry_run = self.context.dry_run;

        crate::log_sync_start!(self.options.database_id, self.executor.max_in_flight(), dry_run);

        let names = self.state_manager.names().to_vec();
        let previous = self.state_manager.load_watermarks().await?;
        let mut summary = SyncSummary::new(previous.clone(), dry_run);

        let listing = Paginator::new(&self.context)
            .list_all(self.options.sort)
            .await?;
        summary.listed = listing.len();

        let changes = select_changes(&listing, &previous, &names);
        summary.selected = changes.len();
        summary.per_watermark = changes.per_watermark.clone();

        tracing::info!(
            listed = summary.listed,
            selected = summary.selected,
            "Selected changed records"
        );

        let pipeline = RecordPipeline::new(&self.context);
        let tasks = changes.records.into_iter().map(|record| {
            let key = (record.id.clone(), record.last_edited_time);
            (key, pipeline.process(record))
        });

        for outcome in self.executor.run_all(tasks).await {
            summary.record_outcome(outcome);
        }

        let held = match self.options.advance_policy {
            AdvancePolicy::Always => None,
            AdvancePolicy::HoldFailed => summary.earliest_failed_edit(),
        };
        let target = hold_target(listing.fetch_time, held);
        let mut next = previous;
        next.advance_all(&names, target);
        summary.watermarks = next;

        if dry_run {
            tracing::info!(
                target = %target.to_rfc3339(),
                "Dry run: watermarks not persisted"
            );
        } else {
            self.state_manager.checkpoint(&summary.watermarks).await?;
            summary.persisted = true;
        }

        let summary = summary.with_duration(start_time.elapsed());
        crate::log_sync_complete!(summary.succeeded, summary.failed, summary.duration);
        Ok(summary)
    }
}
