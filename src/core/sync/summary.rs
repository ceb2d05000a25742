//! Sync summary and reporting

use crate::core::state::WatermarkSet;
use crate::core::sync::executor::TaskOutcome;
use crate::core::sync::pipeline::PipelineReport;
use crate::domain::ids::PageId;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::time::Duration;

/// A record that failed to sync
#[derive(Debug, Clone)]
pub struct RecordFailure {
    /// Record id
    pub record_id: PageId,
    /// Edit time from the listing
    pub last_edited_time: DateTime<Utc>,
    /// Error message
    pub message: String,
}

/// Summary of a sync run
#[derive(Debug, Clone)]
pub struct SyncSummary {
    /// Records in the listing
    pub listed: usize,

    /// Records selected for processing
    pub selected: usize,

    /// Per-watermark selection counts
    pub per_watermark: BTreeMap<String, usize>,

    /// Records that completed every step
    pub succeeded: usize,

    /// Records that failed
    pub failed: usize,

    /// Documents written
    pub documents_written: usize,

    /// Counts that changed on write-back
    pub counts_changed: usize,

    /// Failed records
    pub failures: Vec<RecordFailure>,

    /// Watermarks loaded at the start of the run
    pub previous_watermarks: WatermarkSet,

    /// Watermarks after advancement
    pub watermarks: WatermarkSet,

    /// Whether the new watermarks were persisted
    pub persisted: bool,

    /// Run was a dry run
    pub dry_run: bool,

    /// Duration of the run
    pub duration: Duration,
}

impl SyncSummary {
    /// Create an empty summary
    pub fn new(previous_watermarks: WatermarkSet, dry_run: bool) -> Self {
        Self {
            listed: 0,
            selected: 0,
            per_watermark: BTreeMap::new(),
            succeeded: 0,
            failed: 0,
            documents_written: 0,
            counts_changed: 0,
            failures: Vec::new(),
            watermarks: previous_watermarks.clone(),
            previous_watermarks,
            persisted: false,
            dry_run,
            duration: Duration::ZERO,
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Fold one task outcome into the counts
    pub fn record_outcome(&mut self, outcome: TaskOutcome<(PageId, DateTime<Utc>), PipelineReport>) {
        match outcome {
            TaskOutcome::Succeeded { value, .. } => {
                self.succeeded += 1;
                if value.written {
                    self.documents_written += 1;
                }
                if value.updated && value.word_count != value.previous_word_count {
                    self.counts_changed += 1;
                }
            }
            TaskOutcome::Failed {
                key: (record_id, last_edited_time),
                error,
            } => {
                tracing::warn!(
                    record_id = %record_id,
                    error = %error,
                    "Record failed"
                );
                self.failed += 1;
                self.failures.push(RecordFailure {
                    record_id,
                    last_edited_time,
                    message: error.to_string(),
                });
            }
        }
    }

    /// Earliest listing edit time among failed records
    pub fn earliest_failed_edit(&self) -> Option<DateTime<Utc>> {
        self.failures.iter().map(|f| f.last_edited_time).min()
    }

    /// Check if every selected record synced
    pub fn is_successful(&self) -> bool {
        self.failed == 0
    }

    /// Get success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.selected == 0 {
            return 100.0;
        }
        (self.succeeded as f64 / self.selected as f64) * 100.0
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            listed = self.listed,
            selected = self.selected,
            succeeded = self.succeeded,
            failed = self.failed,
            documents_written = self.documents_written,
            counts_changed = self.counts_changed,
            persisted = self.persisted,
            dry_run = self.dry_run,
            duration_ms = self.duration.as_millis() as u64,
            success_rate = format!("{:.2}%", self.success_rate()),
            "Sync summary"
        );

        for (name, millis) in self.watermarks.iter() {
            tracing::info!(
                watermark = name,
                previous = self.previous_watermarks.get_millis(name),
                current = millis,
                "Watermark"
            );
        }

        if !self.failures.is_empty() {
            tracing::warn!(
                failure_count = self.failures.len(),
                "Sync completed with failures"
            );
            for failure in &self.failures {
                tracing::warn!(
                    record_id = %failure.record_id,
                    message = %failure.message,
                    "Sync failure"
                );
            }
        }
    }
}
