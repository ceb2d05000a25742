//! Per-record processing
//!
//! Fetch, render, count, export and write back one selected record. Each
//! remote or store step goes through the context's retrier on its own, so a
//! transient failure late in the pipeline does not repeat earlier steps.

use crate::core::sync::context::SyncContext;
use crate::core::transform::{render_document, sanitize_file_name};
use crate::domain::ids::PageId;
use crate::domain::record::{Record, RecordDetail};
use crate::domain::Result;

/// What happened to one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    /// Record id
    pub id: PageId,
    /// Sanitized document name
    pub document_name: String,
    /// Count derived from the rendered text
    pub word_count: u64,
    /// Count stored remotely before this run
    pub previous_word_count: u64,
    /// Whether the document was written
    pub written: bool,
    /// Whether the count was written back; false when it already matched
    pub updated: bool,
}

/// Processes selected records against one context
pub struct RecordPipeline<'a> {
    ctx: &'a SyncContext,
}

impl<'a> RecordPipeline<'a> {
    pub fn new(ctx: &'a SyncContext) -> Self {
        Self { ctx }
    }

    /// Run every step for `record`
    ///
    /// # Errors
    ///
    /// The first failing step fails the record with that step's error.
    /// Steps already completed are not rolled back.
    pub async fn process(&self, record: Record) -> Result<PipelineReport> {
        let ctx = self.ctx;
        let id = record.id;

        let fetched = ctx
            .retrier
            .call("fetch_record", || ctx.source.fetch_record(&id))
            .await?;
        let detail = RecordDetail::from_record(fetched, &ctx.fields)?;

        let text = ctx
            .retrier
            .call("render_text", || ctx.source.render_text(&id))
            .await?;
        let word_count = ctx.counter.count(&text);

        let document = render_document(detail.date.as_deref(), word_count, &text);
        let document_name =
            sanitize_file_name(&detail.document_name(), ctx.store.max_name_bytes())?;

        let mut report = PipelineReport {
            id: id.clone(),
            document_name,
            word_count,
            previous_word_count: detail.word_count,
            written: false,
            updated: false,
        };

        if ctx.dry_run {
            tracing::info!(
                record_id = %id,
                document = %report.document_name,
                bytes = document.len(),
                word_count,
                previous = detail.word_count,
                "Dry run: skipping document write and count update"
            );
            return Ok(report);
        }

        ctx.retrier
            .call("write_document", || {
                ctx.store.write(&report.document_name, &document)
            })
            .await?;
        report.written = true;

        // Writing back bumps last_edited_time; an unchanged count must not
        // make the page look edited again on the next run.
        if word_count == detail.word_count {
            tracing::debug!(record_id = %id, word_count, "Count unchanged, not written back");
        } else {
            ctx.retrier
                .call("update_number", || {
                    ctx.source.update_number(&id, &ctx.fields.word_count, word_count)
                })
                .await?;
            report.updated = true;
        }

        tracing::debug!(
            record_id = %id,
            document = %report.document_name,
            word_count,
            previous = detail.word_count,
            "Record synced"
        );
        Ok(report)
    }
}
