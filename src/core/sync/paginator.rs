//! Full listing of the data source by cursor pagination

use crate::core::sync::context::SyncContext;
use crate::domain::record::{Listing, SortOrder};
use crate::domain::Result;
use chrono::Utc;

/// Walks every page of the data source in order
pub struct Paginator<'a> {
    ctx: &'a SyncContext,
}

impl<'a> Paginator<'a> {
    /// Paginator over the context's source
    pub fn new(ctx: &'a SyncContext) -> Self {
        Self { ctx }
    }

    /// Fetch the complete listing
    ///
    /// `fetch_time` is taken before the first request. Pages are requested
    /// one after another, each through the retrier, until the source reports
    /// no further cursor. An empty page that still carries a cursor does not
    /// end the walk.
    ///
    /// # Errors
    ///
    /// Any page that fails after retries fails the whole listing.
    pub async fn list_all(&self, sort: SortOrder) -> Result<Listing> {
        let fetch_time = Utc::now();
        let mut entries = Vec::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let page = self
                .ctx
                .retrier
                .call("query_page", || {
                    self.ctx.source.query_page(cursor.as_deref(), sort)
                })
                .await?;
            pages += 1;

            tracing::debug!(
                page = pages,
                records = page.results.len(),
                "Listed page"
            );
            entries.extend(page.results);

            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        tracing::info!(pages, records = entries.len(), "Listing complete");
        Ok(Listing {
            entries,
            fetch_time,
        })
    }
}
