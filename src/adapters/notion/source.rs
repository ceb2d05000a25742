//! Remote record source trait
//!
//! [`RecordSource`] is the seam between the sync engine and Notion. The
//! engine only sees pages of [`Record`]s, single records, a number
//! write-back and rendered page text; tests substitute an in-memory source.

use crate::domain::ids::PageId;
use crate::domain::record::{Record, SortOrder};
use crate::domain::Result;
use async_trait::async_trait;

/// One page of a cursor-paginated listing
#[derive(Debug, Clone, Default)]
pub struct RecordPage {
    /// Records in remote order
    pub results: Vec<Record>,
    /// Cursor for the next page; `None` when this was the last page
    pub next_cursor: Option<String>,
}

/// Remote data source of diary records
///
/// Implementations perform a single remote attempt per call; retrying is
/// the caller's concern.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetch one page of the listing, starting at `cursor` (or the beginning)
    async fn query_page(&self, cursor: Option<&str>, sort: SortOrder) -> Result<RecordPage>;

    /// Fetch the current state of one record
    async fn fetch_record(&self, id: &PageId) -> Result<Record>;

    /// Set a number property, leaving every other property untouched
    async fn update_number(&self, id: &PageId, property: &str, value: u64) -> Result<()>;

    /// Render the record body to plain text
    async fn render_text(&self, id: &PageId) -> Result<String>;
}
