//! Run context shared by the sync components
//!
//! Built once per run and handed to the paginator and each record pipeline.
//! Everything a component talks to is reachable from here, so tests can
//! substitute the source, the store or the counter.

use crate::adapters::notion::RecordSource;
use crate::adapters::store::ContentStore;
use crate::core::retry::Retrier;
use crate::core::transform::{CjkCharacterCounter, TextCounter};
use crate::domain::record::FieldMapping;
use std::sync::Arc;

/// Collaborators and settings for one sync run
#[derive(Clone)]
pub struct SyncContext {
    /// Remote record source
    pub source: Arc<dyn RecordSource>,
    /// Destination for exported documents
    pub store: Arc<dyn ContentStore>,
    /// Retry policy for every remote step
    pub retrier: Retrier,
    /// Property names read and written
    pub fields: FieldMapping,
    /// Derives the number written back
    pub counter: Arc<dyn TextCounter>,
    /// Skip writes when set
    pub dry_run: bool,
}

impl SyncContext {
    /// Context with the CJK character counter and dry run off
    pub fn new(
        source: Arc<dyn RecordSource>,
        store: Arc<dyn ContentStore>,
        retrier: Retrier,
        fields: FieldMapping,
    ) -> Self {
        Self {
            source,
            store,
            retrier,
            fields,
            counter: Arc::new(CjkCharacterCounter),
            dry_run: false,
        }
    }

    /// Replace the text counter
    pub fn with_counter(mut self, counter: Arc<dyn TextCounter>) -> Self {
        self.counter = counter;
        self
    }

    /// Enable or disable dry run
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}
