//! Incremental sync engine
//!
//! - [`context`] - collaborators shared by one run
//! - [`paginator`] - full cursor-paginated listing
//! - [`selector`] - watermark-based change selection
//! - [`executor`] - bounded concurrent task execution
//! - [`pipeline`] - per-record fetch, export and write-back
//! - [`coordinator`] - the run itself and watermark advancement
//! - [`summary`] - run reporting

pub mod context;
pub mod coordinator;
pub mod executor;
pub mod paginator;
pub mod pipeline;
pub mod selector;
pub mod summary;

pub use context::SyncContext;
pub use coordinator::{SyncCoordinator, SyncOptions};
pub use executor::{BoundedExecutor, TaskOutcome};
pub use paginator::Paginator;
pub use pipeline::{PipelineReport, RecordPipeline};
pub use selector::{select_changes, ChangeSet};
pub use summary::{RecordFailure, SyncSummary};
