//! Domain models and types for notion-diary.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`PageId`], [`DatabaseId`], [`DataSourceId`])
//! - **Records** with sum-typed properties ([`Record`], [`PropertyValue`])
//! - **Error types** ([`DiaryError`], [`NotionError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, DiaryError>`]:
//!
//! ```rust
//! use notion_diary::domain::{DiaryError, Result};
//!
//! fn example() -> Result<()> {
//!     Err(DiaryError::Validation("nothing to do".to_string()))
//! }
//! ```

pub mod errors;
pub mod ids;
pub mod record;
pub mod result;

pub use errors::{DiaryError, NotionError};
pub use ids::{DataSourceId, DatabaseId, PageId};
pub use record::{FieldMapping, Listing, PropertyValue, Record, RecordDetail, SortOrder};
pub use result::Result;
