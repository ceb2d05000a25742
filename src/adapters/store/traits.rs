//! Content store abstraction
//!
//! Exported documents are written through [`ContentStore`] so the sync
//! engine does not depend on where documents end up.

use crate::core::transform::sanitize::MAX_FILE_NAME_BYTES;
use crate::domain::Result;
use async_trait::async_trait;

/// Destination for named text documents
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Write `contents` under `name`, replacing any previous document
    ///
    /// # Errors
    ///
    /// Returns `ContentStore` if the document cannot be written.
    async fn write(&self, name: &str, contents: &str) -> Result<()>;

    /// Longest `name` this store can accept, in bytes
    fn max_name_bytes(&self) -> usize {
        MAX_FILE_NAME_BYTES
    }
}
