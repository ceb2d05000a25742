//! Filesystem content store

use super::traits::ContentStore;
use crate::core::transform::sanitize::MAX_FILE_NAME_BYTES;
use crate::domain::{DiaryError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Writes each document to `<root>/<name>.<extension>`
#[derive(Debug, Clone)]
pub struct FileSystemStore {
    root: PathBuf,
    extension: String,
}

impl FileSystemStore {
    /// Store rooted at `root`; the directory is created on first write
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
        }
    }

    /// Output directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path a document name maps to
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}.{}", name, self.extension))
    }
}

#[async_trait]
impl ContentStore for FileSystemStore {
    async fn write(&self, name: &str, contents: &str) -> Result<()> {
        tokio::fs::create_dir_all(&self.root).await.map_err(|e| {
            DiaryError::ContentStore(format!(
                "Failed to create output directory {}: {}",
                self.root.display(),
                e
            ))
        })?;

        let path = self.path_for(name);
        tokio::fs::write(&path, contents).await.map_err(|e| {
            DiaryError::ContentStore(format!("Failed to write {}: {}", path.display(), e))
        })?;

        tracing::debug!(path = %path.display(), bytes = contents.len(), "Wrote document");
        Ok(())
    }

    /// Name budget left once `.<extension>` is appended
    fn max_name_bytes(&self) -> usize {
        MAX_FILE_NAME_BYTES
            .saturating_sub(self.extension.len() + 1)
            .max(1)
    }
}
