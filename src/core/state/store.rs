//! Watermark persistence
//!
//! [`FileWatermarkStore`] keeps the watermarks in a small JSON document:
//!
//! ```json
//! { "last": { "export": 1700000000000, "wordCount": 1700000000000 } }
//! ```
//!
//! Saves write a temporary file next to the target and rename it over the
//! target, so a crash mid-save leaves the previous document intact.

use crate::core::state::watermark::WatermarkSet;
use crate::domain::{DiaryError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Storage backend for watermarks
#[async_trait]
pub trait WatermarkStore: Send + Sync {
    /// Load the persisted watermarks
    ///
    /// Every name in `names` is present in the result; names never persisted
    /// read as the baseline.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceFailure` if existing state cannot be read or parsed.
    async fn load(&self, names: &[String]) -> Result<WatermarkSet>;

    /// Replace the persisted watermarks wholesale
    ///
    /// # Errors
    ///
    /// Returns `PersistenceFailure` if the state cannot be written.
    async fn save(&self, watermarks: &WatermarkSet) -> Result<()>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StateDocument {
    #[serde(default)]
    last: WatermarkSet,
}

/// JSON file watermark store with atomic replace
#[derive(Debug, Clone)]
pub struct FileWatermarkStore {
    path: PathBuf,
}

impl FileWatermarkStore {
    /// Store backed by the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the state file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn persistence(context: &str, path: &Path, err: impl std::fmt::Display) -> DiaryError {
    DiaryError::PersistenceFailure(format!("{context} {}: {err}", path.display()))
}

fn write_atomically(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir).map_err(|e| persistence("Failed to create", &dir, e))?;

    let mut temp = tempfile::NamedTempFile::new_in(&dir)
        .map_err(|e| persistence("Failed to create temp file in", &dir, e))?;
    temp.write_all(contents)
        .and_then(|_| temp.flush())
        .and_then(|_| temp.as_file().sync_all())
        .map_err(|e| persistence("Failed to write temp file for", path, e))?;
    temp.persist(path)
        .map_err(|e| persistence("Failed to replace", path, e.error))?;
    Ok(())
}

#[async_trait]
impl WatermarkStore for FileWatermarkStore {
    async fn load(&self, names: &[String]) -> Result<WatermarkSet> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "No watermark state yet, starting from baseline");
                return Ok(WatermarkSet::baseline(names));
            }
            Err(e) => return Err(persistence("Failed to read", &self.path, e)),
        };

        let document: StateDocument = serde_json::from_str(&contents)
            .map_err(|e| persistence("Failed to parse", &self.path, e))?;

        let mut watermarks = document.last;
        watermarks.fill_missing(names);
        Ok(watermarks)
    }

    async fn save(&self, watermarks: &WatermarkSet) -> Result<()> {
        let document = StateDocument {
            last: watermarks.clone(),
        };
        let mut contents = serde_json::to_vec_pretty(&document)
            .map_err(|e| persistence("Failed to serialize state for", &self.path, e))?;
        contents.push(b'\n');

        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_atomically(&path, &contents))
            .await
            .map_err(|e| persistence("Save task failed for", &self.path, e))?
    }
}
