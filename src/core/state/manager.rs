//! State manager for watermark persistence
//!
//! This module provides the StateManager for loading and checkpointing the
//! configured set of watermarks through a [`WatermarkStore`] backend.

use crate::core::state::store::WatermarkStore;
use crate::core::state::watermark::WatermarkSet;
use crate::domain::Result;
use std::sync::Arc;

/// State manager for watermark persistence
///
/// Knows which watermark names are tracked and delegates storage to the
/// backend.
pub struct StateManager {
    store: Arc<dyn WatermarkStore>,
    names: Vec<String>,
}

impl StateManager {
    /// Create a new StateManager tracking `names`
    pub fn new(store: Arc<dyn WatermarkStore>, names: Vec<String>) -> Self {
        Self { store, names }
    }

    /// Tracked watermark names
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Load the tracked watermarks; missing ones read as the baseline
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot read existing state.
    pub async fn load_watermarks(&self) -> Result<WatermarkSet> {
        let watermarks = self.store.load(&self.names).await?;
        for (name, millis) in watermarks.iter() {
            tracing::debug!(watermark = name, millis, "Loaded watermark");
        }
        Ok(watermarks)
    }

    /// Persist the watermarks after a completed run
    ///
    /// # Errors
    ///
    /// Returns an error if the backend write fails; the previous state is
    /// left in place.
    pub async fn checkpoint(&self, watermarks: &WatermarkSet) -> Result<()> {
        tracing::info!(
            watermarks = ?watermarks.iter().collect::<Vec<_>>(),
            "Checkpointing watermarks"
        );
        self.store.save(watermarks).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::store::FileWatermarkStore;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_checkpoint_round_trip_through_manager() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(FileWatermarkStore::new(dir.path().join("state.json")));
        let manager = StateManager::new(store, vec!["export".to_string()]);

        let initial = manager.load_watermarks().await.unwrap();
        assert_eq!(initial.get_millis("export"), 0);

        manager
            .checkpoint(&initial.with_millis("export", 77))
            .await
            .unwrap();
        assert_eq!(manager.load_watermarks().await.unwrap().get_millis("export"), 77);
        assert_eq!(manager.names(), ["export".to_string()]);
    }
}
