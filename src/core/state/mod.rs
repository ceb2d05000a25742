// State management and watermark tracking

pub mod manager;
pub mod store;
pub mod watermark;

pub use manager::StateManager;
pub use store::{FileWatermarkStore, WatermarkStore};
pub use watermark::{hold_target, settled_before, WatermarkSet, BASELINE_MILLIS};
