//! Exported document storage

pub mod filesystem;
pub mod traits;

pub use filesystem::FileSystemStore;
pub use traits::ContentStore;
