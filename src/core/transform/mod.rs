//! Text transformation for exported diary pages
//!
//! - [`count`] derives the character count written back to Notion
//! - [`document`] assembles the Markdown document with its front matter
//! - [`sanitize`] turns a page date into a portable file name

pub mod count;
pub mod document;
pub mod sanitize;

pub use count::{CjkCharacterCounter, TextCounter};
pub use document::render_document;
pub use sanitize::{sanitize_file_name, MAX_FILE_NAME_BYTES};
