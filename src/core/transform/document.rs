//! Markdown document assembly
//!
//! Exported pages start with a YAML front matter block:
//!
//! ```text
//! ---
//! date: 2024-03-01
//! wordCount: 512
//! ---
//!
//! <page body>
//! ```
//!
//! The `date` line is omitted when the page has no date.

use std::fmt::Write;

/// Build the exported document for a page
///
/// # Examples
///
/// ```
/// use notion_diary::core::transform::render_document;
///
/// let doc = render_document(Some("2024-03-01"), 2, "你好");
/// assert_eq!(doc, "---\ndate: 2024-03-01\nwordCount: 2\n---\n\n你好");
/// ```
pub fn render_document(date: Option<&str>, word_count: u64, body: &str) -> String {
    let mut doc = String::with_capacity(body.len() + 48);
    doc.push_str("---\n");
    if let Some(date) = date.filter(|d| !d.trim().is_empty()) {
        let _ = writeln!(doc, "date: {}", date.trim());
    }
    let _ = writeln!(doc, "wordCount: {word_count}");
    doc.push_str("---\n\n");
    doc.push_str(body);
    doc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_front_matter_with_date() {
        let doc = render_document(Some("2024-03-01"), 12, "body\n");
        assert!(doc.starts_with("---\ndate: 2024-03-01\nwordCount: 12\n---\n\n"));
        assert!(doc.ends_with("body\n"));
    }

    #[test]
    fn test_front_matter_without_date() {
        assert_eq!(render_document(None, 0, ""), "---\nwordCount: 0\n---\n\n");
        assert_eq!(render_document(Some("  "), 3, "x"), "---\nwordCount: 3\n---\n\nx");
    }
}
