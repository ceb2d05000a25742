//! File name sanitization
//!
//! Names derived from page dates or ids must be valid on every platform the
//! export directory may be synced to.

use crate::domain::{DiaryError, Result};
use regex::Regex;
use std::sync::OnceLock;

/// Longest file name, extension included, most filesystems accept
pub const MAX_FILE_NAME_BYTES: usize = 255;

const FORBIDDEN_PATTERN: &str = r#"[/\\:*?"<>|\x00-\x1f\x7f]"#;

const RESERVED: [&str; 22] = [
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

fn forbidden() -> Result<&'static Regex> {
    static FORBIDDEN: OnceLock<Regex> = OnceLock::new();
    if let Some(re) = FORBIDDEN.get() {
        return Ok(re);
    }
    let re = Regex::new(FORBIDDEN_PATTERN)
        .map_err(|e| DiaryError::Validation(format!("Invalid file name pattern: {}", e)))?;
    Ok(FORBIDDEN.get_or_init(|| re))
}

/// Make `name` safe to use as a file stem of at most `max_bytes` bytes
///
/// Path separators, characters reserved on Windows and control characters
/// become `_`. Windows device names get a `_` after the stem, the result is
/// cut to `max_bytes` on a char boundary and trailing dots and spaces are
/// trimmed. An empty result becomes `_`.
///
/// Callers writing `<stem>.<ext>` pass the budget left after the extension,
/// see [`ContentStore::max_name_bytes`](crate::adapters::store::ContentStore::max_name_bytes).
///
/// # Examples
///
/// ```
/// use notion_diary::core::transform::sanitize_file_name;
///
/// assert_eq!(sanitize_file_name("2024-03-01", 252).unwrap(), "2024-03-01");
/// assert_eq!(sanitize_file_name("2024-03-01T10:00", 252).unwrap(), "2024-03-01T10_00");
/// ```
pub fn sanitize_file_name(name: &str, max_bytes: usize) -> Result<String> {
    let mut cleaned = forbidden()?
        .replace_all(name.trim(), "_")
        .trim_end_matches(['.', ' '])
        .to_string();

    let stem_len = cleaned.split('.').next().map_or(0, str::len);
    if RESERVED.contains(&cleaned[..stem_len].to_ascii_uppercase().as_str()) {
        cleaned.insert(stem_len, '_');
    }

    if cleaned.len() > max_bytes {
        let mut end = max_bytes;
        while !cleaned.is_char_boundary(end) {
            end -= 1;
        }
        cleaned.truncate(end);
        cleaned.truncate(cleaned.trim_end_matches(['.', ' ']).len());
    }

    if cleaned.is_empty() {
        Ok("_".to_string())
    } else {
        Ok(cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("2024-03-01", "2024-03-01" ; "plain date")]
    #[test_case("a/b\\c", "a_b_c" ; "path separators")]
    #[test_case("what?*<>|\"", "what______" ; "windows reserved characters")]
    #[test_case("tab\there", "tab_here" ; "control characters")]
    #[test_case("trailing. . ", "trailing" ; "trailing dots and spaces")]
    #[test_case("", "_" ; "empty")]
    #[test_case("...", "_" ; "only dots")]
    #[test_case("con", "con_" ; "device name")]
    #[test_case("LPT1.md", "LPT1_.md" ; "device name with extension")]
    #[test_case("日记 2024", "日记 2024" ; "unicode kept")]
    fn test_sanitize(input: &str, expected: &str) {
        assert_eq!(sanitize_file_name(input, MAX_FILE_NAME_BYTES).unwrap(), expected);
    }

    #[test]
    fn test_truncates_on_char_boundary() {
        let long = "日".repeat(100);
        let out = sanitize_file_name(&long, MAX_FILE_NAME_BYTES).unwrap();
        assert!(out.len() <= MAX_FILE_NAME_BYTES);
        assert_eq!(out.chars().count(), 85);
    }

    #[test]
    fn test_truncation_respects_smaller_budget() {
        let out = sanitize_file_name(&"a".repeat(300), 252).unwrap();
        assert_eq!(out.len(), 252);
    }

    #[test]
    fn test_truncation_does_not_leave_trailing_dot() {
        let name = format!("{}.rest", "a".repeat(9));
        assert_eq!(sanitize_file_name(&name, 10).unwrap(), "aaaaaaaaa");
    }
}
