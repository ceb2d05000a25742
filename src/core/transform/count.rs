//! Character counting
//!
//! The derived "word count" of a diary page is the number of CJK unified
//! ideographs in its rendered body. Latin words, digits, punctuation and
//! whitespace are not counted.

/// Derives a number from rendered page text
pub trait TextCounter: Send + Sync {
    /// Count the units of interest in `text`
    fn count(&self, text: &str) -> u64;
}

/// Counts characters in the CJK Unified Ideographs block (U+4E00..=U+9FFF)
#[derive(Debug, Clone, Copy, Default)]
pub struct CjkCharacterCounter;

impl CjkCharacterCounter {
    fn is_counted(c: char) -> bool {
        ('\u{4e00}'..='\u{9fff}').contains(&c)
    }
}

impl TextCounter for CjkCharacterCounter {
    fn count(&self, text: &str) -> u64 {
        text.chars().filter(|c| Self::is_counted(*c)).count() as u64
    }
}
