//! Result type alias for notion-diary

use super::errors::DiaryError;

/// Result type alias for notion-diary operations
///
/// # Examples
///
/// ```
/// use notion_diary::domain::result::Result;
/// use notion_diary::domain::errors::DiaryError;
///
/// fn failing_function() -> Result<()> {
///     Err(DiaryError::Validation("Invalid input".to_string()))
/// }
///
/// assert!(failing_function().is_err());
/// ```
pub type Result<T> = std::result::Result<T, DiaryError>;
