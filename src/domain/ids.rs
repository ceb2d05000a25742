//! Domain identifier types with validation
//!
//! Newtype wrappers for Notion identifiers. Notion ids are UUIDs, rendered
//! with or without hyphens depending on the endpoint; both forms are accepted
//! and kept verbatim.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Page identifier
///
/// Identifies one record (diary page) within a data source.
///
/// # Examples
///
/// ```
/// use notion_diary::domain::ids::PageId;
/// use std::str::FromStr;
///
/// let id = PageId::from_str("59833787-2cf9-4fdf-8782-e53db20768a5").unwrap();
/// assert_eq!(id.as_str(), "59833787-2cf9-4fdf-8782-e53db20768a5");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PageId(String);

impl PageId {
    /// Creates a new PageId, rejecting blank input
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Page ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the page ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PageId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for PageId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Database identifier, as configured by the user
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatabaseId(String);

impl DatabaseId {
    /// Creates a new DatabaseId, rejecting blank input
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Database ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the database ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DatabaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DatabaseId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Data source identifier
///
/// Resolved at startup from the database descriptor; queries run against
/// the data source, not the database.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DataSourceId(String);

impl DataSourceId {
    /// Creates a new DataSourceId, rejecting blank input
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Data source ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the data source ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DataSourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_id_valid() {
        let id = PageId::new("59833787-2cf9-4fdf-8782-e53db20768a5").unwrap();
        assert_eq!(id.to_string(), "59833787-2cf9-4fdf-8782-e53db20768a5");
    }

    #[test]
    fn test_page_id_empty() {
        assert!(PageId::new("").is_err());
        assert!(PageId::from_str("   ").is_err());
    }

    #[test]
    fn test_database_and_data_source_ids() {
        assert!(DatabaseId::new("db").is_ok());
        assert!(DatabaseId::new("").is_err());
        assert_eq!(DataSourceId::new("ds-1").unwrap().as_str(), "ds-1");
        assert!(DataSourceId::new(" ").is_err());
    }

    #[test]
    fn test_page_id_serde_is_transparent_string() {
        let id = PageId::new("abc").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");
    }
}
