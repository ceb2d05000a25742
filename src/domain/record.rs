//! Records, typed properties and listings
//!
//! A [`Record`] is one page of the diary data source. Its properties are
//! modelled as a sum type over the declared property kinds so that reading a
//! field with the wrong kind fails with [`DiaryError::SchemaMismatch`]
//! instead of silently producing a default.

use crate::domain::errors::DiaryError;
use crate::domain::ids::PageId;
use crate::domain::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kind tag for a date property
pub const KIND_DATE: &str = "date";
/// Kind tag for a number property
pub const KIND_NUMBER: &str = "number";

/// A typed property value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PropertyValue {
    /// Date property; `start` is the ISO date or datetime, if set
    Date {
        /// Start of the date range
        start: Option<String>,
    },
    /// Number property
    Number {
        /// Value, if set
        value: Option<f64>,
    },
    /// Title or rich text, flattened to plain text
    Text {
        /// Concatenated plain text
        text: String,
    },
    /// Any other declared kind; the value is not interpreted
    Other {
        /// Declared kind tag
        declared: String,
    },
}

impl PropertyValue {
    /// Declared kind tag of this value
    pub fn kind(&self) -> &str {
        match self {
            PropertyValue::Date { .. } => KIND_DATE,
            PropertyValue::Number { .. } => KIND_NUMBER,
            PropertyValue::Text { .. } => "text",
            PropertyValue::Other { declared } => declared,
        }
    }
}

/// One remote entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Stable unique identifier
    pub id: PageId,

    /// Creation time
    pub created_time: DateTime<Utc>,

    /// Last modification time; drives change detection
    pub last_edited_time: DateTime<Utc>,

    /// Typed properties by name
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyValue>,
}

impl Record {
    /// Create a record with no properties
    pub fn new(id: PageId, created_time: DateTime<Utc>, last_edited_time: DateTime<Utc>) -> Self {
        Self {
            id,
            created_time,
            last_edited_time,
            properties: BTreeMap::new(),
        }
    }

    /// Add a property
    pub fn with_property(mut self, name: impl Into<String>, value: PropertyValue) -> Self {
        self.properties.insert(name.into(), value);
        self
    }

    /// Read a date property
    ///
    /// # Errors
    ///
    /// Returns `SchemaMismatch` if the property is missing or is not a date.
    pub fn date_property(&self, name: &str) -> Result<Option<&str>> {
        match self.properties.get(name) {
            Some(PropertyValue::Date { start }) => Ok(start.as_deref()),
            other => Err(self.mismatch(name, KIND_DATE, other)),
        }
    }

    /// Read a number property
    ///
    /// # Errors
    ///
    /// Returns `SchemaMismatch` if the property is missing or is not a number.
    pub fn number_property(&self, name: &str) -> Result<Option<f64>> {
        match self.properties.get(name) {
            Some(PropertyValue::Number { value }) => Ok(*value),
            other => Err(self.mismatch(name, KIND_NUMBER, other)),
        }
    }

    fn mismatch(&self, field: &str, expected: &str, found: Option<&PropertyValue>) -> DiaryError {
        DiaryError::SchemaMismatch {
            record_id: self.id.to_string(),
            field: field.to_string(),
            expected: expected.to_string(),
            actual: found.map_or_else(|| "missing".to_string(), |v| v.kind().to_string()),
        }
    }
}

/// Remote sort order used while paginating the data source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SortOrder {
    /// Descending by the configured date property
    #[default]
    #[serde(rename = "date")]
    DateDescending,
    /// Descending by last edit time
    #[serde(rename = "last_edited")]
    LastEditedDescending,
}

/// Names of the properties the pipeline reads and writes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    /// Date property name
    pub date: String,
    /// Number property receiving the derived count
    pub word_count: String,
}

/// Fully hydrated record needed for transformation
#[derive(Debug, Clone)]
pub struct RecordDetail {
    /// The freshly fetched record
    pub record: Record,
    /// Primary date (start of the date property)
    pub date: Option<String>,
    /// Derived numeric field as currently stored remotely
    pub word_count: u64,
}

impl RecordDetail {
    /// Extract the mapped fields from a fetched record
    ///
    /// # Errors
    ///
    /// Returns `SchemaMismatch` when the date or number property is missing
    /// or declared with a different kind.
    pub fn from_record(record: Record, fields: &FieldMapping) -> Result<Self> {
        let date = record.date_property(&fields.date)?.map(str::to_string);
        let word_count = record
            .number_property(&fields.word_count)?
            .map(|n| if n.is_finite() && n > 0.0 { n as u64 } else { 0 })
            .unwrap_or(0);

        Ok(Self {
            record,
            date,
            word_count,
        })
    }

    /// Document name: the date when present, otherwise the page id
    pub fn document_name(&self) -> String {
        match self.date.as_deref() {
            Some(date) if !date.trim().is_empty() => date.to_string(),
            _ => self.record.id.to_string(),
        }
    }
}

/// Full result of one pagination sweep
#[derive(Debug, Clone)]
pub struct Listing {
    /// Records in remote sort order
    pub entries: Vec<Record>,
    /// Wall-clock time the sweep started
    pub fetch_time: DateTime<Utc>,
}

impl Listing {
    /// Number of records in the listing
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the listing is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
