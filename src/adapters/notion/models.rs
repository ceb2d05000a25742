//! Notion API models
//!
//! Wire structures for the Notion REST API. They stay separate from the
//! domain types; conversion happens in [`PageObject::into_record`].

use crate::domain::ids::PageId;
use crate::domain::record::{PropertyValue, Record, SortOrder};
use crate::domain::{DiaryError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default page size for list endpoints (Notion maximum)
pub const PAGE_SIZE: u32 = 100;

/// Reference to a data source inside a database object
#[derive(Debug, Clone, Deserialize)]
pub struct DataSourceRef {
    /// Data source id
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
}

/// Response of `GET /databases/{id}`
///
/// Partial database objects omit `data_sources`.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseObject {
    /// Database id
    pub id: String,
    /// Data sources of the database
    #[serde(default)]
    pub data_sources: Option<Vec<DataSourceRef>>,
}

/// One sort criterion of a data source query
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QuerySort {
    /// Sort by a property value
    Property {
        /// Property name
        property: String,
        /// "ascending" or "descending"
        direction: &'static str,
    },
    /// Sort by an entry timestamp
    Timestamp {
        /// "created_time" or "last_edited_time"
        timestamp: &'static str,
        /// "ascending" or "descending"
        direction: &'static str,
    },
}

impl QuerySort {
    /// Criterion for a [`SortOrder`]; `date_property` names the date field
    pub fn for_order(order: SortOrder, date_property: &str) -> Self {
        match order {
            SortOrder::DateDescending => QuerySort::Property {
                property: date_property.to_string(),
                direction: "descending",
            },
            SortOrder::LastEditedDescending => QuerySort::Timestamp {
                timestamp: "last_edited_time",
                direction: "descending",
            },
        }
    }
}

/// Body of `POST /data_sources/{id}/query`
#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest {
    /// Cursor from the previous page; absent on the first call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,
    /// Sort criteria
    pub sorts: Vec<QuerySort>,
    /// Page size
    pub page_size: u32,
}

/// Paginated list envelope shared by query and block endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse<T> {
    /// Items of this page
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    /// Cursor for the next page, if any
    #[serde(default)]
    pub next_cursor: Option<String>,
    /// Whether more pages exist
    #[serde(default)]
    pub has_more: bool,
}

impl<T> ListResponse<T> {
    /// Cursor to continue with; `None` ends pagination
    ///
    /// An empty string is treated as absent.
    pub fn continuation(&self) -> Option<String> {
        self.next_cursor.clone().filter(|c| !c.is_empty())
    }
}

/// Page object from query results or `GET /pages/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct PageObject {
    /// Page id
    pub id: String,
    /// Creation time
    pub created_time: DateTime<Utc>,
    /// Last edit time
    pub last_edited_time: DateTime<Utc>,
    /// Raw property values by name
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl PageObject {
    /// Convert to a domain [`Record`]
    ///
    /// # Errors
    ///
    /// Returns `MalformedRemoteResponse` if the id is blank or a property
    /// lacks its `type` tag.
    pub fn into_record(self) -> Result<Record> {
        let id = PageId::new(self.id).map_err(DiaryError::MalformedRemoteResponse)?;
        let mut record = Record::new(id, self.created_time, self.last_edited_time);
        for (name, raw) in &self.properties {
            let value = parse_property(raw).map_err(|e| {
                DiaryError::MalformedRemoteResponse(format!(
                    "page {}: property '{}': {}",
                    record.id, name, e
                ))
            })?;
            record.properties.insert(name.clone(), value);
        }
        Ok(record)
    }
}

/// Concatenate the `plain_text` of a rich text array
pub fn plain_text(rich_text: Option<&Value>) -> String {
    rich_text
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part.get("plain_text").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default()
}

/// Decode one property value by its declared `type`
fn parse_property(raw: &Value) -> std::result::Result<PropertyValue, String> {
    let kind = raw
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| "missing type tag".to_string())?;

    let value = match kind {
        "date" => PropertyValue::Date {
            start: raw
                .get("date")
                .and_then(|d| d.get("start"))
                .and_then(Value::as_str)
                .map(str::to_string),
        },
        "number" => PropertyValue::Number {
            value: raw.get("number").and_then(Value::as_f64),
        },
        "title" | "rich_text" => PropertyValue::Text {
            text: plain_text(raw.get(kind)),
        },
        other => PropertyValue::Other {
            declared: other.to_string(),
        },
    };
    Ok(value)
}

/// Block object from `GET /blocks/{id}/children`
///
/// The type-specific payload sits under a key named after `type`.
#[derive(Debug, Clone, Deserialize)]
pub struct Block {
    /// Block id
    pub id: String,
    /// Block type tag
    #[serde(rename = "type")]
    pub kind: String,
    /// Whether the block has nested children
    #[serde(default)]
    pub has_children: bool,
    /// Remaining fields, including the payload
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl Block {
    /// Type-specific payload
    pub fn payload(&self) -> Option<&Value> {
        self.rest.get(&self.kind)
    }
}

/// Error body returned by Notion for non-2xx responses
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable code, e.g. `validation_error`
    #[serde(default)]
    pub code: String,
    /// Human-readable message
    #[serde(default)]
    pub message: String,
}
