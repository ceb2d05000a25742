//! Named watermarks for incremental synchronization
//!
//! A watermark is the epoch-millisecond timestamp up to which changes have
//! been processed. Several independent watermarks are tracked (by default
//! `export` and `wordCount`); each selects its own changes and all are
//! advanced together after a run.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Baseline value for a watermark that was never persisted (epoch 0)
pub const BASELINE_MILLIS: i64 = 0;

/// Resolution of Notion's `last_edited_time`, which is rounded down to the minute
pub const EDIT_TIME_RESOLUTION_MILLIS: i64 = 60_000;

/// Set of named watermarks, in epoch milliseconds
///
/// Names not present in the set read as [`BASELINE_MILLIS`], so a first run
/// selects every record.
///
/// # Examples
///
/// ```
/// use notion_diary::core::state::WatermarkSet;
///
/// let set = WatermarkSet::baseline(&["export".to_string()]);
/// assert_eq!(set.get_millis("export"), 0);
/// assert_eq!(set.get_millis("never-seen"), 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WatermarkSet {
    values: BTreeMap<String, i64>,
}

impl WatermarkSet {
    /// Set with every given name at the baseline
    pub fn baseline(names: &[String]) -> Self {
        Self {
            values: names
                .iter()
                .map(|name| (name.clone(), BASELINE_MILLIS))
                .collect(),
        }
    }

    /// Set a watermark, in milliseconds
    pub fn with_millis(mut self, name: impl Into<String>, millis: i64) -> Self {
        self.values.insert(name.into(), millis);
        self
    }

    /// Raw value of a watermark; baseline when absent
    pub fn get_millis(&self, name: &str) -> i64 {
        self.values.get(name).copied().unwrap_or(BASELINE_MILLIS)
    }

    /// Watermark as a timestamp; baseline when absent
    pub fn get(&self, name: &str) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.get_millis(name)).unwrap_or_default()
    }

    /// Whether the name has a persisted value
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Ensure every given name is present, inserting the baseline for missing ones
    pub fn fill_missing(&mut self, names: &[String]) {
        for name in names {
            self.values.entry(name.clone()).or_insert(BASELINE_MILLIS);
        }
    }

    /// Move each named watermark forward to `target`
    ///
    /// A watermark already ahead of `target` is left alone, so watermarks
    /// never move backwards.
    pub fn advance_all(&mut self, names: &[String], target: DateTime<Utc>) {
        let target = target.timestamp_millis();
        for name in names {
            let entry = self.values.entry(name.clone()).or_insert(BASELINE_MILLIS);
            *entry = (*entry).max(target);
        }
    }

    /// Iterate over `(name, millis)` pairs in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of named watermarks
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no watermark is present
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Latest instant every edit reported for `fetch_time` is known to precede
///
/// An edit made later in the same minute as `fetch_time` is reported with that
/// minute's start, so the watermark has to stay strictly before it.
///
/// ```
/// use chrono::DateTime;
/// use notion_diary::core::state::settled_before;
///
/// let fetched = DateTime::from_timestamp_millis(125_000).unwrap();
/// assert_eq!(settled_before(fetched).timestamp_millis(), 119_999);
/// ```
pub fn settled_before(fetch_time: DateTime<Utc>) -> DateTime<Utc> {
    let into_minute = fetch_time
        .timestamp_millis()
        .rem_euclid(EDIT_TIME_RESOLUTION_MILLIS);
    fetch_time - Duration::milliseconds(into_minute + 1)
}

/// Advance target for a run that fetched its listing at `fetch_time`
///
/// Starts from [`settled_before`] and, when a failure is held, moves back to
/// one millisecond before the earliest failed `last_edited_time`, whichever
/// is earlier.
pub fn hold_target(
    fetch_time: DateTime<Utc>,
    earliest_failed_edit: Option<DateTime<Utc>>,
) -> DateTime<Utc> {
    let settled = settled_before(fetch_time);
    match earliest_failed_edit {
        Some(edited) => settled.min(edited - Duration::milliseconds(1)),
        None => settled,
    }
}
