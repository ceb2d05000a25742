//! Change selection against the stored watermarks

use crate::core::state::WatermarkSet;
use crate::domain::ids::PageId;
use crate::domain::record::{Listing, Record};
use std::collections::{BTreeMap, HashSet};

/// Records that need processing in this run
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    /// Deduplicated records in listing order
    pub records: Vec<Record>,
    /// How many listed records each watermark selected on its own
    pub per_watermark: BTreeMap<String, usize>,
}

impl ChangeSet {
    /// Number of records to process
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing changed
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Select records edited after any of the named watermarks
///
/// A record is selected when its `last_edited_time` is strictly later than
/// the watermark, compared at millisecond precision. The result is the union
/// across `names`, deduplicated by id with the first occurrence kept, in
/// listing order.
pub fn select_changes(listing: &Listing, watermarks: &WatermarkSet, names: &[String]) -> ChangeSet {
    let thresholds: Vec<(&str, i64)> = names
        .iter()
        .map(|name| (name.as_str(), watermarks.get_millis(name)))
        .collect();

    let mut per_watermark: BTreeMap<String, usize> =
        names.iter().map(|name| (name.clone(), 0)).collect();
    let mut seen: HashSet<&PageId> = HashSet::new();
    let mut records = Vec::new();

    for record in &listing.entries {
        let edited = record.last_edited_time.timestamp_millis();
        let mut selected = false;

        for (name, threshold) in &thresholds {
            if edited > *threshold {
                selected = true;
                if let Some(count) = per_watermark.get_mut(*name) {
                    *count += 1;
                }
            }
        }

        if selected && seen.insert(&record.id) {
            records.push(record.clone());
        }
    }

    for (name, count) in &per_watermark {
        tracing::debug!(watermark = %name, selected = count, "Watermark selection");
    }

    ChangeSet {
        records,
        per_watermark,
    }
}
