//! Integration tests for the sync engine
//!
//! Drives `SyncCoordinator` against an in-memory record source and a real
//! file-backed watermark store and content store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use notion_diary::adapters::notion::{RecordPage, RecordSource};
use notion_diary::adapters::store::FileSystemStore;
use notion_diary::config::AdvancePolicy;
use notion_diary::core::retry::{Retrier, RetryPolicy};
use notion_diary::core::state::{
    settled_before, FileWatermarkStore, StateManager, WatermarkSet, WatermarkStore,
};
use notion_diary::core::sync::{SyncContext, SyncCoordinator, SyncOptions};
use notion_diary::domain::ids::PageId;
use notion_diary::domain::record::{FieldMapping, PropertyValue, Record, SortOrder};
use notion_diary::domain::{DiaryError, NotionError, Result};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

const PAGE_SIZE: usize = 2;

struct DiarySource {
    records: Mutex<Vec<Record>>,
    bodies: HashMap<String, String>,
    cursors: Mutex<Vec<Option<String>>>,
    updates: Mutex<Vec<(String, u64)>>,
    fetches: AtomicUsize,
}

impl DiarySource {
    fn new(records: Vec<Record>) -> Self {
        let bodies = records
            .iter()
            .map(|r| (r.id.to_string(), format!("第{}天的日记", r.id)))
            .collect();
        Self {
            records: Mutex::new(records),
            bodies,
            cursors: Mutex::new(Vec::new()),
            updates: Mutex::new(Vec::new()),
            fetches: AtomicUsize::new(0),
        }
    }

    fn touch(&self, id: &str, edited: DateTime<Utc>) {
        let mut records = self.records.lock().unwrap();
        if let Some(record) = records.iter_mut().find(|r| r.id.as_str() == id) {
            record.last_edited_time = edited;
        }
    }

    fn updated_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .updates
            .lock()
            .unwrap()
            .iter()
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }
}

#[async_trait]
impl RecordSource for DiarySource {
    async fn query_page(&self, cursor: Option<&str>, _sort: SortOrder) -> Result<RecordPage> {
        self.cursors.lock().unwrap().push(cursor.map(str::to_string));
        let start: usize = cursor.map_or(Ok(0), str::parse).map_err(|_| {
            DiaryError::Notion(NotionError::ClientError {
                status: 400,
                code: "validation_error".to_string(),
                message: "bad cursor".to_string(),
            })
        })?;
        let records = self.records.lock().unwrap();
        let end = (start + PAGE_SIZE).min(records.len());
        Ok(RecordPage {
            results: records[start..end].to_vec(),
            next_cursor: (end < records.len()).then(|| end.to_string()),
        })
    }

    async fn fetch_record(&self, id: &PageId) -> Result<Record> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| &r.id == id)
            .cloned()
            .ok_or_else(|| NotionError::ObjectNotFound(id.to_string()).into())
    }

    async fn update_number(&self, id: &PageId, _property: &str, value: u64) -> Result<()> {
        self.updates.lock().unwrap().push((id.to_string(), value));
        Ok(())
    }

    async fn render_text(&self, id: &PageId) -> Result<String> {
        Ok(self.bodies.get(id.as_str()).cloned().unwrap_or_default())
    }
}

fn at(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap()
}

fn diary(id: u32, edited_ms: i64) -> Record {
    Record::new(PageId::new(id.to_string()).unwrap(), at(0), at(edited_ms))
        .with_property(
            "Date",
            PropertyValue::Date {
                start: Some(format!("2024-01-{id:02}")),
            },
        )
        .with_property("Word Count", PropertyValue::Number { value: None })
}

fn names() -> Vec<String> {
    vec!["export".to_string(), "wordCount".to_string()]
}

fn fields() -> FieldMapping {
    FieldMapping {
        date: "Date".to_string(),
        word_count: "Word Count".to_string(),
    }
}

struct Harness {
    dir: TempDir,
    source: Arc<DiarySource>,
}

impl Harness {
    async fn new(records: Vec<Record>, initial_ms: i64) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store = FileWatermarkStore::new(dir.path().join("state.json"));
        let initial = WatermarkSet::baseline(&names())
            .with_millis("export", initial_ms)
            .with_millis("wordCount", initial_ms);
        store.save(&initial).await.unwrap();

        Self {
            dir,
            source: Arc::new(DiarySource::new(records)),
        }
    }

    fn output_dir(&self) -> std::path::PathBuf {
        self.dir.path().join("diary")
    }

    fn state_path(&self) -> std::path::PathBuf {
        self.dir.path().join("state.json")
    }

    fn coordinator(&self, concurrency: usize, policy: AdvancePolicy, dry_run: bool) -> SyncCoordinator {
        let context = SyncContext::new(
            self.source.clone(),
            Arc::new(FileSystemStore::new(self.output_dir(), "md")),
            Retrier::new(RetryPolicy::immediate(3)),
            fields(),
        )
        .with_dry_run(dry_run);
        let state = Arc::new(StateManager::new(
            Arc::new(FileWatermarkStore::new(self.state_path())),
            names(),
        ));
        let options = SyncOptions {
            database_id: "diary-db".to_string(),
            sort: SortOrder::DateDescending,
            concurrency,
            advance_policy: policy,
        };
        SyncCoordinator::with_components(context, state, options).unwrap()
    }

    async fn stored(&self) -> WatermarkSet {
        FileWatermarkStore::new(self.state_path())
            .load(&names())
            .await
            .unwrap()
    }
}

fn exported(dir: &Path) -> Vec<String> {
    if !dir.exists() {
        return Vec::new();
    }
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_incremental_sync_processes_only_newer_records() {
    let records = vec![
        diary(1, 500),
        diary(2, 2_000),
        diary(3, 900),
        diary(4, 1_000),
        diary(5, 3_000),
        diary(6, 100),
    ];
    let harness = Harness::new(records, 1_000).await;
    let coordinator = harness.coordinator(1, AdvancePolicy::Always, false);

    let before = Utc::now();
    let summary = coordinator.execute_sync().await.unwrap();
    let after = Utc::now();

    assert_eq!(summary.listed, 6);
    assert_eq!(summary.selected, 2);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 0);
    assert!(summary.persisted);
    assert_eq!(
        *harness.source.cursors.lock().unwrap(),
        vec![None, Some("2".to_string()), Some("4".to_string())]
    );
    assert_eq!(harness.source.fetches.load(Ordering::SeqCst), 2);
    assert_eq!(harness.source.updated_ids(), vec!["2", "5"]);
    assert_eq!(
        exported(&harness.output_dir()),
        vec!["2024-01-02.md", "2024-01-05.md"]
    );

    let doc = std::fs::read_to_string(harness.output_dir().join("2024-01-05.md")).unwrap();
    assert_eq!(doc, "---\ndate: 2024-01-05\nwordCount: 5\n---\n\n第5天的日记");

    let stored = harness.stored().await;
    let export = stored.get("export");
    assert_eq!(export, stored.get("wordCount"));
    assert!(export >= settled_before(at(before.timestamp_millis())));
    assert!(export <= settled_before(after));

    // Second run sees nothing new
    let second = coordinator.execute_sync().await.unwrap();
    assert_eq!(second.selected, 0);
    assert_eq!(harness.source.updated_ids(), vec!["2", "5"]);
    assert!(harness.stored().await.get("export") >= export);
}

#[tokio::test]
async fn test_first_run_selects_everything() {
    let records = vec![diary(1, 10), diary(2, 20), diary(3, 30)];
    let harness = Harness::new(records, 0).await;

    let summary = harness
        .coordinator(4, AdvancePolicy::Always, false)
        .execute_sync()
        .await
        .unwrap();

    assert_eq!(summary.selected, 3);
    assert_eq!(summary.succeeded, 3);
    assert_eq!(exported(&harness.output_dir()).len(), 3);
}

#[tokio::test]
async fn test_edit_after_run_in_same_minute_is_selected() {
    let harness = Harness::new(vec![diary(1, 1_000), diary(2, 2_000)], 0).await;
    let coordinator = harness.coordinator(2, AdvancePolicy::Always, false);

    let first = coordinator.execute_sync().await.unwrap();
    assert_eq!(first.selected, 2);

    // Notion reports the edit at the start of its minute
    let now = Utc::now().timestamp_millis();
    harness.source.touch("2", at(now - now.rem_euclid(60_000)));

    let second = coordinator.execute_sync().await.unwrap();
    assert_eq!(second.selected, 1);
    assert_eq!(second.succeeded, 1);
    assert_eq!(harness.source.updated_ids(), vec!["1", "2", "2"]);
}

fn with_broken_record() -> Vec<Record> {
    let broken = Record::new(PageId::new("7").unwrap(), at(0), at(4_000))
        .with_property(
            "Date",
            PropertyValue::Text {
                text: "someday".to_string(),
            },
        )
        .with_property("Word Count", PropertyValue::Number { value: None });
    vec![diary(1, 2_000), broken, diary(3, 6_000), diary(4, 8_000)]
}

#[tokio::test]
async fn test_failed_record_still_advances_watermarks() {
    let harness = Harness::new(with_broken_record(), 1_000).await;

    let before = Utc::now();
    let summary = harness
        .coordinator(2, AdvancePolicy::Always, false)
        .execute_sync()
        .await
        .unwrap();

    assert_eq!(summary.selected, 4);
    assert_eq!(summary.succeeded, 3);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.failures[0].record_id.as_str(), "7");
    assert!(summary.failures[0].message.contains("Date"));
    assert!(!harness.source.updated_ids().contains(&"7".to_string()));

    let stored = harness.stored().await;
    assert!(stored.get("export") >= settled_before(at(before.timestamp_millis())));
    assert_eq!(stored.get("export"), stored.get("wordCount"));
}

#[tokio::test]
async fn test_hold_failed_keeps_failure_selectable() {
    let harness = Harness::new(with_broken_record(), 1_000).await;
    let coordinator = harness.coordinator(2, AdvancePolicy::HoldFailed, false);

    let summary = coordinator.execute_sync().await.unwrap();
    assert_eq!(summary.failed, 1);

    let stored = harness.stored().await;
    assert_eq!(stored.get_millis("export"), 3_999);
    assert_eq!(stored.get_millis("wordCount"), 3_999);

    let again = coordinator.execute_sync().await.unwrap();
    let selected: Vec<&str> = again
        .failures
        .iter()
        .map(|f| f.record_id.as_str())
        .collect();
    assert_eq!(again.selected, 3);
    assert_eq!(selected, vec!["7"]);
}

#[tokio::test]
async fn test_dry_run_writes_nothing() {
    let harness = Harness::new(vec![diary(1, 5_000), diary(2, 6_000)], 1_000).await;
    let state_before = std::fs::read_to_string(harness.state_path()).unwrap();

    let summary = harness
        .coordinator(2, AdvancePolicy::Always, true)
        .execute_sync()
        .await
        .unwrap();

    assert!(summary.dry_run);
    assert!(!summary.persisted);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.documents_written, 0);
    assert_eq!(harness.source.fetches.load(Ordering::SeqCst), 2);
    assert!(harness.source.updated_ids().is_empty());
    assert!(exported(&harness.output_dir()).is_empty());
    assert_eq!(
        std::fs::read_to_string(harness.state_path()).unwrap(),
        state_before
    );
}

#[test]
fn test_zero_concurrency_is_rejected() {
    let context = SyncContext::new(
        Arc::new(DiarySource::new(Vec::new())),
        Arc::new(FileSystemStore::new("unused", "md")),
        Retrier::new(RetryPolicy::immediate(1)),
        fields(),
    );
    let state = Arc::new(StateManager::new(
        Arc::new(FileWatermarkStore::new("unused.json")),
        names(),
    ));
    let options = SyncOptions {
        database_id: "db".to_string(),
        sort: SortOrder::DateDescending,
        concurrency: 0,
        advance_policy: AdvancePolicy::Always,
    };

    assert!(matches!(
        SyncCoordinator::with_components(context, state, options),
        Err(DiaryError::Validation(_))
    ));
}
