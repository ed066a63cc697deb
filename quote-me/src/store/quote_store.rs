use quote_types::{ImportSummary, Quote, QuoteDocument};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::{file_ops, StoreError, StoreResult};

/// File name of the persisted store inside the data directory, and of the
/// export snapshot in the working directory.
pub const STORE_FILE_NAME: &str = "quotes.json";

/// In-memory quote collection backed by a single JSON file
#[derive(Debug)]
pub struct QuoteStore {
    path: PathBuf,
    doc: QuoteDocument,
}

impl QuoteStore {
    /// Open the store file inside `data_dir`. The directory must already exist.
    pub fn open(data_dir: &Path) -> StoreResult<Self> {
        Self::open_file(data_dir.join(STORE_FILE_NAME))
    }

    /// Open a store at an explicit file path. A missing file is an empty
    /// store and is not created until the first mutation.
    pub fn open_file(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let doc = file_ops::read_document(&path)?;
        log::debug!("[STORE] Loaded {} quotes from {}", doc.quotes.len(), path.display());
        Ok(Self { path, doc })
    }

    /// Path of the persisted file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All quotes in insertion order
    pub fn list(&self) -> &[Quote] {
        &self.doc.quotes
    }

    pub fn get(&self, id: &str) -> Option<&Quote> {
        self.doc.quotes.iter().find(|q| q.id == id)
    }

    pub fn len(&self) -> usize {
        self.doc.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doc.quotes.is_empty()
    }

    /// Append a new quote with a fresh id and the current timestamp
    pub fn add(&mut self, quote: &str, author: &str) -> StoreResult<Quote> {
        if quote.trim().is_empty() {
            return Err(StoreError::EmptyField("quote"));
        }
        if author.trim().is_empty() {
            return Err(StoreError::EmptyField("author"));
        }

        let record = Quote::new(self.fresh_id(), quote, author);
        self.doc.quotes.push(record.clone());

        if let Err(e) = self.persist() {
            self.doc.quotes.pop();
            return Err(e);
        }

        log::debug!("[STORE] Added quote {}", record.id);
        Ok(record)
    }

    /// Remove the first quote with a matching id. Returns `false` (and does
    /// not touch the file) when no quote has that id.
    pub fn delete(&mut self, id: &str) -> StoreResult<bool> {
        let Some(pos) = self.doc.quotes.iter().position(|q| q.id == id) else {
            return Ok(false);
        };

        let removed = self.doc.quotes.remove(pos);
        if let Err(e) = self.persist() {
            self.doc.quotes.insert(pos, removed);
            return Err(e);
        }

        log::debug!("[STORE] Deleted quote {}", id);
        Ok(true)
    }

    /// Append every record whose id is not already present.
    ///
    /// Duplicates are matched on id only. Ids repeated within `records` are
    /// imported once. A record with an empty id, quote or author rejects the
    /// whole batch without touching the store.
    pub fn import_from(&mut self, records: Vec<Quote>) -> StoreResult<ImportSummary> {
        for (idx, record) in records.iter().enumerate() {
            let empty = [
                ("id", &record.id),
                ("quote", &record.quote),
                ("author", &record.author),
            ]
            .into_iter()
            .find(|(_, value)| value.trim().is_empty());

            if let Some((field, _)) = empty {
                return Err(StoreError::InvalidImport(format!(
                    "quote #{} has an empty '{}'",
                    idx + 1,
                    field
                )));
            }
        }

        let mut seen: HashSet<String> = self.doc.quotes.iter().map(|q| q.id.clone()).collect();
        let mut fresh = Vec::new();
        let mut skipped = 0;
        for record in records {
            if seen.insert(record.id.clone()) {
                fresh.push(record);
            } else {
                skipped += 1;
            }
        }

        let summary = ImportSummary {
            imported: fresh.len(),
            skipped,
        };
        if fresh.is_empty() {
            return Ok(summary);
        }

        let before = self.doc.quotes.len();
        self.doc.quotes.extend(fresh);
        if let Err(e) = self.persist() {
            self.doc.quotes.truncate(before);
            return Err(e);
        }

        log::info!(
            "[STORE] Imported {} quotes ({} skipped)",
            summary.imported,
            summary.skipped
        );
        Ok(summary)
    }

    /// Import from a raw `{ "quotes": [...] }` JSON document
    pub fn import_document(&mut self, raw: &str) -> StoreResult<ImportSummary> {
        let value: serde_json::Value = serde_json::from_str(raw)?;

        let items = match value {
            serde_json::Value::Object(mut map) => map.remove("quotes"),
            _ => None,
        };
        let Some(items @ serde_json::Value::Array(_)) = items else {
            return Err(StoreError::InvalidImport(
                "'quotes' should be an array".to_string(),
            ));
        };

        let records: Vec<Quote> = serde_json::from_value(items)
            .map_err(|e| StoreError::InvalidImport(format!("malformed quote record: {}", e)))?;

        self.import_from(records)
    }

    /// Import from a JSON file on disk
    pub fn import_file(&mut self, path: &Path) -> StoreResult<ImportSummary> {
        let raw = std::fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
        self.import_document(&raw)
    }

    /// Serialize the whole collection as a transportable snapshot
    pub fn export_all(&self) -> StoreResult<String> {
        file_ops::to_pretty_json(&self.doc)
    }

    /// Write the export snapshot to `dir/quotes.json`, returning the path written
    pub fn export_to(&self, dir: &Path) -> StoreResult<PathBuf> {
        let path = dir.join(STORE_FILE_NAME);
        file_ops::write_document(&path, &self.doc)?;
        Ok(path)
    }

    /// Replace the in-memory copy with what is currently on disk.
    /// On failure the previous copy is kept.
    pub fn reload(&mut self) -> StoreResult<()> {
        self.doc = file_ops::read_document(&self.path)?;
        Ok(())
    }

    fn persist(&self) -> StoreResult<()> {
        file_ops::write_document(&self.path, &self.doc)?;
        log::debug!(
            "[STORE] Wrote {} quotes to {}",
            self.doc.quotes.len(),
            self.path.display()
        );
        Ok(())
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = uuid::Uuid::new_v4().to_string();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn quote(id: &str, text: &str, author: &str) -> Quote {
        Quote::new(id, text, author)
    }

    #[test]
    fn test_add_then_list() {
        let dir = tempdir().unwrap();
        let mut store = QuoteStore::open(dir.path()).expect("Failed to open store");
        assert!(store.is_empty());

        let added = store.add("Be water.", "Bruce Lee").expect("Failed to add quote");

        let quotes = store.list();
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].quote, "Be water.");
        assert_eq!(quotes[0].author, "Bruce Lee");
        assert!(!quotes[0].id.is_empty());
        assert!(uuid::Uuid::parse_str(&quotes[0].id).is_ok());
        assert_eq!(quotes[0], added);
        assert!(quotes[0].created_at <= chrono::Utc::now());
    }

    #[test]
    fn test_add_generates_distinct_ids() {
        let dir = tempdir().unwrap();
        let mut store = QuoteStore::open(dir.path()).unwrap();

        let mut ids = HashSet::new();
        for i in 0..20 {
            let before = store.len();
            let added = store.add(&format!("quote {}", i), "someone").unwrap();
            assert_eq!(store.len(), before + 1);
            assert!(ids.insert(added.id));
        }
    }

    #[test]
    fn test_add_persists_to_disk() {
        let dir = tempdir().unwrap();
        let mut store = QuoteStore::open(dir.path()).unwrap();
        let added = store.add("Stay hungry.", "Steve Jobs").unwrap();

        let reopened = QuoteStore::open(dir.path()).unwrap();
        assert_eq!(reopened.list(), &[added]);
        assert!(dir.path().join(STORE_FILE_NAME).exists());
    }

    #[test]
    fn test_add_rejects_empty_fields() {
        let dir = tempdir().unwrap();
        let mut store = QuoteStore::open(dir.path()).unwrap();

        assert!(matches!(store.add("  ", "Someone"), Err(StoreError::EmptyField("quote"))));
        assert!(matches!(store.add("Something", ""), Err(StoreError::EmptyField("author"))));
        assert!(store.is_empty());
        assert!(!dir.path().join(STORE_FILE_NAME).exists());
    }

    #[test]
    fn test_delete_missing_id_is_noop() {
        let dir = tempdir().unwrap();
        let mut store = QuoteStore::open(dir.path()).unwrap();
        store
            .import_from(vec![quote("a", "first", "A"), quote("b", "second", "B")])
            .unwrap();

        assert!(!store.delete("c").unwrap());
        let ids: Vec<&str> = store.list().iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let dir = tempdir().unwrap();
        let mut store = QuoteStore::open(dir.path()).unwrap();
        let keep = store.add("keep me", "A").unwrap();
        let gone = store.add("delete me", "B").unwrap();

        assert!(store.delete(&gone.id).unwrap());
        assert!(!store.delete(&gone.id).unwrap());
        assert_eq!(store.list(), &[keep.clone()]);

        let reopened = QuoteStore::open(dir.path()).unwrap();
        assert_eq!(reopened.list(), &[keep]);
    }

    #[test]
    fn test_delete_missing_id_does_not_create_file() {
        let dir = tempdir().unwrap();
        let mut store = QuoteStore::open(dir.path()).unwrap();
        assert!(!store.delete("nope").unwrap());
        assert!(!dir.path().join(STORE_FILE_NAME).exists());
    }

    #[test]
    fn test_import_skips_existing_ids() {
        let dir = tempdir().unwrap();
        let mut store = QuoteStore::open(dir.path()).unwrap();
        store.import_from(vec![quote("a", "first", "A")]).unwrap();

        let summary = store
            .import_from(vec![quote("a", "first again", "A"), quote("b", "second", "B")])
            .unwrap();

        assert_eq!(summary, ImportSummary { imported: 1, skipped: 1 });
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("a").unwrap().quote, "first");
    }

    #[test]
    fn test_import_is_idempotent() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("incoming.json");
        std::fs::write(
            &source,
            r#"{"quotes":[
                {"id":"a","quote":"one","author":"A","createdAt":"2024-01-01T00:00:00.000Z"},
                {"id":"b","quote":"two","author":"B","createdAt":"2024-01-02T00:00:00.000Z"}
            ]}"#,
        )
        .unwrap();

        let data_dir = dir.path().join("data");
        std::fs::create_dir_all(&data_dir).unwrap();
        let mut store = QuoteStore::open(&data_dir).unwrap();

        let first = store.import_file(&source).unwrap();
        assert_eq!(first, ImportSummary { imported: 2, skipped: 0 });

        let second = store.import_file(&source).unwrap();
        assert_eq!(second, ImportSummary { imported: 0, skipped: 2 });
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_import_keeps_identical_text_with_different_ids() {
        let dir = tempdir().unwrap();
        let mut store = QuoteStore::open(dir.path()).unwrap();

        let summary = store
            .import_from(vec![quote("a", "same", "Same"), quote("b", "same", "Same")])
            .unwrap();

        assert_eq!(summary.imported, 2);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_import_dedupes_within_batch() {
        let dir = tempdir().unwrap();
        let mut store = QuoteStore::open(dir.path()).unwrap();

        let summary = store
            .import_from(vec![quote("a", "one", "A"), quote("a", "one copy", "A")])
            .unwrap();

        assert_eq!(summary, ImportSummary { imported: 1, skipped: 1 });
        assert_eq!(store.get("a").unwrap().quote, "one");
    }

    #[test]
    fn test_import_rejects_non_array() {
        let dir = tempdir().unwrap();
        let mut store = QuoteStore::open(dir.path()).unwrap();
        store.add("existing", "A").unwrap();

        for raw in [r#"{"quotes": {}}"#, r#"{"other": []}"#, r#"[1, 2]"#] {
            let err = store.import_document(raw).unwrap_err();
            assert!(matches!(err, StoreError::InvalidImport(_)), "{raw}");
        }
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_import_rejects_malformed_json() {
        let dir = tempdir().unwrap();
        let mut store = QuoteStore::open(dir.path()).unwrap();
        let err = store.import_document("{ nope").unwrap_err();
        assert!(matches!(err, StoreError::Json(_)));
    }

    #[test]
    fn test_import_rejects_bad_records_without_partial_mutation() {
        let dir = tempdir().unwrap();
        let mut store = QuoteStore::open(dir.path()).unwrap();

        let err = store
            .import_from(vec![quote("a", "fine", "A"), quote("b", "", "B")])
            .unwrap_err();
        assert!(err.to_string().contains("'quote'"));
        assert!(store.is_empty());

        let err = store
            .import_document(r#"{"quotes":[{"id":"x","quote":"missing author"}]}"#)
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidImport(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_import_missing_file() {
        let dir = tempdir().unwrap();
        let mut store = QuoteStore::open(dir.path()).unwrap();
        let err = store.import_file(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }

    #[test]
    fn test_export_then_import_round_trip() {
        let dir = tempdir().unwrap();
        let source_dir = dir.path().join("source");
        let target_dir = dir.path().join("target");
        std::fs::create_dir_all(&source_dir).unwrap();
        std::fs::create_dir_all(&target_dir).unwrap();

        let mut source = QuoteStore::open(&source_dir).unwrap();
        source.add("Be water.", "Bruce Lee").unwrap();
        source.add("Stay hungry.", "Steve Jobs").unwrap();
        source.add("Be water.", "Bruce Lee").unwrap();

        let snapshot = source.export_all().unwrap();

        let mut target = QuoteStore::open(&target_dir).unwrap();
        let summary = target.import_document(&snapshot).unwrap();

        assert_eq!(summary, ImportSummary { imported: 3, skipped: 0 });
        assert_eq!(target.list(), source.list());
    }

    #[test]
    fn test_export_to_directory() {
        let dir = tempdir().unwrap();
        let data_dir = dir.path().join("data");
        let out_dir = dir.path().join("out");
        std::fs::create_dir_all(&data_dir).unwrap();
        std::fs::create_dir_all(&out_dir).unwrap();

        let mut store = QuoteStore::open(&data_dir).unwrap();
        store.add("Be water.", "Bruce Lee").unwrap();

        let written = store.export_to(&out_dir).unwrap();
        assert_eq!(written, out_dir.join(STORE_FILE_NAME));

        let content = std::fs::read_to_string(&written).unwrap();
        assert_eq!(content, store.export_all().unwrap());
    }

    #[test]
    fn test_reload_picks_up_external_writes() {
        let dir = tempdir().unwrap();
        let mut reader = QuoteStore::open(dir.path()).unwrap();
        let mut writer = QuoteStore::open(dir.path()).unwrap();

        writer.add("fresh", "Writer").unwrap();
        assert!(reader.is_empty());

        reader.reload().unwrap();
        assert_eq!(reader.list(), writer.list());
    }

    #[test]
    fn test_reload_failure_keeps_previous_copy() {
        let dir = tempdir().unwrap();
        let mut store = QuoteStore::open(dir.path()).unwrap();
        store.add("kept", "A").unwrap();

        std::fs::write(store.path(), "{ broken").unwrap();
        assert!(store.reload().is_err());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_open_unreadable_store_fails() {
        let dir = tempdir().unwrap();
        // A directory where the file should be
        std::fs::create_dir_all(dir.path().join(STORE_FILE_NAME)).unwrap();

        let err = QuoteStore::open(dir.path()).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }

    /// Occupy the temp-file slot with a directory so every write fails.
    fn block_writes(store: &QuoteStore) {
        let mut tmp = store.path().as_os_str().to_os_string();
        tmp.push(".tmp");
        std::fs::create_dir(tmp).unwrap();
    }

    #[test]
    fn test_failed_write_rolls_back_add() {
        let dir = tempdir().unwrap();
        let mut store = QuoteStore::open(dir.path()).unwrap();
        let kept = store.add("kept", "A").unwrap();
        block_writes(&store);

        assert!(matches!(store.add("lost", "B"), Err(StoreError::Io { .. })));
        assert_eq!(store.list(), &[kept]);
    }

    #[test]
    fn test_failed_write_rolls_back_delete() {
        let dir = tempdir().unwrap();
        let mut store = QuoteStore::open(dir.path()).unwrap();
        store
            .import_from(vec![quote("a", "first", "A"), quote("b", "second", "B"), quote("c", "third", "C")])
            .unwrap();
        block_writes(&store);

        assert!(store.delete("b").is_err());
        let ids: Vec<&str> = store.list().iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_failed_write_rolls_back_import() {
        let dir = tempdir().unwrap();
        let mut store = QuoteStore::open(dir.path()).unwrap();
        store.import_from(vec![quote("a", "first", "A")]).unwrap();
        block_writes(&store);

        assert!(store
            .import_from(vec![quote("b", "second", "B"), quote("c", "third", "C")])
            .is_err());
        assert_eq!(store.len(), 1);
        assert!(store.get("b").is_none());

        // The file on disk was never touched either
        assert_eq!(QuoteStore::open(dir.path()).unwrap().len(), 1);
    }
}
