use std::fs;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{CollectionStore, StoreError};

/// File-backed store: one JSON object per line.
///
/// A missing file reads as an empty collection and blank lines are skipped.
/// Saves write a sibling temp file and rename it over the target, so a crash
/// mid-save leaves the previous snapshot intact.
#[derive(Debug, Clone)]
pub struct JsonLinesStore<T> {
    path: PathBuf,
    _record: PhantomData<fn() -> T>,
}

impl<T> JsonLinesStore<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl<T> CollectionStore<T> for JsonLinesStore<T>
where
    T: Serialize + DeserializeOwned,
{
    fn load(&self) -> Result<Vec<T>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "store file missing; starting empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };

        let mut records = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let record = serde_json::from_str(line).map_err(|e| StoreError::Decode {
                path: self.path.clone(),
                line: idx + 1,
                message: e.to_string(),
            })?;
            records.push(record);
        }

        tracing::debug!(path = %self.path.display(), count = records.len(), "loaded collection");
        Ok(records)
    }

    fn save(&self, records: &[T]) -> Result<(), StoreError> {
        let mut out = String::new();
        for record in records {
            out.push_str(&serde_json::to_string(record)?);
            out.push('\n');
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
            }
        }

        let tmp = self.temp_path();
        fs::write(&tmp, out).map_err(|e| StoreError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| StoreError::io(&self.path, e))?;

        tracing::debug!(path = %self.path.display(), count = records.len(), "saved collection");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockledger_core::LineItem;

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store: JsonLinesStore<LineItem> = JsonLinesStore::new(dir.path().join("none.jsonl"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn save_then_load_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonLinesStore::new(dir.path().join("nested").join("lines.jsonl"));
        let records = vec![LineItem::new("B,1", 2), LineItem::new("A:;x", 5)];

        store.save(&records).unwrap();
        assert_eq!(store.load().unwrap(), records);
        assert!(!dir.path().join("nested").join("lines.jsonl.tmp").exists());
    }

    #[test]
    fn malformed_line_reports_position() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.jsonl");
        fs::write(&path, "{\"product_code\":\"P1\",\"qty\":1}\n\nnot json\n").unwrap();

        let store: JsonLinesStore<LineItem> = JsonLinesStore::new(&path);
        match store.load().unwrap_err() {
            StoreError::Decode { line, .. } => assert_eq!(line, 3),
            other => panic!("expected decode error, got {other:?}"),
        }
    }
}
