//! File-based storage implementation
//!
//! Each table is one JSON document held in memory and rewritten in full on
//! every mutation. All access to a table goes through one mutex, so writes
//! to the same file never interleave.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::application::errors::StorageError;

/// A keyed table: one JSON object mapping entity id to record.
pub type Table<V> = JsonFile<BTreeMap<String, V>>;

/// JSON file-backed document
pub struct JsonFile<T> {
    path: PathBuf,
    data: Mutex<T>,
    healthy: AtomicBool,
}

impl<T> JsonFile<T>
where
    T: Serialize + DeserializeOwned + Send,
{
    /// Load the document from `path`, falling back to `template` (and writing
    /// it out) when the file is missing or unreadable. A file that does not
    /// parse is moved aside to `<name>.corrupt-<timestamp>` first; if that fails the
    /// file is left in place until the next mutation.
    pub fn open(path: impl Into<PathBuf>, template: T) -> Self {
        let path = path.into();
        let (data, fresh) = match read_document(&path) {
            Ok(data) => (data, false),
            Err(_) if !path.exists() => {
                tracing::info!("Creating table {}", path.display());
                (template, true)
            }
            Err(StorageError::Serialization(e)) => {
                tracing::warn!("Table {} unreadable, resetting: {}", path.display(), e);
                match quarantine(&path) {
                    Ok(backup) => {
                        tracing::warn!("Kept unreadable table as {}", backup.display());
                        (template, true)
                    }
                    Err(e) => {
                        tracing::error!("Failed to move aside {}: {}", path.display(), e);
                        (template, false)
                    }
                }
            }
            Err(e) => {
                tracing::warn!("Table {} could not be read, resetting: {}", path.display(), e);
                (template, true)
            }
        };

        let file = Self {
            path,
            data: Mutex::new(data),
            healthy: AtomicBool::new(true),
        };
        if fresh {
            let data = file.lock();
            let _ = file.persist(&data);
        }
        file
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the last durable write succeeded
    pub fn is_healthy(&self) -> bool {
        self.healthy.load(Ordering::Relaxed)
    }

    /// Run `f` against the current document.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.lock())
    }

    /// Mutate the document and persist it.
    pub fn write<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut data = self.lock();
        let result = f(&mut data);
        let _ = self.persist(&data);
        result
    }

    /// Like [`JsonFile::write`], but report a failed durable write to the
    /// caller. The in-memory mutation is kept either way.
    pub fn write_durable<R>(&self, f: impl FnOnce(&mut T) -> R) -> Result<R, StorageError> {
        let mut data = self.lock();
        let result = f(&mut data);
        self.persist(&data)?;
        Ok(result)
    }

    /// Mutate the document only when `f` returns `Some`; `None` means the
    /// closure left it untouched and nothing is written.
    ///
    /// The check and the write happen under one lock acquisition.
    pub fn try_write<R>(&self, f: impl FnOnce(&mut T) -> Option<R>) -> Option<R> {
        let mut data = self.lock();
        let result = f(&mut data)?;
        let _ = self.persist(&data);
        Some(result)
    }

    fn lock(&self) -> MutexGuard<'_, T> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Write failures are logged and flagged; the in-memory view stays
    /// authoritative until the next successful write.
    fn persist(&self, data: &T) -> Result<(), StorageError> {
        match write_document(&self.path, data) {
            Ok(()) => {
                self.healthy.store(true, Ordering::Relaxed);
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to save table {}: {}", self.path.display(), e);
                self.healthy.store(false, Ordering::Relaxed);
                Err(e)
            }
        }
    }
}

impl<V> JsonFile<BTreeMap<String, V>>
where
    V: Serialize + DeserializeOwned + Clone + Send,
{
    pub fn get(&self, key: &str) -> Option<V> {
        self.read(|data| data.get(key).cloned())
    }

    pub fn set(&self, key: impl Into<String>, value: V) {
        self.write(|data| {
            data.insert(key.into(), value);
        });
    }

    /// Remove `key`, returning whether it was present.
    pub fn delete(&self, key: &str) -> bool {
        self.try_write(|data| data.remove(key).map(|_| ())).is_some()
    }

    pub fn has(&self, key: &str) -> bool {
        self.read(|data| data.contains_key(key))
    }

    pub fn all(&self) -> BTreeMap<String, V> {
        self.read(|data| data.clone())
    }
}

fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T, StorageError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Rename an unreadable table so its bytes survive the reset
fn quarantine(path: &Path) -> Result<PathBuf, StorageError> {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(format!(".corrupt-{}", Utc::now().format("%Y%m%d%H%M%S%3f")));
    let backup = path.with_file_name(name);
    std::fs::rename(path, &backup)?;
    Ok(backup)
}

fn write_document<T: Serialize>(path: &Path, data: &T) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(data)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Row {
        value: u32,
    }

    #[test]
    fn test_missing_file_is_created_from_template() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("rows.json");

        let mut template = BTreeMap::new();
        template.insert("seed".to_string(), Row { value: 1 });
        let table: Table<Row> = JsonFile::open(&path, template);

        assert!(path.exists());
        assert_eq!(table.get("seed"), Some(Row { value: 1 }));
        assert!(table.is_healthy());
    }

    #[test]
    fn test_corrupt_file_resets_to_template() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("rows.json");
        std::fs::write(&path, "{ not json").expect("write");

        let table: Table<Row> = JsonFile::open(&path, BTreeMap::new());
        assert!(table.all().is_empty());

        let on_disk = std::fs::read_to_string(&path).expect("read");
        assert_eq!(on_disk.trim(), "{}");
    }

    #[test]
    fn test_unreadable_table_is_kept_aside() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("rows.json");
        let original = r#"{"a":{"value":7},"b":{"value":-5}}"#;
        std::fs::write(&path, original).expect("write");

        let table: Table<Row> = JsonFile::open(&path, BTreeMap::new());
        assert!(table.all().is_empty());

        let backups: Vec<_> = std::fs::read_dir(dir.path())
            .expect("read dir")
            .map(|entry| entry.expect("entry").path())
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with("rows.json.corrupt-"))
            })
            .collect();
        assert_eq!(backups.len(), 1);
        assert_eq!(std::fs::read_to_string(&backups[0]).expect("backup"), original);
    }

    #[test]
    fn test_set_and_delete_persist() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("rows.json");

        let table: Table<Row> = JsonFile::open(&path, BTreeMap::new());
        table.set("a", Row { value: 7 });
        table.set("b", Row { value: 9 });
        assert!(table.delete("b"));
        assert!(!table.delete("b"));

        let reopened: Table<Row> = JsonFile::open(&path, BTreeMap::new());
        assert_eq!(reopened.get("a"), Some(Row { value: 7 }));
        assert!(!reopened.has("b"));
    }

    #[test]
    fn test_try_write_none_leaves_file_untouched() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("rows.json");

        let table: Table<Row> = JsonFile::open(&path, BTreeMap::new());
        table.set("a", Row { value: 1 });
        let before = std::fs::read_to_string(&path).expect("read");

        let result = table.try_write(|data| {
            let row = data.get_mut("missing")?;
            row.value += 1;
            Some(row.value)
        });
        assert!(result.is_none());
        assert_eq!(std::fs::read_to_string(&path).expect("read"), before);
    }

    #[test]
    fn test_unwritable_path_marks_table_unhealthy() {
        let dir = tempfile::tempdir().expect("temp dir");
        // A directory where the file should be makes the rename fail
        let path = dir.path().join("rows.json");
        std::fs::create_dir_all(&path).expect("mkdir");

        let table: Table<Row> = JsonFile::open(&path, BTreeMap::new());
        assert!(!table.is_healthy());

        // In-memory view still works
        table.set("a", Row { value: 3 });
        assert_eq!(table.get("a"), Some(Row { value: 3 }));

        let durable = table.write_durable(|data| data.len());
        assert!(matches!(durable, Err(StorageError::Io(_))));
    }
}
