#[cfg(test)]
use std::{collections::HashMap, sync::Mutex};
use std::{
    io,
    path::{Path, PathBuf},
};

use json_dotpath::DotPaths;
use serde_json::Value;
use tracing::debug;

use crate::error::StoreError;

pub use self::{favorites::FavoritesSet, thumbnails::ThumbnailChoices};

pub mod favorites;
pub mod thumbnails;

/// String-keyed persistence, the way a browser's local storage behaves.
///
/// Values are opaque strings; callers JSON-encode what they keep. Every read goes to the
/// backing storage, writes are plain read-modify-write with the last writer winning.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// All keys live in one JSON object on disk.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Value, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(Value::Object(Default::default())),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Value::Object(Default::default())),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read()?.dot_get::<String>(key)?)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut document = self.read()?;
        document.dot_set(key, value)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&document)?)
            .map_err(|e| self.io_error(e))?;
        debug!(key, path = %self.path.display(), "Stored value");

        Ok(())
    }
}

/// Store that lives as long as the value does.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let values = self.values.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut values = self.values.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("storage.json"));

        assert_eq!(store.get("favorites").unwrap(), None);
    }

    #[test]
    fn test_file_store_keeps_other_keys_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested").join("storage.json"));

        store.set("favorites", r#"["a"]"#).unwrap();
        store.set("videoImageMap", "{}").unwrap();

        assert_eq!(store.get("favorites").unwrap().as_deref(), Some(r#"["a"]"#));
        assert_eq!(store.get("videoImageMap").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_file_store_sees_writes_from_another_handle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        let first = FileStore::new(&path);
        let second = FileStore::new(&path);

        first.set("favorites", r#"["a"]"#).unwrap();
        second.set("favorites", r#"["b"]"#).unwrap();

        assert_eq!(first.get("favorites").unwrap().as_deref(), Some(r#"["b"]"#));
    }

    #[test]
    fn test_file_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "{ nope").unwrap();

        let error = FileStore::new(&path).get("favorites").unwrap_err();

        assert!(matches!(error, StoreError::Json(_)));
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::default();

        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }
}
