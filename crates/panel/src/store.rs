//! Durable key/value storage for panel records.
//!
//! Each record (style, output settings, presets) is stored whole as a JSON
//! string under a fixed namespace. Last write wins; there are no transactions.

use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Namespace of the persisted [`SubtitleStyle`](subcard_model::SubtitleStyle).
pub const STYLE_NAMESPACE: &str = "subtitle-style";
/// Namespace of the persisted [`OutputSettings`](subcard_model::OutputSettings).
pub const OUTPUT_NAMESPACE: &str = "subtitle-output";
/// Namespace of the persisted [`PresetSlots`](subcard_model::PresetSlots).
pub const PRESETS_NAMESPACE: &str = "position-presets";

/// Errors raised while persisting records.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to encode record '{namespace}': {source}")]
    Encode {
        namespace: String,
        source: serde_json::Error,
    },
}

impl From<StoreError> for subcard_common::SubcardError {
    fn from(err: StoreError) -> Self {
        subcard_common::SubcardError::store(err.to_string())
    }
}

/// String values keyed by namespace.
pub trait KeyValueStore {
    fn get(&self, namespace: &str) -> Option<String>;
    fn set(&mut self, namespace: &str, value: String) -> Result<(), StoreError>;
}

/// Volatile store, for tests and throwaway sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, namespace: &str) -> Option<String> {
        self.entries.get(namespace).cloned()
    }

    fn set(&mut self, namespace: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(namespace.to_string(), value);
        Ok(())
    }
}

/// Store backed by one JSON object on disk, rewritten whole on every `set`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file is an empty store; an
    /// unreadable or malformed file is logged and treated as empty.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Malformed state file; starting empty"
                    );
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Unreadable state file; starting empty"
                );
                BTreeMap::new()
            }
        };
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent).map_err(io_err)?;

        let json = serde_json::to_vec_pretty(&self.entries).map_err(|e| StoreError::Encode {
            namespace: "*".to_string(),
            source: e,
        })?;

        let mut tmp = tempfile::NamedTempFile::new_in(&parent).map_err(io_err)?;
        tmp.write_all(&json).map_err(io_err)?;
        tmp.persist(&self.path).map_err(|e| io_err(e.error))?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, namespace: &str) -> Option<String> {
        self.entries.get(namespace).cloned()
    }

    fn set(&mut self, namespace: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(namespace.to_string(), value);
        self.flush()
    }
}

/// Read and decode the record stored under `namespace`.
///
/// Returns `None` when the record is missing or does not decode.
pub fn load_record<T: DeserializeOwned>(
    store: &(impl KeyValueStore + ?Sized),
    namespace: &str,
) -> Option<T> {
    let raw = store.get(namespace)?;
    match serde_json::from_str(&raw) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::warn!(namespace, error = %e, "Ignoring malformed persisted record");
            None
        }
    }
}

/// Encode `record` and store it under `namespace`.
pub fn save_record<T: Serialize>(
    store: &mut (impl KeyValueStore + ?Sized),
    namespace: &str,
    record: &T,
) -> Result<(), StoreError> {
    let json = serde_json::to_string(record).map_err(|e| StoreError::Encode {
        namespace: namespace.to_string(),
        source: e,
    })?;
    store.set(namespace, json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use subcard_model::{OutputSettings, SubtitleStyle};

    #[test]
    fn test_memory_store_record_roundtrip() {
        let mut store = MemoryStore::new();
        let style = SubtitleStyle {
            font_size: 60,
            ..SubtitleStyle::default()
        };
        save_record(&mut store, STYLE_NAMESPACE, &style).unwrap();
        let loaded: SubtitleStyle = load_record(&store, STYLE_NAMESPACE).unwrap();
        assert_eq!(loaded, style);
    }

    #[test]
    fn test_missing_and_malformed_records() {
        let mut store = MemoryStore::new();
        assert!(load_record::<OutputSettings>(&store, OUTPUT_NAMESPACE).is_none());
        store.set(OUTPUT_NAMESPACE, "{ broken".to_string()).unwrap();
        assert!(load_record::<OutputSettings>(&store, OUTPUT_NAMESPACE).is_none());
    }

    #[test]
    fn test_file_store_persists_across_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("state.json");

        let mut store = JsonFileStore::open(&path);
        assert!(store.get(STYLE_NAMESPACE).is_none());
        store.set(STYLE_NAMESPACE, "{\"fontSize\":30}".to_string()).unwrap();
        store.set(PRESETS_NAMESPACE, "[]".to_string()).unwrap();

        let reopened = JsonFileStore::open(&path);
        assert_eq!(reopened.get(STYLE_NAMESPACE).as_deref(), Some("{\"fontSize\":30}"));
        assert_eq!(reopened.get(PRESETS_NAMESPACE).as_deref(), Some("[]"));
    }

    #[test]
    fn test_file_store_tolerates_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "not json at all").unwrap();

        let mut store = JsonFileStore::open(&path);
        assert!(store.get(STYLE_NAMESPACE).is_none());
        store.set(STYLE_NAMESPACE, "{}".to_string()).unwrap();
        assert_eq!(JsonFileStore::open(&path).get(STYLE_NAMESPACE).as_deref(), Some("{}"));
    }
}
