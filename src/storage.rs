//! Key-value persistence backends
//!
//! The game persists two small string values (best score and settings). Backends:
//! - `MemoryStore`: process-local map, safe to share across threads
//! - `FileStore`: JSON map on disk (native only)
//! - `LocalStore`: `window.localStorage` (WASM only)

use std::collections::HashMap;
use std::rc::Rc;
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage is unavailable")]
    Unavailable,
    #[error("could not access store file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not encode store contents: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// String key-value store.
///
/// Methods take `&self`; backends use interior mutability so a store can be shared
/// between the scenes that read and write it.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Write `new` only if the key currently holds `expected` (`None` = absent).
    /// Returns whether the write happened.
    fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&str>,
        new: &str,
    ) -> Result<bool, StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }

    fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&str>,
        new: &str,
    ) -> Result<bool, StorageError> {
        (**self).compare_and_swap(key, expected, new)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Rc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }

    fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&str>,
        new: &str,
    ) -> Result<bool, StorageError> {
        (**self).compare_and_swap(key, expected, new)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }

    fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&str>,
        new: &str,
    ) -> Result<bool, StorageError> {
        (**self).compare_and_swap(key, expected, new)
    }
}

/// In-memory store. The mutex makes compare-and-swap atomic across threads.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries().remove(key);
        Ok(())
    }

    fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&str>,
        new: &str,
    ) -> Result<bool, StorageError> {
        let mut entries = self.entries();
        if entries.get(key).map(String::as_str) != expected {
            return Ok(false);
        }
        entries.insert(key.to_owned(), new.to_owned());
        Ok(true)
    }
}

/// JSON object on disk, rewritten through a temp file on every change.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug)]
pub struct FileStore {
    path: std::path::PathBuf,
    // Serializes read-modify-write within this process
    lock: Mutex<()>,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStore {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn load(&self) -> Result<HashMap<String, String>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) if json.trim().is_empty() => Ok(HashMap::new()),
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn store(&self, entries: &HashMap<String, String>) -> Result<(), StorageError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, serde_json::to_string_pretty(entries)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn modify<R>(
        &self,
        f: impl FnOnce(&mut HashMap<String, String>) -> (bool, R),
    ) -> Result<R, StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.load()?;
        let (changed, result) = f(&mut entries);
        if changed {
            self.store(&entries)?;
        }
        Ok(result)
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.modify(|entries| {
            entries.insert(key.to_owned(), value.to_owned());
            (true, ())
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.modify(|entries| (entries.remove(key).is_some(), ()))
    }

    fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&str>,
        new: &str,
    ) -> Result<bool, StorageError> {
        self.modify(|entries| {
            if entries.get(key).map(String::as_str) != expected {
                return (false, false);
            }
            entries.insert(key.to_owned(), new.to_owned());
            (true, true)
        })
    }
}

/// `window.localStorage`.
///
/// `compare_and_swap` is a get, compare and set. Writes from the same tab cannot
/// interleave, but another tab on the origin can write between the compare and the set,
/// so callers that need a monotone value read it back after swapping.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct LocalStore;

#[cfg(target_arch = "wasm32")]
impl LocalStore {
    fn storage(&self) -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StorageError::Unavailable)
    }
}

#[cfg(target_arch = "wasm32")]
fn js_error(e: wasm_bindgen::JsValue) -> StorageError {
    StorageError::Backend(format!("{:?}", e))
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage()?.get_item(key).map_err(js_error)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage()?.set_item(key, value).map_err(js_error)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.storage()?.remove_item(key).map_err(js_error)
    }

    fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&str>,
        new: &str,
    ) -> Result<bool, StorageError> {
        let storage = self.storage()?;
        let current = storage.get_item(key).map_err(js_error)?;
        if current.as_deref() != expected {
            return Ok(false);
        }
        storage.set_item(key, new).map_err(js_error)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_get_set_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);

        store.set("k", "1").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("1"));

        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_memory_store_compare_and_swap() {
        let store = MemoryStore::new();

        // Absent key only matches `None`
        assert!(!store.compare_and_swap("k", Some("0"), "5").unwrap());
        assert!(store.compare_and_swap("k", None, "5").unwrap());

        // Stale expectation is rejected
        assert!(!store.compare_and_swap("k", None, "7").unwrap());
        assert!(store.compare_and_swap("k", Some("5"), "7").unwrap());
        assert_eq!(store.get("k").unwrap().as_deref(), Some("7"));
    }

    #[test]
    fn test_store_through_rc() {
        let store: Rc<dyn KeyValueStore> = Rc::new(MemoryStore::new());
        store.set("a", "b").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("b"));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_file_store_persists_between_instances() {
        let path = std::env::temp_dir().join(format!(
            "fox_likes_stars_store_{}.json",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);

        let store = FileStore::new(&path);
        assert_eq!(store.get("bestScore").unwrap(), None);
        assert!(store.compare_and_swap("bestScore", None, "40").unwrap());

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get("bestScore").unwrap().as_deref(), Some("40"));
        assert!(!reopened.compare_and_swap("bestScore", Some("10"), "50").unwrap());

        reopened.remove("bestScore").unwrap();
        assert_eq!(store.get("bestScore").unwrap(), None);

        let _ = std::fs::remove_file(&path);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_file_store_corrupt_file_is_an_error() {
        let path = std::env::temp_dir().join(format!(
            "fox_likes_stars_corrupt_{}.json",
            std::process::id()
        ));
        std::fs::write(&path, "not json").unwrap();

        let store = FileStore::new(&path);
        assert!(matches!(store.get("k"), Err(StorageError::Serialize(_))));

        let _ = std::fs::remove_file(&path);
    }
}
