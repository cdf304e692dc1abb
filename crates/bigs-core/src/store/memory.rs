//! In-process store.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::error::StorageError;

use super::{Change, SessionStore};

/// A store that lives as long as the process; the default for tests and
/// short-lived tools.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }

    fn set_all(&self, values: &[(&str, &str)]) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        for (key, value) in values {
            entries.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }

    fn remove_all(&self, keys: &[&str]) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        for key in keys {
            entries.remove(*key);
        }
        Ok(())
    }

    fn modify(&self, key: &str, change: &mut Change<'_>) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        match change(entries.get(key).cloned())? {
            Some(value) => entries.insert(key.to_string(), value),
            None => entries.remove(key),
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_absent() {
        let store = MemoryStore::new();
        assert_eq!(store.get("accessToken").unwrap(), None);
        store.remove("accessToken").unwrap();
    }

    #[test]
    fn set_all_then_remove_all() {
        let store = MemoryStore::new();
        store.set_all(&[("a", "1"), ("b", "2")]).unwrap();
        assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));
        store.remove_all(&["a", "b"]).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn failed_modify_writes_nothing() {
        let store = MemoryStore::new();
        store.set("a", "1").unwrap();

        let err = store.modify("a", &mut |_| {
            Err(StorageError::Corrupt {
                key: "a".to_string(),
                message: "bad".to_string(),
            })
        });
        assert!(err.is_err());
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));

        store.modify("a", &mut |_| Ok(None)).unwrap();
        assert!(store.is_empty());
    }
}
