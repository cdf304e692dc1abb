//! JSON file storage.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::{debug, instrument, warn};

use bigs_core::SessionStore;
use bigs_core::store::Change;
use bigs_core::error::StorageError;

type Entries = BTreeMap<String, String>;

/// A [`SessionStore`] keeping every key in one JSON object file.
///
/// Writes take an exclusive lock on a sibling `.lock` file and replace the
/// data file through a rename, so concurrent processes never observe a half
/// written file. A batch (`set_all` / `remove_all`) is a single rewrite.
/// On Unix the file is created readable by its owner only, since it holds
/// tokens.
#[derive(Debug, Clone)]
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

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    fn map_io(&self, err: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.display().to_string(),
            message: err.to_string(),
        }
    }

    fn open_lock(&self) -> Result<File, StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.map_io(e))?;
        }
        OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(self.lock_path())
            .map_err(|e| self.map_io(e))
    }

    /// Read every entry. A missing file is an empty store.
    fn read_entries(&self) -> Result<Entries, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => return Err(self.map_io(e)),
        };
        if content.trim().is_empty() {
            return Ok(Entries::new());
        }
        serde_json::from_str(&content).map_err(|e| StorageError::Corrupt {
            key: self.path.display().to_string(),
            message: e.to_string(),
        })
    }

    fn write_entries(&self, entries: &Entries) -> Result<(), StorageError> {
        let content = serde_json::to_string_pretty(entries).map_err(|e| StorageError::Corrupt {
            key: self.path.display().to_string(),
            message: e.to_string(),
        })?;

        let temp_path = self.path.with_extension("tmp");
        {
            let mut file = create_private(&temp_path).map_err(|e| self.map_io(e))?;
            file.write_all(content.as_bytes())
                .map_err(|e| self.map_io(e))?;
            file.sync_data().map_err(|e| self.map_io(e))?;
        }
        fs::rename(&temp_path, &self.path).map_err(|e| self.map_io(e))
    }

    /// Apply `change` to the entries under the exclusive lock.
    fn update(
        &self,
        change: impl FnOnce(&mut Entries) -> Result<(), StorageError>,
    ) -> Result<(), StorageError> {
        let lock = self.open_lock()?;
        lock.lock_exclusive().map_err(|e| self.map_io(e))?;

        let result = (|| {
            let mut entries = match self.read_entries() {
                Ok(entries) => entries,
                Err(StorageError::Corrupt { message, .. }) => {
                    warn!(path = %self.path.display(), error = %message, "Replacing corrupt session file");
                    Entries::new()
                }
                Err(e) => return Err(e),
            };
            change(&mut entries)?;
            self.write_entries(&entries)
        })();

        lock.unlock().map_err(|e| self.map_io(e))?;
        result
    }
}

#[cfg(unix)]
fn create_private(path: &Path) -> std::io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;

    OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn create_private(path: &Path) -> std::io::Result<File> {
    File::create(path)
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let lock = self.open_lock()?;
        lock.lock_shared().map_err(|e| self.map_io(e))?;
        let result = self.read_entries();
        lock.unlock().map_err(|e| self.map_io(e))?;

        Ok(result?.remove(key))
    }

    #[instrument(skip(self, value), fields(path = %self.path.display()))]
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
            Ok(())
        })?;
        debug!("Stored value");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.update(|entries| {
            entries.remove(key);
            Ok(())
        })
    }

    #[instrument(skip_all, fields(path = %self.path.display(), count = entries.len()))]
    fn set_all(&self, entries: &[(&str, &str)]) -> Result<(), StorageError> {
        self.update(|stored| {
            for (key, value) in entries {
                stored.insert((*key).to_string(), (*value).to_string());
            }
            Ok(())
        })
    }

    fn remove_all(&self, keys: &[&str]) -> Result<(), StorageError> {
        self.update(|stored| {
            for key in keys {
                stored.remove(*key);
            }
            Ok(())
        })
    }

    fn modify(&self, key: &str, change: &mut Change<'_>) -> Result<(), StorageError> {
        self.update(|entries| {
            match change(entries.get(key).cloned())? {
                Some(value) => entries.insert(key.to_string(), value),
                None => entries.remove(key),
            };
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bigs_core::store::SESSION_KEYS;
    use bigs_core::{ScrapBook, SessionState, TokenPair};
    use tempfile::TempDir;

    use super::*;

    fn temp_store() -> (TempDir, FileStore) {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("bigs").join("session.json"));
        (dir, store)
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let (_dir, store) = temp_store();
        assert_eq!(store.get("accessToken").unwrap(), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn set_get_remove() {
        let (_dir, store) = temp_store();

        store.set("userName", "Alice").unwrap();
        assert_eq!(store.get("userName").unwrap().as_deref(), Some("Alice"));

        store.remove("userName").unwrap();
        assert_eq!(store.get("userName").unwrap(), None);

        // Removing again is fine.
        store.remove("userName").unwrap();
    }

    #[test]
    fn batch_write_is_one_json_object() {
        let (_dir, store) = temp_store();

        store
            .set_all(&[("accessToken", "AT1"), ("refreshToken", "RT1")])
            .unwrap();

        let content = fs::read_to_string(store.path()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(json["accessToken"], "AT1");
        assert_eq!(json["refreshToken"], "RT1");

        store.remove_all(&["accessToken", "refreshToken"]).unwrap();
        assert_eq!(store.get("accessToken").unwrap(), None);
    }

    #[test]
    fn corrupt_file_is_reported_then_replaced() {
        let (_dir, store) = temp_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{not json").unwrap();

        assert!(matches!(
            store.get("userName"),
            Err(StorageError::Corrupt { .. })
        ));

        store.set("userName", "Alice").unwrap();
        assert_eq!(store.get("userName").unwrap().as_deref(), Some("Alice"));
    }

    #[test]
    fn concurrent_scrap_toggles_are_not_lost() {
        let (_dir, store) = temp_store();
        let path = store.path().to_path_buf();

        let handles: Vec<_> = (0..8)
            .map(|post_id| {
                let path = path.clone();
                std::thread::spawn(move || {
                    // Separate handles behave like separate processes.
                    let book = ScrapBook::new(Arc::new(FileStore::new(path)));
                    book.toggle(post_id).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let mut ids = ScrapBook::new(Arc::new(store)).list().unwrap();
        ids.sort_unstable();
        assert_eq!(ids, (0..8).collect::<Vec<i64>>());
    }

    #[test]
    fn failed_modify_leaves_file_untouched() {
        let (_dir, store) = temp_store();
        store.set("userName", "Alice").unwrap();

        let result = store.modify("userName", &mut |_| {
            Err(StorageError::Corrupt {
                key: "userName".to_string(),
                message: "rejected".to_string(),
            })
        });

        assert!(result.is_err());
        assert_eq!(store.get("userName").unwrap().as_deref(), Some("Alice"));
    }

    #[cfg(unix)]
    #[test]
    fn file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let (_dir, store) = temp_store();
        store.set("accessToken", "AT1").unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn session_survives_restart() {
        let (dir, store) = temp_store();
        let path = store.path().to_path_buf();

        let session = SessionState::new(Arc::new(store));
        session.login("Alice", "a@x.com", TokenPair::new("AT1", "RT1"), None);
        ScrapBook::new(session.store()).toggle(7).unwrap();
        drop(session);

        let restored = SessionState::load(Arc::new(FileStore::new(&path)));
        assert!(restored.is_authenticated());
        assert_eq!(restored.profile().display_name, "Alice");
        assert!(ScrapBook::new(restored.store()).is_scrapped(7).unwrap());

        restored.clear_auth();
        let reloaded = FileStore::new(&path);
        for key in SESSION_KEYS {
            assert_eq!(reloaded.get(key).unwrap(), None);
        }
        // Scraps are not part of the session.
        assert!(reloaded.get("scrappedPosts").unwrap().is_some());
        drop(dir);
    }
}
