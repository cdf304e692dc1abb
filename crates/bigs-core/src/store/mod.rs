//! Key/value persistence behind the session.
//!
//! The durability of the medium (process memory, a file, something longer
//! lived) is a deployment decision; the session only needs get/set/remove.

mod memory;

pub use memory::MemoryStore;

use crate::error::StorageError;

/// Persisted access token.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";
/// Persisted refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
/// Persisted display name.
pub const USER_NAME_KEY: &str = "userName";
/// Persisted email.
pub const USER_EMAIL_KEY: &str = "userEmail";
/// Persisted avatar reference.
pub const USER_IMAGE_KEY: &str = "userImage";

/// Every key owned by the session.
pub const SESSION_KEYS: [&str; 5] = [
    ACCESS_TOKEN_KEY,
    REFRESH_TOKEN_KEY,
    USER_NAME_KEY,
    USER_EMAIL_KEY,
    USER_IMAGE_KEY,
];

/// A string key/value store.
///
/// A missing key is "value absent", never an error.
pub trait SessionStore: Send + Sync {
    /// Read a value.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a value. Removing a missing key succeeds.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Write several values as one update.
    ///
    /// Implementations that can write atomically should override this.
    fn set_all(&self, entries: &[(&str, &str)]) -> Result<(), StorageError> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }

    /// Remove several values as one update.
    fn remove_all(&self, keys: &[&str]) -> Result<(), StorageError> {
        for key in keys {
            self.remove(key)?;
        }
        Ok(())
    }

    /// Read, change and write back one value.
    ///
    /// `change` gets the current value and returns the new one; `None`
    /// removes the key. If `change` fails nothing is written. Stores shared
    /// between processes should override this to hold one lock for the
    /// whole cycle.
    fn modify(&self, key: &str, change: &mut Change<'_>) -> Result<(), StorageError> {
        match change(self.get(key)?)? {
            Some(value) => self.set(key, &value),
            None => self.remove(key),
        }
    }
}

/// Value transformation applied by [`SessionStore::modify`].
pub type Change<'a> = dyn FnMut(Option<String>) -> Result<Option<String>, StorageError> + 'a;
