//! Scraps and comments kept on this device.
//!
//! Both live in the same [`SessionStore`](crate::store::SessionStore) as the
//! session, as JSON arrays under their own keys. Every change is a single
//! [`modify`](crate::store::SessionStore::modify), so two processes sharing
//! a file store do not lose each other's updates.

mod comments;
mod scraps;

pub use comments::{CommentBook, comments_key};
pub use scraps::{SCRAPS_KEY, ScrapBook};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StorageError;
use crate::store::SessionStore;

fn read_list<T: DeserializeOwned>(
    store: &dyn SessionStore,
    key: &str,
) -> Result<Vec<T>, StorageError> {
    parse_list(key, store.get(key)?.as_deref())
}

/// Apply `change` to the list under `key` in one store update.
fn modify_list<T, R>(
    store: &dyn SessionStore,
    key: &str,
    mut change: impl FnMut(&mut Vec<T>) -> R,
) -> Result<R, StorageError>
where
    T: Serialize + DeserializeOwned,
{
    let mut outcome = None;
    store.modify(key, &mut |current| {
        let mut items = parse_list(key, current.as_deref())?;
        outcome = Some(change(&mut items));
        encode_list(key, &items).map(Some)
    })?;

    outcome.ok_or_else(|| StorageError::Corrupt {
        key: key.to_string(),
        message: "store did not apply the change".to_string(),
    })
}

fn parse_list<T: DeserializeOwned>(key: &str, raw: Option<&str>) -> Result<Vec<T>, StorageError> {
    match raw {
        Some(raw) if !raw.trim().is_empty() => {
            serde_json::from_str(raw).map_err(|e| StorageError::Corrupt {
                key: key.to_string(),
                message: e.to_string(),
            })
        }
        _ => Ok(Vec::new()),
    }
}

fn encode_list<T: Serialize>(key: &str, items: &[T]) -> Result<String, StorageError> {
    serde_json::to_string(items).map_err(|e| StorageError::Corrupt {
        key: key.to_string(),
        message: e.to_string(),
    })
}
