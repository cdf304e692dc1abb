//! Bookmarked posts.

use std::sync::Arc;

use tracing::debug;

use crate::Result;
use crate::store::SessionStore;

use super::{modify_list, read_list};

/// Store key holding the scrapped post ids.
pub const SCRAPS_KEY: &str = "scrappedPosts";

/// The set of posts bookmarked on this device, in the order they were added.
#[derive(Clone)]
pub struct ScrapBook {
    store: Arc<dyn SessionStore>,
}

impl ScrapBook {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// All scrapped post ids.
    pub fn list(&self) -> Result<Vec<i64>> {
        Ok(read_list(self.store.as_ref(), SCRAPS_KEY)?)
    }

    pub fn is_scrapped(&self, post_id: i64) -> Result<bool> {
        Ok(self.list()?.contains(&post_id))
    }

    /// Flip the scrap state of a post. Returns true if it is now scrapped.
    pub fn toggle(&self, post_id: i64) -> Result<bool> {
        let scrapped = modify_list(self.store.as_ref(), SCRAPS_KEY, |ids: &mut Vec<i64>| {
            if let Some(pos) = ids.iter().position(|id| *id == post_id) {
                ids.remove(pos);
                false
            } else {
                ids.push(post_id);
                true
            }
        })?;

        debug!(post_id, scrapped, "Scrap toggled");
        Ok(scrapped)
    }

    /// Unscrap a post. Returns false if it was not scrapped.
    pub fn remove(&self, post_id: i64) -> Result<bool> {
        Ok(modify_list(self.store.as_ref(), SCRAPS_KEY, |ids: &mut Vec<i64>| {
            let before = ids.len();
            ids.retain(|id| *id != post_id);
            ids.len() != before
        })?)
    }
}

impl std::fmt::Debug for ScrapBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrapBook").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn toggle_adds_then_removes() {
        let book = ScrapBook::new(Arc::new(MemoryStore::new()));

        assert!(book.toggle(3).unwrap());
        assert!(book.toggle(5).unwrap());
        assert!(book.is_scrapped(3).unwrap());
        assert_eq!(book.list().unwrap(), vec![3, 5]);

        assert!(!book.toggle(3).unwrap());
        assert_eq!(book.list().unwrap(), vec![5]);
    }

    #[test]
    fn remove_missing_is_false() {
        let book = ScrapBook::new(Arc::new(MemoryStore::new()));
        assert!(!book.remove(9).unwrap());
    }

    #[test]
    fn corrupt_value_is_reported() {
        let store = Arc::new(MemoryStore::new());
        store.set(SCRAPS_KEY, "not json").unwrap();
        let book = ScrapBook::new(store);
        assert!(book.list().is_err());
    }
}
