//! Comments attached to posts, kept per post.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use tracing::debug;

use crate::Result;
use crate::error::InvalidInputError;
use crate::models::Comment;
use crate::store::SessionStore;

use super::{modify_list, read_list};

/// Store key holding the comments of one post.
pub fn comments_key(post_id: i64) -> String {
    format!("comments_{post_id}")
}

/// Comments written on this device.
#[derive(Clone)]
pub struct CommentBook {
    store: Arc<dyn SessionStore>,
}

impl CommentBook {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Comments of a post, oldest first.
    pub fn list(&self, post_id: i64) -> Result<Vec<Comment>> {
        Ok(read_list(self.store.as_ref(), &comments_key(post_id))?)
    }

    /// Add a comment. Blank content is rejected.
    pub fn add(&self, post_id: i64, content: &str) -> Result<Comment> {
        let content = non_blank(content)?;

        let comment = self.modify(post_id, |comments| {
            // Ids are creation timestamps in milliseconds, bumped past the
            // newest existing id when two comments land in the same millisecond.
            let now = Utc::now();
            let newest = comments.iter().map(|c| c.id).max().unwrap_or(i64::MIN);
            let comment = Comment {
                id: now.timestamp_millis().max(newest.saturating_add(1)),
                post_id,
                content: content.clone(),
                created_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            };
            comments.push(comment.clone());
            comment
        })?;

        debug!(post_id, comment_id = comment.id, "Comment added");
        Ok(comment)
    }

    /// Replace the content of a comment.
    pub fn update(&self, post_id: i64, comment_id: i64, content: &str) -> Result<Comment> {
        let content = non_blank(content)?;

        let updated = self.modify(post_id, |comments| {
            let comment = comments.iter_mut().find(|c| c.id == comment_id)?;
            comment.content = content.clone();
            Some(comment.clone())
        })?;

        Ok(updated.ok_or(InvalidInputError::NotFound {
            what: "comment",
            id: comment_id,
        })?)
    }

    /// Delete a comment. Returns false if it did not exist.
    pub fn delete(&self, post_id: i64, comment_id: i64) -> Result<bool> {
        self.modify(post_id, |comments| {
            let before = comments.len();
            comments.retain(|c| c.id != comment_id);
            comments.len() != before
        })
    }

    fn modify<R>(&self, post_id: i64, change: impl FnMut(&mut Vec<Comment>) -> R) -> Result<R> {
        Ok(modify_list(
            self.store.as_ref(),
            &comments_key(post_id),
            change,
        )?)
    }
}

impl std::fmt::Debug for CommentBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommentBook").finish_non_exhaustive()
    }
}

fn non_blank(content: &str) -> Result<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(InvalidInputError::Other {
            message: "comment must not be blank".to_string(),
        }
        .into());
    }
    Ok(trimmed.to_string())
}
