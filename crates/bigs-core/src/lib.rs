//! bigs-core - Session state and shared types for the bigs blog client.
//!
//! All protected API calls read their credentials from a [`SessionState`],
//! an explicit handle shared by the dispatcher and every other collaborator.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use bigs_core::{MemoryStore, SessionState, TokenPair};
//!
//! let store = Arc::new(MemoryStore::new());
//! let session = SessionState::new(store.clone());
//! session.login("Alice", "a@x.com", TokenPair::new("AT1", "RT1"), None);
//!
//! // A later process restores the same session from the store.
//! let restored = SessionState::load(store);
//! assert_eq!(restored.profile().display_name, "Alice");
//! ```

pub mod credentials;
pub mod error;
pub mod jwt;
pub mod local;
pub mod models;
pub mod session;
pub mod store;
pub mod tokens;
pub mod traits;
pub mod types;

pub use credentials::{Credentials, SignUp};
pub use error::Error;
pub use local::{CommentBook, ScrapBook};
pub use models::{Attachment, Categories, Comment, Page, Post, PostDraft, ProfileImage};
pub use session::{Profile, SessionEvent, SessionObserver, SessionSnapshot, SessionState};
pub use store::{MemoryStore, SessionStore};
pub use tokens::{AccessToken, RefreshToken, TokenPair};
pub use traits::TokenRefresh;
pub use types::ApiUrl;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
