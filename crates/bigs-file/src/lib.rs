//! bigs-file - File-backed session store for the bigs blog client.
//!
//! Keeps the session (and the local scrap and comment books) in a single
//! JSON object on disk so a signed-in session survives process restarts.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use bigs_core::SessionState;
//! use bigs_file::FileStore;
//!
//! let store = Arc::new(FileStore::new("/tmp/bigs/session.json"));
//! let session = SessionState::load(store);
//! println!("signed in: {}", session.is_authenticated());
//! ```

mod store;

pub use store::FileStore;
