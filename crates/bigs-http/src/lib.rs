//! bigs-http - Authenticated HTTP access to the bigs blog API.
//!
//! [`Dispatcher`] sends protected requests with the session's bearer token,
//! refreshing it once on rejection. [`BlogApi`] wraps the individual
//! endpoints on top of it.
//!
//! # Example
//!
//! ```no_run
//! use bigs_core::{ApiUrl, Credentials, SessionState};
//! use bigs_http::{BlogApi, ClientConfig};
//!
//! # async fn example() -> bigs_core::Result<()> {
//! let config = ClientConfig::new(ApiUrl::new("https://api.bigs.example")?);
//! let api = BlogApi::connect(&config, SessionState::in_memory())?;
//!
//! api.sign_in(&Credentials::new("alice@example.com", "hunter2!")).await?;
//! let posts = api.list_posts(0, 10).await?;
//! println!("{} posts", posts.content.len());
//! # Ok(())
//! # }
//! ```

mod api;
mod client;
mod dispatch;
pub mod endpoints;
mod refresh;
mod request;

pub use api::BlogApi;
pub use client::{ApiClient, ClientConfig, DEFAULT_TIMEOUT};
pub use dispatch::Dispatcher;
pub use refresh::HttpTokenRefresher;
pub use request::{FormPart, Method, RequestBody, RequestDescriptor};
