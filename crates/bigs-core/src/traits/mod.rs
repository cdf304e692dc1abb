//! Core traits at the network seam.

mod refresh;

pub use refresh::TokenRefresh;
