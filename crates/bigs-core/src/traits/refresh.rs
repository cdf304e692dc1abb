//! Token refresh trait.

use async_trait::async_trait;

use crate::error::RefreshError;
use crate::tokens::{RefreshToken, TokenPair};

/// Exchanges a refresh token for a new token pair.
///
/// Implementations must not touch session state: applying the new pair is
/// the caller's job, which keeps a refresh safe to run in isolation.
#[async_trait]
pub trait TokenRefresh: Send + Sync {
    /// Exchange `refresh_token` for a new pair.
    ///
    /// `None` must fail with [`RefreshError::NoRefreshToken`] without any
    /// network activity. A response missing either token is
    /// [`RefreshError::MalformedResponse`], never a partial success.
    async fn refresh(
        &self,
        refresh_token: Option<&RefreshToken>,
    ) -> Result<TokenPair, RefreshError>;
}
