//! Token refresh against `/auth/refresh`.

use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use bigs_core::error::{RefreshError, RequestError};
use bigs_core::{RefreshToken, TokenPair, TokenRefresh};

use crate::client::ApiClient;
use crate::endpoints::{REFRESH, RefreshRequest, TokenResponse};

/// Exchanges a refresh token for a new pair over HTTP.
///
/// Never touches the session; the dispatcher applies the outcome.
#[derive(Debug, Clone)]
pub struct HttpTokenRefresher {
    client: ApiClient,
}

impl HttpTokenRefresher {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TokenRefresh for HttpTokenRefresher {
    #[instrument(skip_all, fields(api = %self.client.base_url()))]
    async fn refresh(
        &self,
        refresh_token: Option<&RefreshToken>,
    ) -> Result<TokenPair, RefreshError> {
        let Some(refresh_token) = refresh_token else {
            warn!("No refresh token on record");
            return Err(RefreshError::NoRefreshToken);
        };

        debug!("Refreshing token pair");
        let body = RefreshRequest {
            refresh_token: refresh_token.as_str(),
        };

        let bytes = match self.client.post_public_raw(REFRESH, &body).await {
            Ok(bytes) => bytes,
            Err(RequestError::Status(err)) => {
                return Err(RefreshError::RefreshRejected {
                    status: Some(err.status),
                    message: err.to_string(),
                });
            }
            Err(err) => {
                return Err(RefreshError::RefreshRejected {
                    status: None,
                    message: err.to_string(),
                });
            }
        };

        let response: TokenResponse =
            serde_json::from_slice(&bytes).map_err(|_| RefreshError::MalformedResponse)?;

        TokenPair::from_parts(response.access_token, response.refresh_token)
            .ok_or(RefreshError::MalformedResponse)
    }
}
