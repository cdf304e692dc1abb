//! HTTP client for the blog API.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, trace};

use bigs_core::error::{ProtocolError, RequestError, TransportError};
use bigs_core::{AccessToken, ApiUrl};

use crate::endpoints::ApiErrorResponse;
use crate::request::RequestDescriptor;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for [`ApiClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: ApiUrl,
    pub timeout: Duration,
    pub user_agent: String,
}

impl ClientConfig {
    pub fn new(base_url: ApiUrl) -> Self {
        Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("bigs/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// HTTP client bound to one API base URL.
///
/// Knows nothing about sessions: the bearer token is passed in per request.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: ApiUrl,
}

impl ApiClient {
    /// Create a client with default settings.
    pub fn new(base_url: ApiUrl) -> Result<Self, TransportError> {
        Self::with_config(&ClientConfig::new(base_url))
    }

    pub fn with_config(config: &ClientConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()
            .map_err(map_transport)?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Returns the API base URL this client is configured for.
    pub fn base_url(&self) -> &ApiUrl {
        &self.base_url
    }

    /// POST a JSON body without credentials and decode the response.
    #[instrument(skip(self, body), fields(api = %self.base_url))]
    pub async fn post_public<B, R>(&self, path: &str, body: &B) -> Result<R, RequestError>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let bytes = self.post_public_raw(path, body).await?;
        decode(&bytes)
    }

    /// POST a JSON body without credentials and return the raw response body.
    pub async fn post_public_raw<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Vec<u8>, RequestError> {
        let url = self.base_url.endpoint(path);
        debug!(%url, "POST (unauthenticated)");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(map_transport)?;

        self.handle_response(response).await
    }

    /// Send one attempt of a protected request with `token` as the bearer.
    pub(crate) async fn send(
        &self,
        request: &RequestDescriptor,
        token: &AccessToken,
    ) -> Result<Vec<u8>, RequestError> {
        let url = self.base_url.endpoint(request.path());
        trace!(method = %request.method(), %url, "sending request");

        let response = request
            .build(&self.client, &url, token)?
            .send()
            .await
            .map_err(map_transport)?;

        self.handle_response(response).await
    }

    async fn handle_response(&self, response: reqwest::Response) -> Result<Vec<u8>, RequestError> {
        let status = response.status();
        trace!(status = %status, "response");

        if status.is_success() {
            let body = response.bytes().await.map_err(map_transport)?;
            Ok(body.to_vec())
        } else {
            Err(RequestError::Status(self.parse_error_response(response).await))
        }
    }

    async fn parse_error_response(&self, response: reqwest::Response) -> ProtocolError {
        let status = response.status().as_u16();

        match response.json::<ApiErrorResponse>().await {
            Ok(body) => ProtocolError::new(status, body.error, body.message),
            Err(_) => ProtocolError::new(status, None, None),
        }
    }
}

/// Decode a response body. An empty body decodes as JSON `null`.
pub(crate) fn decode<R: DeserializeOwned>(body: &[u8]) -> Result<R, RequestError> {
    let result = if body.iter().all(u8::is_ascii_whitespace) {
        serde_json::from_slice(b"null")
    } else {
        serde_json::from_slice(body)
    };
    result.map_err(|e| RequestError::Decode {
        message: e.to_string(),
    })
}

pub(crate) fn map_transport(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else {
        TransportError::Http {
            message: err.to_string(),
        }
    }
}
