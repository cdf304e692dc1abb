//! Authenticated request dispatch with refresh-and-retry.
//!
//! Every protected request goes through [`Dispatcher`]. It attaches the
//! current access token, and when the server rejects that token (401/403)
//! it refreshes the pair once and retries once. A failed refresh clears the
//! session and surfaces [`Error::AuthExpired`]; any other failure is
//! returned as [`Error::Request`] without touching the session.
//!
//! Concurrent dispatches that hit an expired token share one refresh call.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use bigs_core::error::{RefreshError, RequestError};
use bigs_core::{AccessToken, Error, Result, SessionState, TokenPair, TokenRefresh};

use crate::client::{ApiClient, decode};
use crate::refresh::HttpTokenRefresher;
use crate::request::RequestDescriptor;

type RefreshFuture = Shared<BoxFuture<'static, std::result::Result<TokenPair, RefreshError>>>;

/// Sends protected requests on behalf of one [`SessionState`].
///
/// Cheap to clone; clones share the session and the in-flight refresh.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

struct DispatcherInner {
    client: ApiClient,
    session: SessionState,
    refresher: Arc<dyn TokenRefresh>,
    in_flight: Mutex<Option<RefreshFuture>>,
}

impl Dispatcher {
    pub fn new(client: ApiClient, session: SessionState, refresher: Arc<dyn TokenRefresh>) -> Self {
        Self {
            inner: Arc::new(DispatcherInner {
                client,
                session,
                refresher,
                in_flight: Mutex::new(None),
            }),
        }
    }

    /// Dispatcher that refreshes through the API's `/auth/refresh`.
    pub fn with_http_refresh(client: ApiClient, session: SessionState) -> Self {
        let refresher = Arc::new(HttpTokenRefresher::new(client.clone()));
        Self::new(client, session, refresher)
    }

    pub fn session(&self) -> &SessionState {
        &self.inner.session
    }

    pub fn client(&self) -> &ApiClient {
        &self.inner.client
    }

    /// Send `request` and decode the response body.
    ///
    /// An empty success body decodes as JSON `null`, so `Option<T>` or
    /// [`serde::de::IgnoredAny`] suit endpoints that answer with nothing.
    pub async fn dispatch<R: DeserializeOwned>(&self, request: &RequestDescriptor) -> Result<R> {
        let body = self.dispatch_raw(request).await?;
        Ok(decode(&body)?)
    }

    /// Send `request` and return the raw response body.
    ///
    /// # Errors
    ///
    /// - [`Error::AuthExpired`] when the token could not be refreshed, or was
    ///   rejected again after a refresh. The session is cleared in both cases.
    /// - [`Error::Request`] for any other failure. The session is untouched.
    #[instrument(skip(self, request), fields(method = %request.method(), path = request.path()))]
    pub async fn dispatch_raw(&self, request: &RequestDescriptor) -> Result<Vec<u8>> {
        // One refresh per dispatch, whether it happens before the first
        // attempt or after a rejection.
        let mut refreshed = false;

        let mut token = match self.inner.session.access_token() {
            Some(token) => token,
            None => {
                debug!("No access token, refreshing before the first attempt");
                refreshed = true;
                self.fresh_token(None).await?
            }
        };

        loop {
            match self.inner.client.send(request, &token).await {
                Ok(body) => return Ok(body),
                Err(RequestError::Status(err)) if err.is_auth_error() => {
                    if refreshed {
                        warn!(status = err.status, "Rejected after refresh, clearing session");
                        self.inner.session.clear_auth();
                        return Err(Error::AuthExpired);
                    }
                    debug!(status = err.status, "Access token rejected, refreshing");
                    refreshed = true;
                    token = self.fresh_token(Some(&token)).await?;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Refresh the token pair now, sharing any refresh already in flight.
    ///
    /// On failure the session has been cleared.
    pub async fn refresh(&self) -> Result<TokenPair> {
        Ok(self.shared_refresh().await?)
    }

    /// A token to retry with after `rejected` was refused.
    async fn fresh_token(&self, rejected: Option<&AccessToken>) -> Result<AccessToken> {
        if let Some(rejected) = rejected
            && let Some(current) = self.inner.session.access_token()
            && current != *rejected
        {
            debug!("Token was rotated by a concurrent refresh");
            return Ok(current);
        }

        match self.shared_refresh().await {
            Ok(pair) => Ok(pair.access().clone()),
            Err(err) => {
                warn!(error = %err, "Token refresh failed");
                Err(Error::AuthExpired)
            }
        }
    }

    async fn shared_refresh(&self) -> std::result::Result<TokenPair, RefreshError> {
        let refresh = {
            let mut slot = self
                .inner
                .in_flight
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            match slot.as_ref() {
                Some(pending) if pending.peek().is_none() => {
                    debug!("Joining in-flight refresh");
                    pending.clone()
                }
                _ => {
                    let refresh = self.start_refresh();
                    *slot = Some(refresh.clone());
                    refresh
                }
            }
        };

        let outcome = refresh.await;

        {
            let mut slot = self
                .inner
                .in_flight
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if slot.as_ref().is_some_and(|done| done.peek().is_some()) {
                *slot = None;
            }
        }

        outcome
    }

    /// The refresh future applies its outcome to the session exactly once,
    /// however many dispatches await it.
    fn start_refresh(&self) -> RefreshFuture {
        let session = self.inner.session.clone();
        let refresher = Arc::clone(&self.inner.refresher);

        async move {
            let refresh_token = session.refresh_token();
            match refresher.refresh(refresh_token.as_ref()).await {
                Ok(pair) => {
                    info!("Token pair refreshed");
                    session.set_auth_tokens(pair.clone());
                    Ok(pair)
                }
                Err(err) => {
                    session.clear_auth();
                    Err(err)
                }
            }
        }
        .boxed()
        .shared()
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("client", &self.inner.client)
            .field("session", &self.inner.session)
            .finish_non_exhaustive()
    }
}
