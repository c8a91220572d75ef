//! Authenticated API client.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use sunulek_core::error::RequestError;
use sunulek_core::{
    AccessToken, ApiUrl, ClientConfig, Error, OutboundRequest, RefreshToken, Result,
    SessionManager,
};

use crate::refresh::{self, RefreshCoordinator, RefreshOutcome};
use crate::transport::HttpTransport;

/// A successful (2xx) response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: u16,
    body: Vec<u8>,
}

impl ApiResponse {
    pub(crate) fn new(status: u16, body: Vec<u8>) -> Self {
        Self { status, body }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| Error::Decode {
            message: e.to_string(),
        })
    }

    /// The body as text, with invalid UTF-8 replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// HTTP client for the marketplace API.
///
/// Every request carries `Authorization: Bearer <access token>` while a
/// session exists. A 401 triggers one refresh-and-retry cycle; if that does
/// not recover, the session is cleared and [`Error::AuthExpired`] is
/// returned.
///
/// Cheap to clone; clones share the session, the connection pool and the
/// refresh coordinator.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    transport: Arc<HttpTransport>,
    sessions: SessionManager,
    refresh: RefreshCoordinator,
    config: ClientConfig,
}

impl ApiClient {
    /// Create a client with an empty, non-persistent session.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_sessions(config, SessionManager::new())
    }

    /// Create a client around an existing session manager, typically one
    /// restored from a [`sunulek_core::SessionStore`].
    pub fn with_sessions(config: ClientConfig, sessions: SessionManager) -> Result<Self> {
        let transport = Arc::new(HttpTransport::new(&config)?);

        Ok(Self {
            inner: Arc::new(ClientInner {
                transport,
                sessions,
                refresh: RefreshCoordinator::new(),
                config,
            }),
        })
    }

    /// The session manager shared with login and logout flows.
    pub fn sessions(&self) -> &SessionManager {
        &self.inner.sessions
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn base_url(&self) -> &ApiUrl {
        self.inner.transport.base_url()
    }

    pub(crate) fn transport(&self) -> &HttpTransport {
        &self.inner.transport
    }

    /// Issue `request` and return its successful response.
    ///
    /// # Errors
    ///
    /// - [`Error::Network`] if no response was received. Never retried.
    /// - [`Error::Request`] for any non-2xx response other than a
    ///   recoverable 401.
    /// - [`Error::AuthExpired`] if authorization failed and one refresh and
    ///   retry did not fix it. The session is cleared first.
    #[instrument(skip(self, request), fields(method = %request.method(), path = request.path()))]
    pub async fn request(&self, request: OutboundRequest) -> Result<ApiResponse> {
        let sent_with = self.inner.sessions.access_token();
        let response = self
            .inner
            .transport
            .send(&request, sent_with.as_ref())
            .await?;

        if response.status().is_success() {
            return HttpTransport::read(response).await;
        }

        let error = HttpTransport::request_error(response).await;
        if !error.is_unauthorized() {
            debug!(status = error.status, "Request failed");
            return Err(error.into());
        }

        if request.is_retried() {
            return match sent_with {
                Some(token) => Err(self.expire(&token)),
                None => Err(error.into()),
            };
        }

        let token = self.recover_authorization(sent_with.as_ref(), error).await?;
        self.send_retry(request.retried_copy(), token).await
    }

    /// Issue `request` and decode the JSON response.
    pub async fn send_json<T: DeserializeOwned>(&self, request: OutboundRequest) -> Result<T> {
        self.request(request).await?.json()
    }

    /// `GET path` and decode the JSON response.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send_json(OutboundRequest::get(path)).await
    }

    /// Refresh the access token now.
    ///
    /// Joins an exchange that is already in flight instead of starting a
    /// second one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AuthExpired`] if there is no session or the
    /// exchange fails; the session is cleared in the latter case.
    pub async fn refresh_session(&self) -> Result<AccessToken> {
        let Some(session) = self.inner.sessions.current() else {
            return Err(Error::AuthExpired);
        };

        match self.shared_refresh(session.refresh_token().clone()).await {
            RefreshOutcome::Refreshed(token) => Ok(token),
            RefreshOutcome::Failed => Err(Error::AuthExpired),
        }
    }

    /// Work out which token to retry a 401 with.
    async fn recover_authorization(
        &self,
        sent_with: Option<&AccessToken>,
        error: RequestError,
    ) -> Result<AccessToken> {
        let Some(current) = self.inner.sessions.current() else {
            if sent_with.is_some() {
                // Cleared while in flight, by a failed refresh or a logout.
                return Err(Error::AuthExpired);
            }
            return Err(error.into());
        };

        if sent_with != Some(current.access_token()) {
            debug!("Session changed while request was in flight, retrying with current token");
            return Ok(current.access_token().clone());
        }

        match self.shared_refresh(current.refresh_token().clone()).await {
            RefreshOutcome::Refreshed(token) => Ok(token),
            RefreshOutcome::Failed => Err(Error::AuthExpired),
        }
    }

    fn shared_refresh(&self, refresh_token: RefreshToken) -> refresh::PendingRefresh {
        let transport = Arc::clone(&self.inner.transport);
        let sessions = self.inner.sessions.clone();
        let adopt_rotated = self.inner.config.adopt_rotated_refresh;

        self.inner.refresh.join_or_start(move || {
            refresh::exchange(transport, sessions, refresh_token, adopt_rotated)
        })
    }

    async fn send_retry(&self, request: OutboundRequest, token: AccessToken) -> Result<ApiResponse> {
        info!("Retrying request after authorization failure");
        let response = self.inner.transport.send(&request, Some(&token)).await?;

        if response.status().is_success() {
            return HttpTransport::read(response).await;
        }

        let error = HttpTransport::request_error(response).await;
        if error.is_unauthorized() {
            return Err(self.expire(&token));
        }
        Err(error.into())
    }

    /// Final authorization failure: drop the session the request was sent
    /// with and report [`Error::AuthExpired`].
    fn expire(&self, sent_with: &AccessToken) -> Error {
        if self.inner.sessions.clear_if_access_token(sent_with) {
            warn!("Authorization still rejected, session cleared");
        }
        Error::AuthExpired
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", self.base_url())
            .field("sessions", &self.inner.sessions)
            .finish()
    }
}
