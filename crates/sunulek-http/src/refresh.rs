//! Single-flight credential refresh.
//!
//! Only one refresh exchange runs at a time. The first request that needs a
//! refresh starts the exchange on its own Tokio task; every request that
//! needs one while it is outstanding awaits the same shared result. Because
//! the exchange is not owned by any caller, dropping a waiting request
//! leaves it running for the others.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use futures_util::future::{BoxFuture, FutureExt, Shared};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use sunulek_core::{AccessToken, OutboundRequest, RefreshToken, SessionManager};

use crate::endpoints::TOKEN_REFRESH;
use crate::transport::HttpTransport;

/// Result of one refresh exchange, shared by all of its waiters.
#[derive(Debug, Clone)]
pub(crate) enum RefreshOutcome {
    /// The session now holds this access token.
    Refreshed(AccessToken),
    /// The exchange failed and the session was cleared.
    Failed,
}

pub(crate) type PendingRefresh = Shared<BoxFuture<'static, RefreshOutcome>>;

#[derive(Default)]
struct Slot {
    generation: u64,
    inflight: Option<PendingRefresh>,
}

/// Owner of the at-most-one in-flight refresh.
#[derive(Clone, Default)]
pub(crate) struct RefreshCoordinator {
    slot: Arc<Mutex<Slot>>,
}

impl RefreshCoordinator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Join the outstanding exchange, or start one with `start` if none is
    /// running. `start` is only called when a new exchange begins.
    pub(crate) fn join_or_start<F, Fut>(&self, start: F) -> PendingRefresh
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = RefreshOutcome> + Send + 'static,
    {
        let mut slot = lock(&self.slot);
        if let Some(inflight) = &slot.inflight {
            debug!("Joining in-flight refresh");
            return inflight.clone();
        }

        slot.generation += 1;
        let generation = slot.generation;
        let owner = Arc::clone(&self.slot);
        let exchange = start();

        let task = tokio::spawn(async move {
            let outcome = exchange.await;
            let mut slot = lock(&owner);
            if slot.generation == generation {
                slot.inflight = None;
            }
            outcome
        });

        let pending = async move {
            task.await.unwrap_or_else(|e| {
                warn!(error = %e, "Refresh task did not complete");
                RefreshOutcome::Failed
            })
        }
        .boxed()
        .shared();

        slot.inflight = Some(pending.clone());
        pending
    }

    /// True while an exchange is outstanding.
    #[cfg(test)]
    pub(crate) fn is_pending(&self) -> bool {
        lock(&self.slot).inflight.is_some()
    }
}

fn lock(slot: &Mutex<Slot>) -> MutexGuard<'_, Slot> {
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Request body for the refresh endpoint.
#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

/// Response from the refresh endpoint. `refresh` is present when the server
/// rotates refresh tokens.
#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access: String,
    #[serde(default)]
    refresh: Option<String>,
}

/// Exchange `refresh_token` for a new access token and apply the result to
/// `sessions`: install the new token on success, clear the session on any
/// failure.
#[instrument(skip_all)]
pub(crate) async fn exchange(
    transport: Arc<HttpTransport>,
    sessions: SessionManager,
    refresh_token: RefreshToken,
    adopt_rotated: bool,
) -> RefreshOutcome {
    info!("Refreshing access token");

    let request = match OutboundRequest::post(TOKEN_REFRESH).json(&RefreshRequest {
        refresh: refresh_token.as_str(),
    }) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "Could not build refresh request");
            sessions.clear_if_refresh_token(&refresh_token);
            return RefreshOutcome::Failed;
        }
    };

    let response: RefreshResponse = match transport.call_json(&request, None).await {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, "Refresh failed, clearing session");
            sessions.clear_if_refresh_token(&refresh_token);
            return RefreshOutcome::Failed;
        }
    };

    let access = AccessToken::new(response.access);
    let applied = match response.refresh.filter(|_| adopt_rotated) {
        Some(rotated) => {
            sessions.replace_tokens(&refresh_token, access.clone(), RefreshToken::new(rotated))
        }
        None => sessions.replace_access_token(&refresh_token, access.clone()),
    };

    if applied {
        debug!("Access token refreshed");
        RefreshOutcome::Refreshed(access)
    } else {
        // Logged out, logged in again, or the server sent an empty token.
        warn!("Session changed during refresh, discarding result");
        match sessions.current() {
            Some(current) if current.refresh_token() != &refresh_token => {
                RefreshOutcome::Refreshed(current.access_token().clone())
            }
            _ => {
                sessions.clear_if_refresh_token(&refresh_token);
                RefreshOutcome::Failed
            }
        }
    }
}
