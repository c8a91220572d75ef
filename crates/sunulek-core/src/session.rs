//! Authenticated session state.
//!
//! A [`Session`] is an immutable snapshot of the credential pair and the
//! logged-in user. The [`SessionManager`] owns the one current snapshot for a
//! client instance and funnels every mutation through its own methods, each
//! of which swaps the whole snapshot at once. Readers therefore always see
//! either the old or the new session, never a mix of both.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::{Error, InvalidInputError};
use crate::models::UserSummary;
use crate::tokens::{AccessToken, RefreshToken};
use crate::traits::SessionStore;

/// Credentials and user of a logged-in account.
///
/// Both tokens are guaranteed non-empty; an unauthenticated client has no
/// `Session` at all.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    access_token: AccessToken,
    refresh_token: RefreshToken,
    user: Option<UserSummary>,
}

impl Session {
    /// Create a new session.
    ///
    /// # Errors
    ///
    /// Returns an error if either token is empty.
    pub fn new(
        access_token: AccessToken,
        refresh_token: RefreshToken,
        user: Option<UserSummary>,
    ) -> Result<Self, Error> {
        if access_token.is_empty() {
            return Err(InvalidInputError::Credentials {
                reason: "access token is empty".to_string(),
            }
            .into());
        }
        if refresh_token.is_empty() {
            return Err(InvalidInputError::Credentials {
                reason: "refresh token is empty".to_string(),
            }
            .into());
        }

        Ok(Self {
            access_token,
            refresh_token,
            user,
        })
    }

    pub fn access_token(&self) -> &AccessToken {
        &self.access_token
    }

    pub fn refresh_token(&self) -> &RefreshToken {
        &self.refresh_token
    }

    pub fn user(&self) -> Option<&UserSummary> {
        self.user.as_ref()
    }

    /// Always true: a `Session` cannot hold empty credentials.
    pub fn is_authenticated(&self) -> bool {
        !self.access_token.is_empty() && !self.refresh_token.is_empty()
    }

    /// Copy of this session with a new access token. The refresh token and
    /// user are unchanged.
    pub fn with_access_token(&self, access_token: AccessToken) -> Result<Self, Error> {
        Self::new(access_token, self.refresh_token.clone(), self.user.clone())
    }

    /// Copy of this session with a new user record.
    pub fn with_user(&self, user: UserSummary) -> Self {
        Self {
            user: Some(user),
            ..self.clone()
        }
    }
}

/// Persistence record for a [`Session`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub access: String,
    pub refresh: String,
    #[serde(default)]
    pub user: Option<UserSummary>,
}

impl From<&Session> for StoredSession {
    fn from(session: &Session) -> Self {
        Self {
            access: session.access_token.as_str().to_string(),
            refresh: session.refresh_token.as_str().to_string(),
            user: session.user.clone(),
        }
    }
}

impl TryFrom<StoredSession> for Session {
    type Error = Error;

    fn try_from(stored: StoredSession) -> Result<Self, Self::Error> {
        Session::new(
            AccessToken::new(stored.access),
            RefreshToken::new(stored.refresh),
            stored.user,
        )
    }
}

/// Owner of the current session for one client instance.
///
/// Cheap to clone; all clones share the same state. Every mutation is
/// written through to the attached [`SessionStore`], if any.
///
/// # Example
///
/// ```
/// use sunulek_core::{AccessToken, RefreshToken, Session, SessionManager};
///
/// let manager = SessionManager::new();
/// assert!(!manager.is_authenticated());
///
/// let session = Session::new(AccessToken::new("a"), RefreshToken::new("r"), None).unwrap();
/// manager.set_session(session.clone());
/// assert_eq!(manager.current().as_deref(), Some(&session));
///
/// manager.clear_session();
/// assert!(manager.current().is_none());
/// ```
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<ManagerInner>,
}

struct ManagerInner {
    state: watch::Sender<Option<Arc<Session>>>,
    store: Option<Arc<dyn SessionStore>>,
}

impl SessionManager {
    /// A manager with no session and no persistence.
    pub fn new() -> Self {
        Self::build(None, None)
    }

    /// A manager with no session that persists every change to `store`.
    pub fn with_store(store: Arc<dyn SessionStore>) -> Self {
        Self::build(None, Some(store))
    }

    /// Restore the persisted session from `store`.
    ///
    /// An absent or malformed record yields a manager with no session.
    pub fn restore(store: Arc<dyn SessionStore>) -> Self {
        let session = store.load().and_then(|stored| match Session::try_from(stored) {
            Ok(session) => Some(Arc::new(session)),
            Err(e) => {
                warn!(error = %e, "Ignoring persisted session");
                None
            }
        });

        if session.is_some() {
            debug!("Restored persisted session");
        }

        Self::build(session, Some(store))
    }

    fn build(session: Option<Arc<Session>>, store: Option<Arc<dyn SessionStore>>) -> Self {
        let (state, _) = watch::channel(session);
        Self {
            inner: Arc::new(ManagerInner { state, store }),
        }
    }

    /// The current session snapshot.
    pub fn current(&self) -> Option<Arc<Session>> {
        self.inner.state.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner
            .state
            .borrow()
            .as_ref()
            .is_some_and(|s| s.is_authenticated())
    }

    /// Access token of the current session, if any.
    pub fn access_token(&self) -> Option<AccessToken> {
        self.inner
            .state
            .borrow()
            .as_ref()
            .map(|s| s.access_token.clone())
    }

    /// Install a new session (login, registration confirmation).
    pub fn set_session(&self, session: Session) {
        info!("Session established");
        let session = Arc::new(session);
        self.inner.state.send_modify(|state| {
            self.persist(Some(&session));
            *state = Some(session);
        });
    }

    /// Drop the current session (logout, failed refresh).
    pub fn clear_session(&self) {
        self.clear_if(|_| true);
    }

    /// Clear the session only if it still holds `refresh_token`. Returns
    /// true if a session was cleared.
    pub fn clear_if_refresh_token(&self, refresh_token: &RefreshToken) -> bool {
        self.clear_if(|session| session.refresh_token == *refresh_token)
    }

    /// Clear the session only if it still holds `access_token`. Returns
    /// true if a session was cleared.
    pub fn clear_if_access_token(&self, access_token: &AccessToken) -> bool {
        self.clear_if(|session| session.access_token == *access_token)
    }

    fn clear_if(&self, matches: impl FnOnce(&Session) -> bool) -> bool {
        self.inner.state.send_if_modified(|state| {
            if !state.as_deref().is_some_and(matches) {
                return false;
            }
            info!("Session cleared");
            self.persist(None);
            *state = None;
            true
        })
    }

    /// Replace the user record of the current session. Returns false when
    /// there is no session.
    pub fn set_user(&self, user: UserSummary) -> bool {
        self.inner.state.send_if_modified(|state| {
            let Some(current) = state.as_ref() else {
                return false;
            };
            let updated = Arc::new(current.with_user(user));
            self.persist(Some(&updated));
            *state = Some(updated);
            true
        })
    }

    /// Install a refreshed access token.
    ///
    /// Applies only if the current session still holds `exchanged`, the
    /// refresh token that produced `access_token`. Returns false otherwise,
    /// e.g. after a logout or a new login during the exchange.
    pub fn replace_access_token(&self, exchanged: &RefreshToken, access_token: AccessToken) -> bool {
        self.inner.state.send_if_modified(|state| {
            let Some(current) = state.as_ref() else {
                return false;
            };
            if current.refresh_token != *exchanged {
                return false;
            }
            match current.with_access_token(access_token) {
                Ok(updated) => {
                    let updated = Arc::new(updated);
                    self.persist(Some(&updated));
                    *state = Some(updated);
                    true
                }
                Err(e) => {
                    warn!(error = %e, "Rejected refreshed access token");
                    false
                }
            }
        })
    }

    /// Install a rotated credential pair. Same precondition as
    /// [`SessionManager::replace_access_token`].
    pub fn replace_tokens(
        &self,
        exchanged: &RefreshToken,
        access_token: AccessToken,
        refresh_token: RefreshToken,
    ) -> bool {
        self.inner.state.send_if_modified(|state| {
            let Some(current) = state.as_ref() else {
                return false;
            };
            if current.refresh_token != *exchanged {
                return false;
            }
            match Session::new(access_token, refresh_token, current.user.clone()) {
                Ok(updated) => {
                    let updated = Arc::new(updated);
                    self.persist(Some(&updated));
                    *state = Some(updated);
                    true
                }
                Err(e) => {
                    warn!(error = %e, "Rejected rotated credentials");
                    false
                }
            }
        })
    }

    /// Watch session changes. The receiver sees `None` when the session is
    /// cleared, which is the cue to send the user back to a login screen.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<Session>>> {
        self.inner.state.subscribe()
    }

    fn persist(&self, session: Option<&Session>) {
        let Some(store) = &self.inner.store else {
            return;
        };

        let result = match session {
            Some(session) => store.save(&StoredSession::from(session)),
            None => store.clear(),
        };

        if let Err(e) = result {
            warn!(error = %e, "Failed to persist session");
        }
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("authenticated", &self.is_authenticated())
            .field("persistent", &self.inner.store.is_some())
            .finish()
    }
}
