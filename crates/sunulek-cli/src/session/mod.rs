//! Client construction around the on-disk session.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use sunulek_core::{ApiUrl, ClientConfig, Session, SessionManager};
use sunulek_http::ApiClient;
use sunulek_store::FileSessionStore;

use crate::cli::ApiArgs;

/// Build a client whose session is restored from, and written back to,
/// the user's data directory.
pub fn connect(args: &ApiArgs) -> Result<ApiClient> {
    let base_url = ApiUrl::new(&args.api_url).context("Invalid API URL")?;
    let config = ClientConfig::new(base_url).timeout(Duration::from_secs(args.timeout_secs));

    let store = FileSessionStore::default_location(config.namespace.clone())
        .context("Could not determine session directory")?;
    tracing::debug!(path = %store.path().display(), "Using session file");

    let sessions = SessionManager::restore(Arc::new(store));
    ApiClient::with_sessions(config, sessions).context("Failed to build HTTP client")
}

/// The current session, or an error telling the user to log in.
pub fn require_session(client: &ApiClient) -> Result<Arc<Session>> {
    client
        .sessions()
        .current()
        .context("No active session. Run 'sunulek login' first.")
}
