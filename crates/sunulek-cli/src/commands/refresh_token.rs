//! Refresh token command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::ApiArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct RefreshTokenArgs {}

pub async fn run(_args: RefreshTokenArgs, api: &ApiArgs) -> Result<()> {
    let client = session::connect(api)?;
    session::require_session(&client)?;

    output::note("Refreshing session...");

    client
        .refresh_session()
        .await
        .context("Failed to refresh session")?;

    output::success("Session refreshed successfully");
    if let Some(user) = client.sessions().current().and_then(|s| s.user().cloned()) {
        output::field("Email", &user.email);
    }

    Ok(())
}
