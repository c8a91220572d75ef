//! Logout command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::ApiArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct LogoutArgs {}

pub async fn run(_args: LogoutArgs, api: &ApiArgs) -> Result<()> {
    let client = session::connect(api)?;

    if !client.sessions().is_authenticated() {
        output::note("Not logged in.");
        return Ok(());
    }

    client.logout().await.context("Failed to logout")?;
    output::success("Logged out");

    Ok(())
}
