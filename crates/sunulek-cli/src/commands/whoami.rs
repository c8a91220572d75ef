//! Whoami command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::ApiArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct WhoamiArgs {
    /// Show the stored copy without contacting the API
    #[arg(long)]
    pub offline: bool,
}

pub async fn run(args: WhoamiArgs, api: &ApiArgs) -> Result<()> {
    let client = session::connect(api)?;
    let stored = session::require_session(&client)?;

    let user = if args.offline {
        stored
            .user()
            .cloned()
            .context("The stored session has no user details")?
    } else {
        client.profile().await.context("Failed to fetch profile")?
    };

    output::field("ID", &user.id.to_string());
    output::field("Name", user.display_name());
    output::field("Email", &user.email);
    if !user.username.is_empty() {
        output::field("Username", &user.username);
    }
    output::field("Role", user.role.as_str());
    output::field(
        "Email verified",
        if user.is_email_verified { "yes" } else { "no" },
    );
    if let Some(joined) = user.date_joined {
        output::field("Joined", &joined.format("%Y-%m-%d").to_string());
    }

    Ok(())
}
