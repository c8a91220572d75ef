//! Login command implementation.

use anyhow::{Context, Result};
use clap::Args;

use sunulek_core::Credentials;

use crate::cli::ApiArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account email
    #[arg(long)]
    pub email: String,

    /// Account password
    #[arg(long, env = "SUNULEK_PASSWORD", hide_env_values = true)]
    pub password: String,
}

pub async fn run(args: LoginArgs, api: &ApiArgs) -> Result<()> {
    let client = session::connect(api)?;

    output::note("Logging in...");

    let session = client
        .login(Credentials::new(&args.email, &args.password))
        .await
        .context("Failed to login")?;

    output::success("Logged in successfully");
    println!();
    if let Some(user) = session.user() {
        output::field("Name", user.display_name());
        output::field("Email", &user.email);
        output::field("Role", user.role.as_str());
    }
    output::field("API", client.base_url().as_str());

    Ok(())
}
