//! Email confirmation command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::ApiArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct VerifyEmailArgs {
    /// Account ID returned by `register`
    #[arg(required_unless_present = "resend")]
    pub user_id: Option<u64>,

    /// Six-character code from the confirmation email
    #[arg(required_unless_present = "resend")]
    pub code: Option<String>,

    /// Send a new code to this email instead
    #[arg(long, value_name = "EMAIL", conflicts_with_all = ["user_id", "code"])]
    pub resend: Option<String>,
}

pub async fn run(args: VerifyEmailArgs, api: &ApiArgs) -> Result<()> {
    let client = session::connect(api)?;

    let notice = match (args.resend, args.user_id, args.code) {
        (Some(email), _, _) => client
            .resend_verification(&email)
            .await
            .context("Failed to resend confirmation code")?,
        (None, Some(user_id), Some(code)) => client
            .verify_email(user_id, &code)
            .await
            .context("Failed to verify email")?,
        _ => anyhow::bail!("A user ID and code are required"),
    };

    output::success(notice.message.as_deref().unwrap_or("Done"));

    Ok(())
}
