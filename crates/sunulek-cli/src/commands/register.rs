//! Register command implementation.

use anyhow::{Context, Result};
use clap::Args;

use sunulek_http::RegisterRequest;

use crate::cli::ApiArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Account email
    #[arg(long)]
    pub email: String,

    /// Public username
    #[arg(long)]
    pub username: String,

    #[arg(long, default_value = "")]
    pub first_name: String,

    #[arg(long, default_value = "")]
    pub last_name: String,

    /// Phone number, e.g. +221770000000
    #[arg(long, default_value = "")]
    pub phone: String,

    /// Account password
    #[arg(long, env = "SUNULEK_PASSWORD", hide_env_values = true)]
    pub password: String,
}

pub async fn run(args: RegisterArgs, api: &ApiArgs) -> Result<()> {
    let client = session::connect(api)?;

    let account = RegisterRequest {
        email: args.email,
        username: args.username,
        first_name: args.first_name,
        last_name: args.last_name,
        phone: args.phone,
        password_confirm: args.password.clone(),
        password: args.password,
    };

    let registration = client
        .register(&account)
        .await
        .context("Failed to register")?;

    output::success(&registration.message);
    output::field("User ID", &registration.user_id.to_string());
    output::field("Email", &registration.email);
    println!();
    output::note(&format!(
        "Confirm with: sunulek verify-email {} <CODE>",
        registration.user_id
    ));

    Ok(())
}
