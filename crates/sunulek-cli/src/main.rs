//! sunulek - command-line client for the SunuLek marketplace API.
//!
//! A thin wrapper over `sunulek-http` for exploring the API by hand. The
//! session is kept on disk between invocations.

mod cli;
mod commands;
mod output;
mod session;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json_logs);

    let result = commands::handle(cli.command, &cli.api).await;
    if let Err(err) = &result
        && is_auth_expired(err)
    {
        output::error("Your session has expired. Run 'sunulek login' to sign in again.");
    }
    result
}

fn is_auth_expired(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<sunulek_core::Error>()
            .is_some_and(sunulek_core::Error::is_auth_expired)
    })
}

fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
