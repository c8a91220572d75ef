//! Subcommand implementations.

pub mod conversations;
pub mod favorites;
pub mod listings;
pub mod login;
pub mod logout;
pub mod refresh_token;
pub mod register;
pub mod request;
pub mod verify_email;
pub mod whoami;

use anyhow::Result;

use crate::cli::{ApiArgs, Commands};

pub async fn handle(cmd: Commands, api: &ApiArgs) -> Result<()> {
    match cmd {
        Commands::Login(args) => login::run(args, api).await,
        Commands::Register(args) => register::run(args, api).await,
        Commands::VerifyEmail(args) => verify_email::run(args, api).await,
        Commands::Logout(args) => logout::run(args, api).await,
        Commands::Whoami(args) => whoami::run(args, api).await,
        Commands::RefreshToken(args) => refresh_token::run(args, api).await,
        Commands::Listings(cmd) => listings::handle(cmd, api).await,
        Commands::Favorites(cmd) => favorites::handle(cmd, api).await,
        Commands::Conversations(cmd) => conversations::handle(cmd, api).await,
        Commands::Request(args) => request::run(args, api).await,
    }
}
