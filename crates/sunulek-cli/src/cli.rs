//! CLI argument definitions.

use clap::{Args, Parser, Subcommand};

use sunulek_core::types::DEFAULT_API_URL;

use crate::commands::{
    conversations, favorites, listings, login, logout, refresh_token, register, request,
    verify_email, whoami,
};

/// Command-line client for the SunuLek marketplace API.
#[derive(Parser, Debug)]
#[command(name = "sunulek")]
#[command(author, version = env!("SUNULEK_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(flatten)]
    pub api: ApiArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where and how to reach the API.
#[derive(Args, Debug, Clone)]
pub struct ApiArgs {
    /// Base URL of the REST API
    #[arg(long, env = "SUNULEK_API_URL", default_value = DEFAULT_API_URL, global = true)]
    pub api_url: String,

    /// Request timeout in seconds
    #[arg(long, env = "SUNULEK_TIMEOUT_SECS", default_value_t = 30, global = true)]
    pub timeout_secs: u64,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and store the session
    Login(login::LoginArgs),

    /// Create a new account
    Register(register::RegisterArgs),

    /// Confirm an account's email address
    VerifyEmail(verify_email::VerifyEmailArgs),

    /// Log out and forget the stored session
    Logout(logout::LogoutArgs),

    /// Display the logged-in user
    Whoami(whoami::WhoamiArgs),

    /// Exchange the refresh token for a new access token
    RefreshToken(refresh_token::RefreshTokenArgs),

    /// Browse and manage listings
    Listings(listings::ListingsCommand),

    /// Manage favorite listings
    Favorites(favorites::FavoritesCommand),

    /// Read and send messages
    Conversations(conversations::ConversationsCommand),

    /// Send a raw authenticated request
    Request(request::RequestArgs),
}
