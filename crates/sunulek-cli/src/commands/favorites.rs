//! Favorite subcommands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::cli::ApiArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct FavoritesCommand {
    #[command(subcommand)]
    pub command: FavoritesSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum FavoritesSubcommand {
    /// List favorite listings
    List,

    /// Add or remove a listing from favorites
    Toggle {
        /// Listing ID
        ad_id: u64,
    },
}

pub async fn handle(cmd: FavoritesCommand, api: &ApiArgs) -> Result<()> {
    let client = session::connect(api)?;
    session::require_session(&client)?;

    match cmd.command {
        FavoritesSubcommand::List => {
            let page = client
                .favorites()
                .list()
                .await
                .context("Failed to list favorites")?;

            if page.results.is_empty() {
                output::note("No favorites yet.");
            }
            for favorite in &page.results {
                output::listing_line(&favorite.ad);
            }
        }
        FavoritesSubcommand::Toggle { ad_id } => {
            let toggle = client
                .favorites()
                .toggle(ad_id)
                .await
                .context("Failed to toggle favorite")?;

            let fallback = if toggle.is_favorited {
                "Added to favorites"
            } else {
                "Removed from favorites"
            };
            output::success(toggle.message.as_deref().unwrap_or(fallback));
        }
    }

    Ok(())
}
