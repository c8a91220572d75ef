//! Listing subcommands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use sunulek_core::models::ListingFilter;

use crate::cli::ApiArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct ListingsCommand {
    #[command(subcommand)]
    pub command: ListingsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ListingsSubcommand {
    /// Search active listings
    List(ListArgs),

    /// Show one listing
    Get(GetArgs),

    /// List your own listings (requires login)
    Mine(MineArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Free-text search
    #[arg(long)]
    pub search: Option<String>,

    /// Category slug
    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub region: Option<String>,

    #[arg(long)]
    pub min_price: Option<u64>,

    #[arg(long)]
    pub max_price: Option<u64>,

    /// Sort field, e.g. `-created_at` or `price`
    #[arg(long)]
    pub ordering: Option<String>,

    /// Only featured listings
    #[arg(long)]
    pub featured: bool,

    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Print one JSON object per listing
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    pub slug: String,
}

#[derive(Args, Debug)]
pub struct MineArgs {
    /// Filter by status (active, paused, sold, ...)
    #[arg(long)]
    pub status: Option<String>,

    #[arg(long)]
    pub json: bool,
}

pub async fn handle(cmd: ListingsCommand, api: &ApiArgs) -> Result<()> {
    match cmd.command {
        ListingsSubcommand::List(args) => list(args, api).await,
        ListingsSubcommand::Get(args) => get(args, api).await,
        ListingsSubcommand::Mine(args) => mine(args, api).await,
    }
}

async fn list(args: ListArgs, api: &ApiArgs) -> Result<()> {
    let client = session::connect(api)?;

    let filter = ListingFilter {
        search: args.search,
        category: args.category,
        region: args.region,
        min_price: args.min_price,
        max_price: args.max_price,
        ordering: args.ordering,
        featured: args.featured,
        ..Default::default()
    };

    let page = client
        .listings()
        .list(&filter, args.page)
        .await
        .context("Failed to list listings")?;

    if page.results.is_empty() {
        output::note("No listings found.");
        return Ok(());
    }

    for listing in &page.results {
        if args.json {
            output::json(listing)?;
        } else {
            output::listing_line(listing);
        }
    }

    eprintln!();
    output::note(&format!("{} listings in total", page.count));
    if let Some(next) = page.next_page_number() {
        output::note(&format!("Next page: --page {}", next));
    }

    Ok(())
}

async fn get(args: GetArgs, api: &ApiArgs) -> Result<()> {
    let client = session::connect(api)?;

    let listing = client
        .listings()
        .get(&args.slug)
        .await
        .context("Failed to fetch listing")?;

    output::json_pretty(&listing)
}

async fn mine(args: MineArgs, api: &ApiArgs) -> Result<()> {
    let client = session::connect(api)?;
    session::require_session(&client)?;

    let listings = client
        .listings()
        .mine(args.status.as_deref())
        .await
        .context("Failed to list your listings")?;

    if listings.is_empty() {
        output::note("You have no listings.");
        return Ok(());
    }

    for listing in &listings {
        if args.json {
            output::json(listing)?;
        } else {
            output::listing_line(listing);
        }
    }

    Ok(())
}
