//! Output formatting helpers.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use sunulek_core::models::Listing;

/// Print a success message.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print an error message.
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a labeled field.
pub fn field(label: &str, value: &str) {
    println!("{}: {}", label.dimmed(), value);
}

/// Print a dimmed note on stderr.
pub fn note(msg: &str) {
    eprintln!("{}", msg.dimmed());
}

/// Print a value as compact JSON.
pub fn json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    println!("{}", json);
    Ok(())
}

/// Print a value as pretty-printed JSON.
pub fn json_pretty<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// One-line summary of a listing.
pub fn listing_line(listing: &Listing) {
    let price = format!("{:.0} FCFA", listing.price);
    println!(
        "{}  {}  {}  {}",
        listing.slug.cyan(),
        listing.title.bold(),
        price.green(),
        listing.region.dimmed()
    );
}
