//! sunulek-http - Authenticated HTTP client for the SunuLek marketplace API.
//!
//! [`ApiClient::request`] attaches the current bearer token to every call
//! and recovers from an expired access token with exactly one refresh and
//! one retry. Concurrent requests that fail authorization at the same time
//! share a single refresh exchange.
//!
//! # Example
//!
//! ```no_run
//! use sunulek_core::{ClientConfig, Credentials, OutboundRequest};
//! use sunulek_http::ApiClient;
//!
//! # async fn example() -> Result<(), sunulek_core::Error> {
//! let client = ApiClient::new(ClientConfig::default())?;
//! client.login(Credentials::new("awa@example.sn", "secret")).await?;
//!
//! let favorites = client.request(OutboundRequest::get("/favorites/")).await?;
//! println!("{}", favorites.text());
//! # Ok(())
//! # }
//! ```

mod auth;
mod client;
pub mod endpoints;
mod refresh;
mod resources;
mod transport;

pub use auth::RegisterRequest;
pub use client::{ApiClient, ApiResponse};
pub use resources::{Categories, Conversations, Favorites, Listings};
