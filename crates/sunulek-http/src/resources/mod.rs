//! Typed helpers for the marketplace resources.
//!
//! Each helper borrows the [`ApiClient`] and routes through
//! [`ApiClient::request`], so bearer attachment and refresh apply.

mod categories;
mod conversations;
mod favorites;
mod listings;

pub use categories::Categories;
pub use conversations::Conversations;
pub use favorites::Favorites;
pub use listings::Listings;

use crate::client::ApiClient;

impl ApiClient {
    /// Listings ("annonces").
    pub fn listings(&self) -> Listings<'_> {
        Listings::new(self)
    }

    pub fn categories(&self) -> Categories<'_> {
        Categories::new(self)
    }

    /// The current user's saved listings.
    pub fn favorites(&self) -> Favorites<'_> {
        Favorites::new(self)
    }

    /// Buyer/seller conversations.
    pub fn conversations(&self) -> Conversations<'_> {
        Conversations::new(self)
    }
}
