//! Marketplace data models as returned by the REST API.

mod category;
mod conversation;
mod favorite;
mod listing;
mod page;
mod user;

pub use category::Category;
pub use conversation::{Conversation, LastMessage, Message, MessageUser, StartedConversation};
pub use favorite::{Favorite, FavoriteToggle};
pub use listing::{Listing, ListingFilter, ListingImage, ListingOwner, ListingStatus};
pub use page::Page;
pub use user::{PublicProfile, Registration, Role, UserSummary};

/// `{"count": n}` responses from the counting endpoints.
#[derive(Debug, Clone, Copy, serde::Deserialize)]
pub struct Count {
    pub count: u64,
}

/// `{"message": "..."}` acknowledgements from action endpoints.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct Notice {
    #[serde(default)]
    pub message: Option<String>,
}
