use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Listing;

/// A listing saved by the current user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Favorite {
    pub id: u64,
    pub ad: Listing,
    pub created_at: DateTime<Utc>,
}

/// Result of toggling a favorite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteToggle {
    pub is_favorited: bool,
    #[serde(default)]
    pub message: Option<String>,
}
