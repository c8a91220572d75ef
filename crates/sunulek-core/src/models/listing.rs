//! Classified listings ("annonces").

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::Category;

/// Moderation / lifecycle state of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    Draft,
    Pending,
    Active,
    Paused,
    Sold,
    Expired,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingImage {
    pub id: u64,
    pub image: String,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default)]
    pub order: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingOwner {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// A listing as returned by the list and detail endpoints. Fields only
/// present on the detail view are optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: u64,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(deserialize_with = "de_price")]
    pub price: f64,
    #[serde(default)]
    pub is_negotiable: bool,
    pub region: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub neighborhood: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub user: Option<ListingOwner>,
    #[serde(default)]
    pub images: Vec<ListingImage>,
    #[serde(default)]
    pub primary_image: Option<String>,
    #[serde(default)]
    pub status: Option<ListingStatus>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub is_favorited: bool,
    #[serde(default)]
    pub is_owner: bool,
    #[serde(default)]
    pub views_count: u64,
    pub created_at: DateTime<Utc>,
}

// Decimal fields arrive as strings ("15000.00") or plain numbers.
fn de_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Price {
        Number(f64),
        Text(String),
    }

    match Price::deserialize(deserializer)? {
        Price::Number(n) => Ok(n),
        Price::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Search and filter parameters for `GET /annonces/`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingFilter {
    pub search: Option<String>,
    pub category: Option<String>,
    pub region: Option<String>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    pub ordering: Option<String>,
    pub user: Option<u64>,
    pub status: Option<String>,
    pub featured: bool,
}

impl ListingFilter {
    /// Query pairs for the set filters, in a stable order.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        let mut push = |key: &str, value: Option<String>| {
            if let Some(value) = value.filter(|v| !v.is_empty()) {
                pairs.push((key.to_string(), value));
            }
        };

        push("search", self.search.clone());
        push("category", self.category.clone());
        push("region", self.region.clone());
        push("min_price", self.min_price.map(|p| p.to_string()));
        push("max_price", self.max_price.map(|p| p.to_string()));
        push("ordering", self.ordering.clone());
        push("user", self.user.map(|u| u.to_string()));
        push("status", self.status.clone());
        if self.featured {
            push("is_featured", Some("true".to_string()));
        }
        pairs
    }
}
