//! Account types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[default]
    #[serde(rename = "acheteur")]
    Buyer,
    #[serde(rename = "vendeur")]
    Seller,
    #[serde(rename = "admin")]
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Buyer => "acheteur",
            Role::Seller => "vendeur",
            Role::Admin => "admin",
        }
    }
}

/// The logged-in user as carried by the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: u64,
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub is_email_verified: bool,
    #[serde(default)]
    pub date_joined: Option<DateTime<Utc>>,
}

impl UserSummary {
    /// Name to greet the user with.
    pub fn display_name(&self) -> &str {
        if !self.first_name.is_empty() {
            &self.first_name
        } else if !self.full_name.is_empty() {
            &self.full_name
        } else {
            &self.email
        }
    }
}

/// Public view of another account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicProfile {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub member_since: Option<String>,
    #[serde(default)]
    pub ads_count: u64,
    #[serde(default)]
    pub date_joined: Option<DateTime<Utc>>,
}

/// Response of a successful registration. The account must confirm its
/// email before it can log in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    pub message: String,
    pub user_id: u64,
    pub email: String,
}
