//! REST endpoint paths, relative to the API base URL.

pub const LOGIN: &str = "/auth/login/";
pub const REGISTER: &str = "/auth/register/";
pub const LOGOUT: &str = "/auth/logout/";
pub const TOKEN_REFRESH: &str = "/auth/token/refresh/";
pub const RESEND_VERIFICATION: &str = "/auth/resend-verification/";
pub const PROFILE: &str = "/auth/profile/";
pub const CHANGE_PASSWORD: &str = "/auth/change-password/";

pub const LISTINGS: &str = "/annonces/";
pub const MY_LISTINGS: &str = "/annonces/my_ads/";
pub const CATEGORIES: &str = "/categories/";
pub const FAVORITES: &str = "/favorites/";
pub const FAVORITES_TOGGLE: &str = "/favorites/toggle/";
pub const FAVORITES_COUNT: &str = "/favorites/count/";
pub const CONVERSATIONS: &str = "/conversations/";
pub const CONVERSATIONS_START: &str = "/conversations/start/";
pub const CONVERSATIONS_UNREAD: &str = "/conversations/unread-count/";

pub fn verify_email(user_id: u64) -> String {
    format!("/auth/verify-email/{}/", user_id)
}

pub fn public_profile(user_id: u64) -> String {
    format!("/auth/profile/{}/", user_id)
}

pub fn listing(slug: &str) -> String {
    format!("/annonces/{}/", slug)
}

pub fn listing_action(slug: &str, action: &str) -> String {
    format!("/annonces/{}/{}/", slug, action)
}

pub fn category(slug: &str) -> String {
    format!("/categories/{}/", slug)
}

pub fn conversation(id: u64) -> String {
    format!("/conversations/{}/", id)
}

pub fn conversation_send(id: u64) -> String {
    format!("/conversations/{}/send/", id)
}
