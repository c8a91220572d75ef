//! sunulek-core - Core types for the SunuLek marketplace API client.
//!
//! This crate holds everything the client needs that is not network code:
//! credentials and tokens, the validated API base URL, the outbound request
//! descriptor, the session manager and its persistence trait, and the
//! marketplace data models.

pub mod config;
pub mod credentials;
pub mod error;
pub mod memory;
pub mod models;
pub mod request;
pub mod session;
pub mod tokens;
pub mod traits;
pub mod types;

pub use config::ClientConfig;
pub use credentials::Credentials;
pub use error::Error;
pub use memory::MemorySessionStore;
pub use request::{FormPart, Method, MultipartForm, OutboundRequest, RequestBody};
pub use session::{Session, SessionManager, StoredSession};
pub use tokens::{AccessToken, RefreshToken};
pub use traits::SessionStore;
pub use types::ApiUrl;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
