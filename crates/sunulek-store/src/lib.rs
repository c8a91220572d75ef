//! sunulek-store - File-backed session persistence.
//!
//! [`FileSessionStore`] keeps the current session as a small JSON file so
//! a login survives process restarts. Plug it into
//! [`sunulek_core::SessionManager::restore`].

mod file;

pub use file::FileSessionStore;
