//! Error types for the SunuLek client.
//!
//! A single error type with explicit variants for network, request,
//! authentication, decoding, input validation and storage failures.

use std::fmt;
use thiserror::Error;

/// The unified error type for client operations.
#[derive(Debug, Error)]
pub enum Error {
    /// No response was obtained (connectivity, DNS, timeout). Never retried.
    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    /// The API answered with a non-2xx status that was not recovered.
    #[error("request failed: {0}")]
    Request(#[from] RequestError),

    /// Authorization failed even after a refresh attempt, or the refresh
    /// exchange itself failed. The session has already been cleared.
    #[error("session expired, please log in again")]
    AuthExpired,

    /// A successful response body could not be decoded.
    #[error("failed to decode response: {message}")]
    Decode { message: String },

    /// Input validation errors (URL, path, credentials, records).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// Persisting or clearing the session failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl Error {
    /// Returns the HTTP status when this error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Request(err) => Some(err.status),
            _ => None,
        }
    }

    /// True for [`Error::AuthExpired`].
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Error::AuthExpired)
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Connection could not be established.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// The request timed out.
    #[error("request timed out: {message}")]
    Timeout { message: String },

    /// Any other failure before a response was received.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// A non-2xx response from the API.
#[derive(Debug, Clone)]
pub struct RequestError {
    /// HTTP status code.
    pub status: u16,
    /// Parsed JSON error body, when the body was JSON.
    pub payload: Option<serde_json::Value>,
}

impl RequestError {
    /// Create a new request error.
    pub fn new(status: u16, payload: Option<serde_json::Value>) -> Self {
        Self { status, payload }
    }

    /// True when the server rejected the request's authorization.
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// Best human-readable message found in the payload.
    ///
    /// Looks at `detail`, `error` and `message` first, then at the first
    /// message of the first field error list (`{"email": ["..."]}`).
    pub fn message(&self) -> Option<String> {
        let payload = self.payload.as_ref()?;
        let object = payload.as_object()?;

        for key in ["detail", "error", "message"] {
            if let Some(text) = object.get(key).and_then(|v| v.as_str()) {
                return Some(text.to_string());
            }
        }

        object.values().find_map(|value| match value {
            serde_json::Value::Array(items) => items
                .first()
                .and_then(|item| item.as_str())
                .map(str::to_string),
            serde_json::Value::String(text) => Some(text.clone()),
            _ => None,
        })
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(message) = self.message() {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for RequestError {}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid API base URL.
    #[error("invalid API URL '{value}': {reason}")]
    ApiUrl { value: String, reason: String },

    /// Invalid request path.
    #[error("invalid request path '{value}': {reason}")]
    Path { value: String, reason: String },

    /// Credentials or tokens that must not be empty.
    #[error("invalid credentials: {reason}")]
    Credentials { reason: String },

    /// Generic invalid input.
    #[error("{message}")]
    Other { message: String },
}

/// Session persistence errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem failure.
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    /// The record could not be encoded.
    #[error("failed to encode session: {message}")]
    Encode { message: String },
}
