//! Client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::ApiUrl;

/// Storage namespace for the persisted session.
pub const DEFAULT_NAMESPACE: &str = "sunulek-auth";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for an API client instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL every request path is joined onto.
    pub base_url: ApiUrl,
    /// Per-request timeout, including the refresh exchange.
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
    /// `User-Agent` header value.
    pub user_agent: String,
    /// Key under which the session is persisted.
    pub namespace: String,
    /// Install the refresh token returned by a rotating refresh endpoint
    /// instead of keeping the current one.
    pub adopt_rotated_refresh: bool,
}

impl ClientConfig {
    pub fn new(base_url: ApiUrl) -> Self {
        Self {
            base_url,
            ..Self::default()
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn adopt_rotated_refresh(mut self, adopt: bool) -> Self {
        self.adopt_rotated_refresh = adopt;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: ApiUrl::default(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("sunulek/", env!("CARGO_PKG_VERSION")).to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            adopt_rotated_refresh: false,
        }
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
