//! Shared helpers for the mock API tests.

#![allow(dead_code)]

use sunulek_core::{AccessToken, ApiUrl, ClientConfig, RefreshToken, Session};
use sunulek_http::ApiClient;
use wiremock::MockServer;

/// Mount point of the API on the mock server.
pub const API_PREFIX: &str = "/api/v1";

/// Build an API path on the mock server.
pub fn api(path: &str) -> String {
    format!("{}{}", API_PREFIX, path)
}

/// Client configuration pointing at the mock server.
pub fn mock_config(server: &MockServer) -> ClientConfig {
    let base = ApiUrl::new(format!("{}{}", server.uri(), API_PREFIX)).unwrap();
    ClientConfig::new(base)
}

/// A client with no session.
pub fn anonymous_client(server: &MockServer) -> ApiClient {
    ApiClient::new(mock_config(server)).unwrap()
}

/// A client already holding the given credential pair.
pub fn client_with_session(server: &MockServer, access: &str, refresh: &str) -> ApiClient {
    let client = anonymous_client(server);
    client.sessions().set_session(
        Session::new(AccessToken::new(access), RefreshToken::new(refresh), None).unwrap(),
    );
    client
}
