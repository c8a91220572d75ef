//! Mock API tests for the authenticated request pipeline.
//!
//! These tests use wiremock to play the REST backend and check bearer
//! attachment, the single refresh-and-retry cycle, refresh de-duplication
//! and session clearing.

mod common;

use std::time::Duration;

use serde_json::json;
use sunulek_core::{Error, OutboundRequest};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use common::{anonymous_client, api, client_with_session};

fn unauthorized() -> ResponseTemplate {
    ResponseTemplate::new(401).set_body_json(json!({
        "detail": "Given token not valid for any token type",
        "code": "token_not_valid"
    }))
}

fn favorites_page() -> serde_json::Value {
    json!({"count": 0, "next": null, "previous": null, "results": []})
}

// ============================================================================
// Bearer attachment
// ============================================================================

#[tokio::test]
async fn test_attaches_bearer_when_session_exists() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(api("/favorites/")))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(favorites_page()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with_session(&server, "access-1", "refresh-1");
    let response = client
        .request(OutboundRequest::get("/favorites/"))
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_omits_authorization_without_session() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(api("/categories/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(favorites_page()))
        .mount(&server)
        .await;

    let client = anonymous_client(&server);
    client
        .request(OutboundRequest::get("/categories/"))
        .await
        .unwrap();

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    assert!(!received[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn test_caller_cannot_override_authorization() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(api("/favorites/")))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(favorites_page()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with_session(&server, "access-1", "refresh-1");
    client
        .request(OutboundRequest::get("/favorites/").header("Authorization", "Bearer forged"))
        .await
        .unwrap();
}

// ============================================================================
// Refresh and retry
// ============================================================================

#[tokio::test]
async fn test_refresh_then_retry_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(api("/favorites/")))
        .and(header("authorization", "Bearer expired-access"))
        .respond_with(unauthorized())
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(api("/auth/token/refresh/")))
        .and(body_json(json!({"refresh": "refresh-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "fresh-access"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(api("/favorites/")))
        .and(header("authorization", "Bearer fresh-access"))
        .respond_with(ResponseTemplate::new(200).set_body_json(favorites_page()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with_session(&server, "expired-access", "refresh-1");
    let response = client
        .request(OutboundRequest::get("/favorites/"))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let session = client.sessions().current().unwrap();
    assert_eq!(session.access_token().as_str(), "fresh-access");
    assert_eq!(session.refresh_token().as_str(), "refresh-1");
}

#[tokio::test]
async fn test_refresh_exchange_sends_no_bearer() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(api("/favorites/")))
        .respond_with(unauthorized())
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(api("/auth/token/refresh/")))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Token is invalid or expired",
            "code": "token_not_valid"
        })))
        .mount(&server)
        .await;

    let client = client_with_session(&server, "expired-access", "refresh-1");
    let _ = client.request(OutboundRequest::get("/favorites/")).await;

    let received = server.received_requests().await.unwrap();
    let refresh = received
        .iter()
        .find(|r| r.url.path() == api("/auth/token/refresh/"))
        .unwrap();
    assert!(!refresh.headers.contains_key("authorization"));
}

#[tokio::test]
async fn test_failed_refresh_clears_session() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(api("/favorites/")))
        .respond_with(unauthorized())
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(api("/auth/token/refresh/")))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Token is invalid or expired",
            "code": "token_not_valid"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with_session(&server, "expired-access", "revoked-refresh");
    let mut changes = client.sessions().subscribe();

    let result = client.request(OutboundRequest::get("/favorites/")).await;

    assert!(matches!(result, Err(Error::AuthExpired)));
    assert!(client.sessions().current().is_none());
    assert!(changes.has_changed().unwrap());
    assert!(changes.borrow_and_update().is_none());
}

#[tokio::test]
async fn test_second_unauthorized_does_not_refresh_again() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(api("/favorites/")))
        .respond_with(unauthorized())
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(api("/auth/token/refresh/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "fresh-access"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with_session(&server, "expired-access", "refresh-1");
    let result = client.request(OutboundRequest::get("/favorites/")).await;

    assert!(matches!(result, Err(Error::AuthExpired)));
    assert!(client.sessions().current().is_none());
}

#[tokio::test]
async fn test_already_retried_request_expires_immediately() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(api("/favorites/")))
        .respond_with(unauthorized())
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(api("/auth/token/refresh/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "fresh-access"})))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_with_session(&server, "expired-access", "refresh-1");
    let result = client
        .request(OutboundRequest::get("/favorites/").retried_copy())
        .await;

    assert!(matches!(result, Err(Error::AuthExpired)));
    assert!(client.sessions().current().is_none());
}

/// Mount a 401 on `GET /favorites/` and the given reply on the refresh
/// endpoint, expecting exactly one exchange.
async fn mount_expired_favorites(server: &MockServer, refresh_reply: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(api("/favorites/")))
        .respond_with(unauthorized())
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path(api("/auth/token/refresh/")))
        .respond_with(refresh_reply)
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_refresh_timeout_clears_session() {
    let server = MockServer::start().await;
    mount_expired_favorites(
        &server,
        ResponseTemplate::new(200)
            .set_body_json(json!({"access": "too-late"}))
            .set_delay(Duration::from_secs(3)),
    )
    .await;

    let config = common::mock_config(&server).timeout(Duration::from_millis(300));
    let client = sunulek_http::ApiClient::new(config).unwrap();
    client.sessions().set_session(
        sunulek_core::Session::new(
            sunulek_core::AccessToken::new("expired-access"),
            sunulek_core::RefreshToken::new("refresh-1"),
            None,
        )
        .unwrap(),
    );

    let result = client.request(OutboundRequest::get("/favorites/")).await;

    assert!(matches!(result, Err(Error::AuthExpired)));
    assert!(client.sessions().current().is_none());
}

#[tokio::test]
async fn test_undecodable_refresh_reply_clears_session() {
    let server = MockServer::start().await;
    mount_expired_favorites(
        &server,
        ResponseTemplate::new(200).set_body_string("<html>"),
    )
    .await;

    let client = client_with_session(&server, "expired-access", "refresh-1");
    let result = client.request(OutboundRequest::get("/favorites/")).await;

    assert!(matches!(result, Err(Error::AuthExpired)));
    assert!(client.sessions().current().is_none());
}

#[tokio::test]
async fn test_empty_refreshed_access_clears_session() {
    let server = MockServer::start().await;
    mount_expired_favorites(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"access": ""})),
    )
    .await;

    let client = client_with_session(&server, "expired-access", "refresh-1");
    let result = client.request(OutboundRequest::get("/favorites/")).await;

    assert!(matches!(result, Err(Error::AuthExpired)));
    assert!(client.sessions().current().is_none());
}

#[tokio::test]
async fn test_anonymous_retried_unauthorized_is_a_plain_request_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(api("/favorites/")))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Authentication credentials were not provided."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = anonymous_client(&server);
    let err = client
        .request(OutboundRequest::get("/favorites/").retried_copy())
        .await
        .unwrap_err();

    assert!(!err.is_auth_expired());
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn test_anonymous_unauthorized_is_a_plain_request_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(api("/favorites/")))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Authentication credentials were not provided."
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(api("/auth/token/refresh/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "x"})))
        .expect(0)
        .mount(&server)
        .await;

    let client = anonymous_client(&server);
    let err = client
        .request(OutboundRequest::get("/favorites/"))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(401));
}

// ============================================================================
// Non-auth failures
// ============================================================================

#[tokio::test]
async fn test_other_errors_surface_without_retry() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(api("/annonces/velo-vtt/")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Not found."})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(api("/auth/token/refresh/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "x"})))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_with_session(&server, "access-1", "refresh-1");
    let err = client
        .request(OutboundRequest::get("/annonces/velo-vtt/"))
        .await
        .unwrap_err();

    match err {
        Error::Request(e) => {
            assert_eq!(e.status, 404);
            assert_eq!(e.payload, Some(json!({"detail": "Not found."})));
            assert_eq!(e.message().as_deref(), Some("Not found."));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(client.sessions().is_authenticated());
}

#[tokio::test]
async fn test_network_error_is_not_retried() {
    // Reserve a port, then free it so nothing is listening there.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let base = sunulek_core::ApiUrl::new(format!("http://127.0.0.1:{}/api/v1", port)).unwrap();
    let config = sunulek_core::ClientConfig::new(base).timeout(Duration::from_secs(2));
    let client = sunulek_http::ApiClient::new(config).unwrap();
    client.sessions().set_session(
        sunulek_core::Session::new(
            sunulek_core::AccessToken::new("access-1"),
            sunulek_core::RefreshToken::new("refresh-1"),
            None,
        )
        .unwrap(),
    );

    let err = client
        .request(OutboundRequest::get("/favorites/"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Network(_)));
    assert!(client.sessions().is_authenticated());
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test]
async fn test_concurrent_unauthorized_share_one_refresh() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(api("/favorites/")))
        .and(header("authorization", "Bearer expired-access"))
        .respond_with(unauthorized())
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(api("/auth/token/refresh/")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access": "fresh-access"}))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(api("/favorites/")))
        .and(header("authorization", "Bearer fresh-access"))
        .respond_with(ResponseTemplate::new(200).set_body_json(favorites_page()))
        .expect(5)
        .mount(&server)
        .await;

    let client = client_with_session(&server, "expired-access", "refresh-1");

    let requests = (0..5).map(|_| client.request(OutboundRequest::get("/favorites/")));
    let results = futures_util::future::join_all(requests).await;

    assert!(results.iter().all(|r| r.is_ok()));
    assert_eq!(
        client.sessions().access_token().unwrap().as_str(),
        "fresh-access"
    );
}

#[tokio::test]
async fn test_concurrent_unauthorized_share_failed_refresh() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(api("/favorites/")))
        .respond_with(unauthorized())
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(api("/auth/token/refresh/")))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"detail": "Token is blacklisted"}))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with_session(&server, "expired-access", "refresh-1");

    let requests = (0..4).map(|_| client.request(OutboundRequest::get("/favorites/")));
    let results = futures_util::future::join_all(requests).await;

    assert!(results.iter().all(|r| matches!(r, Err(Error::AuthExpired))));
    assert!(client.sessions().current().is_none());
}

#[tokio::test]
async fn test_cancelled_request_does_not_cancel_shared_refresh() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(api("/favorites/")))
        .and(header("authorization", "Bearer expired-access"))
        .respond_with(unauthorized())
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(api("/auth/token/refresh/")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access": "fresh-access"}))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(api("/favorites/")))
        .and(header("authorization", "Bearer fresh-access"))
        .respond_with(ResponseTemplate::new(200).set_body_json(favorites_page()))
        .mount(&server)
        .await;

    let client = client_with_session(&server, "expired-access", "refresh-1");

    let cancelled = {
        let client = client.clone();
        tokio::spawn(async move { client.request(OutboundRequest::get("/favorites/")).await })
    };
    let survivor = {
        let client = client.clone();
        tokio::spawn(async move { client.request(OutboundRequest::get("/favorites/")).await })
    };

    tokio::time::sleep(Duration::from_millis(100)).await;
    cancelled.abort();

    let result = survivor.await.unwrap();
    assert!(result.is_ok());
    assert_eq!(
        client.sessions().access_token().unwrap().as_str(),
        "fresh-access"
    );
}

#[tokio::test]
async fn test_refresh_completes_even_if_only_waiter_is_dropped() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(api("/favorites/")))
        .respond_with(unauthorized())
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(api("/auth/token/refresh/")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access": "fresh-access"}))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with_session(&server, "expired-access", "refresh-1");

    let timed_out = tokio::time::timeout(
        Duration::from_millis(100),
        client.request(OutboundRequest::get("/favorites/")),
    )
    .await;
    assert!(timed_out.is_err());

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(
        client.sessions().access_token().unwrap().as_str(),
        "fresh-access"
    );
}

#[tokio::test]
async fn test_stale_unauthorized_retries_with_newer_token() {
    let server = MockServer::start().await;

    // The first request is slow; by the time its 401 arrives the session
    // already holds a newer token.
    Mock::given(method("GET"))
        .and(path(api("/annonces/my_ads/")))
        .and(header("authorization", "Bearer expired-access"))
        .respond_with(unauthorized().set_delay(Duration::from_millis(200)))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(api("/annonces/my_ads/")))
        .and(header("authorization", "Bearer newer-access"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(api("/auth/token/refresh/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "x"})))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_with_session(&server, "expired-access", "refresh-1");

    let pending = {
        let client = client.clone();
        tokio::spawn(async move {
            client
                .request(OutboundRequest::get("/annonces/my_ads/"))
                .await
        })
    };

    tokio::time::sleep(Duration::from_millis(50)).await;
    client.sessions().replace_access_token(
        &sunulek_core::RefreshToken::new("refresh-1"),
        sunulek_core::AccessToken::new("newer-access"),
    );

    assert!(pending.await.unwrap().is_ok());
}

// ============================================================================
// Bodies
// ============================================================================

#[tokio::test]
async fn test_multipart_body_is_sent_as_form_data() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(api("/annonces/")))
        .and(|req: &Request| {
            req.headers
                .get("content-type")
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| v.starts_with("multipart/form-data"))
        })
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 9})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with_session(&server, "access-1", "refresh-1");
    let form = sunulek_core::MultipartForm::new()
        .text("title", "Vélo")
        .file("uploaded_images", "velo.jpg", "image/jpeg", vec![1, 2, 3]);

    let response = client
        .request(OutboundRequest::post("/annonces/").multipart(form))
        .await
        .unwrap();
    assert_eq!(response.status(), 201);

    let received = server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&received[0].body);
    assert!(body.contains("name=\"title\""));
    assert!(body.contains("filename=\"velo.jpg\""));
}

#[tokio::test]
async fn test_retried_multipart_body_is_resent() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path(api("/auth/profile/")))
        .and(header("authorization", "Bearer expired-access"))
        .respond_with(unauthorized())
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(api("/auth/token/refresh/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "fresh-access"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path(api("/auth/profile/")))
        .and(header("authorization", "Bearer fresh-access"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 3,
            "email": "awa@example.sn",
            "first_name": "Awa"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with_session(&server, "expired-access", "refresh-1");
    let form = sunulek_core::MultipartForm::new().text("first_name", "Awa");
    client
        .request(OutboundRequest::patch("/auth/profile/").multipart(form))
        .await
        .unwrap();

    let received = server.received_requests().await.unwrap();
    let retried = received
        .iter()
        .filter(|r| r.url.path() == api("/auth/profile/"))
        .last()
        .unwrap();
    assert!(String::from_utf8_lossy(&retried.body).contains("Awa"));
}
