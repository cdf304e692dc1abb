//! Mock API tests for the authenticated request dispatcher.
//!
//! These tests use wiremock to simulate the blog API and check how many
//! times each endpoint is hit, and what the session looks like afterwards.

use std::time::Duration;

use bigs_core::error::{RequestError, TransportError};
use bigs_core::{AccessToken, ApiUrl, Error, Page, Post, RefreshToken, SessionState, TokenPair};
use bigs_http::{ApiClient, Dispatcher, FormPart, RequestDescriptor};
use reqwest::header::{AUTHORIZATION, HeaderName, HeaderValue};
use serde_json::{Value, json};
use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn mock_api_url(server: &MockServer) -> ApiUrl {
    ApiUrl::new(format!("http://127.0.0.1:{}", server.address().port())).unwrap()
}

/// A dispatcher for `server` with a session signed in as Alice.
fn signed_in(server: &MockServer, access: &str, refresh: &str) -> Dispatcher {
    let session = SessionState::in_memory();
    session.login("Alice", "alice@example.com", TokenPair::new(access, refresh), None);
    dispatcher(server, session)
}

fn dispatcher(server: &MockServer, session: SessionState) -> Dispatcher {
    let client = ApiClient::new(mock_api_url(server)).unwrap();
    Dispatcher::with_http_refresh(client, session)
}

fn boards() -> RequestDescriptor {
    RequestDescriptor::get("/api/boards")
        .query("page", 0)
        .query("size", 10)
}

fn page_body() -> Value {
    json!({"content": [{"id": 1, "title": "hello", "category": "FREE"}]})
}

async fn mount_refresh(server: &MockServer, refresh: &str, response: ResponseTemplate, times: u64) {
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .and(body_json(json!({"refreshToken": refresh})))
        .respond_with(response)
        .expect(times)
        .mount(server)
        .await;
}

async fn mount_boards(server: &MockServer, bearer: &str, response: ResponseTemplate, times: u64) {
    Mock::given(method("GET"))
        .and(path("/api/boards"))
        .and(header("authorization", format!("Bearer {bearer}").as_str()))
        .respond_with(response)
        .expect(times)
        .mount(server)
        .await;
}

// ============================================================================
// Happy Path
// ============================================================================

#[tokio::test]
async fn test_valid_token_needs_no_refresh() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/boards"))
        .and(query_param("page", "0"))
        .and(query_param("size", "10"))
        .and(header("authorization", "Bearer AT1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body()))
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh(&server, "RT1", ResponseTemplate::new(200), 0).await;

    let dispatcher = signed_in(&server, "AT1", "RT1");
    let page: Page<Post> = dispatcher.dispatch(&boards()).await.unwrap();

    assert_eq!(page.content[0].title, "hello");
    assert_eq!(dispatcher.session().access_token(), Some(AccessToken::new("AT1")));
}

#[tokio::test]
async fn test_empty_success_body_decodes_as_null() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/boards/7"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let dispatcher = signed_in(&server, "AT1", "RT1");
    let body: Option<Value> = dispatcher
        .dispatch(&RequestDescriptor::delete("/api/boards/7"))
        .await
        .unwrap();

    assert_eq!(body, None);
}

// ============================================================================
// Refresh and Retry
// ============================================================================

#[tokio::test]
async fn test_expired_token_is_refreshed_and_retried_once() {
    let server = MockServer::start().await;

    mount_boards(&server, "AT1", ResponseTemplate::new(401), 1).await;
    mount_boards(
        &server,
        "AT2",
        ResponseTemplate::new(200).set_body_json(page_body()),
        1,
    )
    .await;
    mount_refresh(
        &server,
        "RT1",
        ResponseTemplate::new(200)
            .set_body_json(json!({"accessToken": "AT2", "refreshToken": "RT2"})),
        1,
    )
    .await;

    let dispatcher = signed_in(&server, "AT1", "RT1");
    let page: Page<Post> = dispatcher.dispatch(&boards()).await.unwrap();

    assert_eq!(page.content.len(), 1);
    let session = dispatcher.session();
    assert_eq!(session.access_token(), Some(AccessToken::new("AT2")));
    assert_eq!(session.refresh_token(), Some(RefreshToken::new("RT2")));
    assert_eq!(session.profile().display_name, "Alice");
    assert_eq!(session.profile().email, "alice@example.com");
}

#[tokio::test]
async fn test_forbidden_also_triggers_refresh() {
    let server = MockServer::start().await;

    mount_boards(&server, "AT1", ResponseTemplate::new(403), 1).await;
    mount_boards(
        &server,
        "AT2",
        ResponseTemplate::new(200).set_body_json(page_body()),
        1,
    )
    .await;
    mount_refresh(
        &server,
        "RT1",
        ResponseTemplate::new(200)
            .set_body_json(json!({"accessToken": "AT2", "refreshToken": "RT2"})),
        1,
    )
    .await;

    let dispatcher = signed_in(&server, "AT1", "RT1");
    let result: Result<Page<Post>, Error> = dispatcher.dispatch(&boards()).await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_refresh_request_carries_no_bearer() {
    let server = MockServer::start().await;

    mount_boards(&server, "AT1", ResponseTemplate::new(401), 1).await;
    mount_boards(
        &server,
        "AT2",
        ResponseTemplate::new(200).set_body_json(page_body()),
        1,
    )
    .await;
    mount_refresh(
        &server,
        "RT1",
        ResponseTemplate::new(200)
            .set_body_json(json!({"accessToken": "AT2", "refreshToken": "RT2"})),
        1,
    )
    .await;

    let dispatcher = signed_in(&server, "AT1", "RT1");
    let _: Page<Post> = dispatcher.dispatch(&boards()).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let refresh = requests
        .iter()
        .find(|r| r.url.path() == "/auth/refresh")
        .unwrap();
    assert!(refresh.headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_rejected_again_after_refresh_expires_session() {
    let server = MockServer::start().await;

    mount_boards(&server, "AT1", ResponseTemplate::new(401), 1).await;
    mount_boards(&server, "AT2", ResponseTemplate::new(401), 1).await;
    mount_refresh(
        &server,
        "RT1",
        ResponseTemplate::new(200)
            .set_body_json(json!({"accessToken": "AT2", "refreshToken": "RT2"})),
        1,
    )
    .await;

    let dispatcher = signed_in(&server, "AT1", "RT1");
    let err = dispatcher.dispatch::<Value>(&boards()).await.unwrap_err();

    assert!(err.is_auth_expired());
    assert!(!dispatcher.session().is_authenticated());
    assert_eq!(dispatcher.session().profile().display_name, "User");
}

#[tokio::test]
async fn test_retry_resends_multipart_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/boards"))
        .and(header("authorization", "Bearer AT1"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/boards"))
        .and(header("authorization", "Bearer AT2"))
        .and(body_string_contains("\"title\":\"hello\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 3})))
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh(
        &server,
        "RT1",
        ResponseTemplate::new(200)
            .set_body_json(json!({"accessToken": "AT2", "refreshToken": "RT2"})),
        1,
    )
    .await;

    let dispatcher = signed_in(&server, "AT1", "RT1");
    let request = RequestDescriptor::post("/api/boards").multipart(vec![
        FormPart::json("request", &json!({"title": "hello"})).unwrap(),
    ]);
    let created: Value = dispatcher.dispatch(&request).await.unwrap();

    assert_eq!(created["id"], 3);
}

// ============================================================================
// Refresh Failures
// ============================================================================

#[tokio::test]
async fn test_partial_refresh_response_expires_session() {
    let server = MockServer::start().await;

    mount_boards(&server, "AT1", ResponseTemplate::new(401), 1).await;
    mount_refresh(
        &server,
        "RT1",
        ResponseTemplate::new(200).set_body_json(json!({"accessToken": "AT2"})),
        1,
    )
    .await;

    let dispatcher = signed_in(&server, "AT1", "RT1");
    let err = dispatcher.dispatch::<Value>(&boards()).await.unwrap_err();

    assert!(err.is_auth_expired());
    // The half pair is never adopted.
    assert_eq!(dispatcher.session().access_token(), None);
    assert_eq!(dispatcher.session().refresh_token(), None);
}

#[tokio::test]
async fn test_rejected_refresh_expires_session_without_retry() {
    let server = MockServer::start().await;

    mount_boards(&server, "AT1", ResponseTemplate::new(401), 1).await;
    mount_refresh(
        &server,
        "RT1",
        ResponseTemplate::new(401).set_body_json(json!({"message": "refresh token expired"})),
        1,
    )
    .await;

    let dispatcher = signed_in(&server, "AT1", "RT1");
    let err = dispatcher.dispatch::<Value>(&boards()).await.unwrap_err();

    assert!(matches!(err, Error::AuthExpired));
    assert!(!dispatcher.session().is_authenticated());
}

#[tokio::test]
async fn test_missing_tokens_fail_without_any_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/boards"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dispatcher = dispatcher(&server, SessionState::in_memory());
    let err = dispatcher.dispatch::<Value>(&boards()).await.unwrap_err();

    assert!(err.is_auth_expired());
}

#[tokio::test]
async fn test_missing_access_token_refreshes_before_first_attempt() {
    let server = MockServer::start().await;

    mount_refresh(
        &server,
        "RT1",
        ResponseTemplate::new(200)
            .set_body_json(json!({"accessToken": "AT2", "refreshToken": "RT2"})),
        1,
    )
    .await;
    mount_boards(
        &server,
        "AT2",
        ResponseTemplate::new(200).set_body_json(page_body()),
        1,
    )
    .await;

    // A store holding only the refresh token restores without an access token.
    let store = std::sync::Arc::new(bigs_core::MemoryStore::new());
    bigs_core::SessionStore::set(store.as_ref(), "refreshToken", "RT1").unwrap();
    let session = SessionState::load(store);
    assert_eq!(session.access_token(), None);

    let dispatcher = dispatcher(&server, session);
    let page: Page<Post> = dispatcher.dispatch(&boards()).await.unwrap();

    assert_eq!(page.content.len(), 1);
    assert_eq!(dispatcher.session().access_token(), Some(AccessToken::new("AT2")));
}

// ============================================================================
// Non-Auth Failures
// ============================================================================

#[tokio::test]
async fn test_server_error_is_passed_through() {
    let server = MockServer::start().await;

    mount_boards(
        &server,
        "AT1",
        ResponseTemplate::new(500).set_body_json(json!({
            "error": "Internal Server Error",
            "message": "boom"
        })),
        1,
    )
    .await;
    mount_refresh(&server, "RT1", ResponseTemplate::new(200), 0).await;

    let dispatcher = signed_in(&server, "AT1", "RT1");
    let err = dispatcher.dispatch::<Value>(&boards()).await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert!(err.to_string().contains("boom"));
    assert_eq!(dispatcher.session().access_token(), Some(AccessToken::new("AT1")));
    assert_eq!(dispatcher.session().refresh_token(), Some(RefreshToken::new("RT1")));
}

#[tokio::test]
async fn test_not_found_is_passed_through() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/boards/99"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh(&server, "RT1", ResponseTemplate::new(200), 0).await;

    let dispatcher = signed_in(&server, "AT1", "RT1");
    let err = dispatcher
        .dispatch::<Value>(&RequestDescriptor::get("/api/boards/99"))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert!(dispatcher.session().is_authenticated());
}

#[tokio::test]
async fn test_undecodable_body_is_a_request_error() {
    let server = MockServer::start().await;

    mount_boards(
        &server,
        "AT1",
        ResponseTemplate::new(200).set_body_string("<html>"),
        1,
    )
    .await;

    let dispatcher = signed_in(&server, "AT1", "RT1");
    let err = dispatcher.dispatch::<Page<Post>>(&boards()).await.unwrap_err();

    assert!(matches!(err, Error::Request(RequestError::Decode { .. })));
    assert!(dispatcher.session().is_authenticated());
}

#[tokio::test]
async fn test_unreachable_server_is_a_transport_error() {
    // Bind and release a port so nothing is listening on it.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let session = SessionState::in_memory();
    session.login("Alice", "alice@example.com", TokenPair::new("AT1", "RT1"), None);
    let url = ApiUrl::new(format!("http://127.0.0.1:{port}")).unwrap();
    let dispatcher = Dispatcher::with_http_refresh(ApiClient::new(url).unwrap(), session);

    let err = dispatcher.dispatch::<Value>(&boards()).await.unwrap_err();

    assert!(matches!(err, Error::Request(RequestError::Transport(_))));
    assert!(!matches!(
        err,
        Error::Request(RequestError::Transport(TransportError::Timeout))
    ));
    assert!(dispatcher.session().is_authenticated());
}

// ============================================================================
// Headers
// ============================================================================

#[tokio::test]
async fn test_caller_headers_are_merged_with_bearer() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/boards"))
        .and(header("authorization", "Bearer AT1"))
        .and(header("x-trace", "abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body()))
        .expect(1)
        .mount(&server)
        .await;

    let dispatcher = signed_in(&server, "AT1", "RT1");
    let request = boards()
        .header(HeaderName::from_static("x-trace"), HeaderValue::from_static("abc"))
        .header(AUTHORIZATION, HeaderValue::from_static("Bearer stale"));
    let _: Page<Post> = dispatcher.dispatch(&request).await.unwrap();
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test]
async fn test_concurrent_rejections_share_one_refresh() {
    let server = MockServer::start().await;

    mount_boards(&server, "AT1", ResponseTemplate::new(401), 3).await;
    mount_boards(
        &server,
        "AT2",
        ResponseTemplate::new(200).set_body_json(page_body()),
        3,
    )
    .await;
    mount_refresh(
        &server,
        "RT1",
        ResponseTemplate::new(200)
            .set_body_json(json!({"accessToken": "AT2", "refreshToken": "RT2"}))
            .set_delay(Duration::from_millis(200)),
        1,
    )
    .await;

    let dispatcher = signed_in(&server, "AT1", "RT1");
    let request = boards();

    let (a, b, c) = tokio::join!(
        dispatcher.dispatch::<Page<Post>>(&request),
        dispatcher.dispatch::<Page<Post>>(&request),
        dispatcher.dispatch::<Page<Post>>(&request),
    );

    assert!(a.is_ok() && b.is_ok() && c.is_ok());
    assert_eq!(dispatcher.session().refresh_token(), Some(RefreshToken::new("RT2")));
}

#[tokio::test]
async fn test_concurrent_rejections_share_one_failed_refresh() {
    let server = MockServer::start().await;

    mount_boards(&server, "AT1", ResponseTemplate::new(401), 2).await;
    mount_refresh(
        &server,
        "RT1",
        ResponseTemplate::new(401).set_delay(Duration::from_millis(200)),
        1,
    )
    .await;

    let dispatcher = signed_in(&server, "AT1", "RT1");
    let request = boards();

    let (a, b) = tokio::join!(
        dispatcher.dispatch::<Value>(&request),
        dispatcher.dispatch::<Value>(&request),
    );

    assert!(a.unwrap_err().is_auth_expired());
    assert!(b.unwrap_err().is_auth_expired());
    assert!(!dispatcher.session().is_authenticated());
}
