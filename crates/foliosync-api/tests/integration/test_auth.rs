//! Authentication tests

use foliosync_core::ports::gallery::IGalleryProvider;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{self, TEST_TOKEN};

#[tokio::test]
async fn authenticate_sends_credentials_and_stores_token() {
    let (server, provider) = common::setup_provider().await;

    provider.authenticate().await.expect("authenticate");

    // The token must be attached to subsequent requests.
    Mock::given(method("GET"))
        .and(path("/hierarchy"))
        .and(header("authorization", format!("Bearer {TEST_TOKEN}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::hierarchy_json()))
        .expect(1)
        .mount(&server)
        .await;

    provider
        .load_group_hierarchy()
        .await
        .expect("hierarchy with bearer token");
}

#[tokio::test]
async fn authenticate_posts_the_configured_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .and(body_json(json!({ "username": "alice", "password": "pw" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "t" })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = foliosync_api::GalleryApiProvider::new(server.uri(), "alice", "pw");
    provider.authenticate().await.expect("authenticate");
}

#[tokio::test]
async fn rejected_credentials_surface_the_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad credentials"))
        .mount(&server)
        .await;

    let provider = foliosync_api::GalleryApiProvider::new(server.uri(), "alice", "wrong");
    let err = provider.authenticate().await.expect_err("must fail");
    let message = format!("{err:#}");
    assert!(message.contains("401"), "unexpected error: {message}");
}
