//! Shared test helpers for gallery API integration tests
//!
//! Provides wiremock-based mock server setup. Each helper mounts the
//! necessary endpoints and returns a provider pointing at the mock server.

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use foliosync_api::GalleryApiProvider;

/// Bearer token every mocked auth endpoint hands out.
pub const TEST_TOKEN: &str = "test-token-001";

/// Starts a mock server with a working `/auth/token` endpoint and returns
/// a `(MockServer, GalleryApiProvider)` pair.
pub async fn setup_provider() -> (MockServer, GalleryApiProvider) {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": TEST_TOKEN })))
        .mount(&server)
        .await;

    let provider = GalleryApiProvider::new(server.uri(), "tester", "secret");
    (server, provider)
}

/// A small hierarchy: root group with one child group "Trip" and a root
/// photoset titled "Root" (no photo listings, as `/hierarchy` returns).
pub fn hierarchy_json() -> serde_json::Value {
    json!({
        "id": "root",
        "title": "Root",
        "custom_reference": null,
        "groups": [
            {
                "id": "group-1",
                "title": "Trip",
                "custom_reference": "trip",
                "groups": [],
                "photosets": []
            }
        ],
        "photosets": [
            {
                "id": "ps-1",
                "title": "Root",
                "caption": "Root",
                "custom_reference": "photos"
            }
        ]
    })
}
