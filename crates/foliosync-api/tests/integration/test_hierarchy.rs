//! Hierarchy load and mapping tests

use foliosync_core::ports::gallery::IGalleryProvider;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common;

#[tokio::test]
async fn hierarchy_maps_to_nested_domain_snapshots() {
    let (server, provider) = common::setup_provider().await;
    provider.authenticate().await.expect("authenticate");

    Mock::given(method("GET"))
        .and(path("/hierarchy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::hierarchy_json()))
        .mount(&server)
        .await;

    let root = provider.load_group_hierarchy().await.expect("hierarchy");

    assert_eq!(root.title, "Root");
    assert_eq!(root.id.as_str(), "root");

    let trip = root.child_group("Trip").expect("Trip child group");
    assert_eq!(trip.id.as_str(), "group-1");
    assert_eq!(trip.custom_reference.as_deref(), Some("trip"));
    assert!(root.child_group("trip").is_none(), "lookup is exact-match");

    let photoset = root.photoset("Root").expect("root photoset");
    assert_eq!(photoset.custom_reference.as_deref(), Some("photos"));
    // Hierarchy responses carry no photo listings.
    assert!(photoset.photos.is_empty());
}

#[tokio::test]
async fn hierarchy_server_error_is_reported() {
    let (server, provider) = common::setup_provider().await;
    provider.authenticate().await.expect("authenticate");

    Mock::given(method("GET"))
        .and(path("/hierarchy"))
        .respond_with(ResponseTemplate::new(503).set_body_string("down"))
        .mount(&server)
        .await;

    let err = provider
        .load_group_hierarchy()
        .await
        .expect_err("must fail");
    assert!(format!("{err:#}").contains("503"));
}
