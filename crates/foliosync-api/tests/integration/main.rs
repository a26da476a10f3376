//! Integration tests for the gallery API adapter.
//!
//! Uses wiremock to stand in for the remote service; each test mounts the
//! endpoints it needs and drives the adapter through the provider port.

mod common;
mod test_auth;
mod test_hierarchy;
