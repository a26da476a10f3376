//! foliosync API adapter
//!
//! Implements the [`IGalleryProvider`](foliosync_core::ports::gallery::IGalleryProvider)
//! port against the remote photo-hosting service's JSON API.
//!
//! ## Modules
//!
//! - [`client`] - typed HTTP client (endpoints, wire DTOs, token handling)
//! - [`provider`] - the port implementation mapping wire data to domain
//!   snapshots

pub(crate) mod client;
pub mod provider;

pub use provider::GalleryApiProvider;
