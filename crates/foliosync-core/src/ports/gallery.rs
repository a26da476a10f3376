//! Gallery provider port (driven/secondary port)
//!
//! Defines the interface to the remote hierarchical photo-hosting service.
//! The service offers create/read/update semantics only - no transactions,
//! no locking primitives - so the engine layers its own get-or-create
//! discipline on top (see the sync crate's cache adapter).
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because errors at port boundaries are
//!   adapter-specific and don't need domain-level classification.
//! - The engine performs no retries: a call either succeeds or fails, and
//!   transport-level retry/timeout policy belongs to the implementation.
//! - `GroupUpdate` / `PhotosetUpdate` are port-level DTOs describing the
//!   metadata of an object to be created.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::access::AccessPolicy;
use crate::domain::remote::{RemoteGroup, RemotePhoto, RemotePhotoset};

/// Metadata for a group to be created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupUpdate {
    /// Display title
    pub title: String,
    /// Caption (callers set this to the title)
    pub caption: String,
    /// URL slug, derived from the folder's relative path
    pub custom_reference: String,
}

/// Metadata for a photoset to be created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotosetUpdate {
    /// Display title
    pub title: String,
    /// Caption (same as the title)
    pub caption: String,
    /// URL slug: the owning folder's relative path plus `photos`
    pub custom_reference: String,
}

/// Port trait for the remote photo-hosting service.
///
/// Every method is a suspension point; local filesystem work never goes
/// through this interface.
#[async_trait::async_trait]
pub trait IGalleryProvider: Send + Sync {
    /// Authenticates the configured account.
    ///
    /// Must be called once before any other operation; failure aborts the
    /// entire run before any task is dispatched.
    async fn authenticate(&self) -> anyhow::Result<()>;

    /// Loads the full remote group hierarchy, returning the root group.
    ///
    /// Child groups and photosets are populated recursively; photoset photo
    /// listings are NOT materialized (see [`Self::load_photoset`]).
    async fn load_group_hierarchy(&self) -> anyhow::Result<RemoteGroup>;

    /// Creates a child group under `parent`.
    async fn create_group(
        &self,
        parent: &RemoteGroup,
        update: &GroupUpdate,
    ) -> anyhow::Result<RemoteGroup>;

    /// Creates a photoset under `parent`.
    async fn create_photoset(
        &self,
        parent: &RemoteGroup,
        update: &PhotosetUpdate,
    ) -> anyhow::Result<RemotePhotoset>;

    /// Re-fetches a photoset with its photo listing materialized.
    async fn load_photoset(&self, photoset: &RemotePhotoset) -> anyhow::Result<RemotePhotoset>;

    /// Applies an access policy to a group.
    async fn update_group_access(
        &self,
        group: &RemoteGroup,
        policy: &AccessPolicy,
    ) -> anyhow::Result<()>;

    /// Applies an access policy to a photoset.
    async fn update_photoset_access(
        &self,
        photoset: &RemotePhotoset,
        policy: &AccessPolicy,
    ) -> anyhow::Result<()>;

    /// Applies an access policy to a photo.
    async fn update_photo_access(
        &self,
        photo: &RemotePhoto,
        policy: &AccessPolicy,
    ) -> anyhow::Result<()>;

    /// Uploads a local file into a photoset.
    ///
    /// The remote display reference is the file path with `strip_root`
    /// removed from the front.
    async fn upload(
        &self,
        photoset: &RemotePhotoset,
        local_path: &Path,
        strip_root: &Path,
    ) -> anyhow::Result<RemotePhoto>;

    /// Replaces `original`'s content with `replacement`'s, keeping
    /// `original`'s remote identity.
    async fn replace_photo(
        &self,
        original: &RemotePhoto,
        replacement: &RemotePhoto,
    ) -> anyhow::Result<()>;

    /// Deletes a photo (used to drop the temporary upload after a replace).
    async fn delete_photo(&self, photo: &RemotePhoto) -> anyhow::Result<()>;
}
