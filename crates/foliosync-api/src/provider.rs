//! Gallery provider port implementation
//!
//! [`GalleryApiProvider`] adapts the HTTP [`client`](crate::client) to the
//! [`IGalleryProvider`] port: wire DTOs come in, domain snapshots go out.
//! The mapping is the only logic here - retries, timeouts, and rate limits
//! are transport concerns the underlying `reqwest` client owns.

use std::path::Path;

use anyhow::Context;
use foliosync_core::domain::access::AccessPolicy;
use foliosync_core::domain::remote::{RemoteGroup, RemoteId, RemotePhoto, RemotePhotoset};
use foliosync_core::ports::gallery::{GroupUpdate, IGalleryProvider, PhotosetUpdate};

use crate::client::{ApiClient, ApiGroup, ApiPhoto, ApiPhotoset, CreateObjectRequest};

// ============================================================================
// Wire -> domain mapping
// ============================================================================

fn photo_from_wire(photo: ApiPhoto) -> RemotePhoto {
    RemotePhoto {
        id: RemoteId::new(photo.id),
        file_name: photo.file_name,
        uploaded_on: photo.uploaded_on,
    }
}

fn photoset_from_wire(photoset: ApiPhotoset) -> RemotePhotoset {
    let mut snapshot = RemotePhotoset::new(RemoteId::new(photoset.id), photoset.title);
    snapshot.caption = photoset.caption;
    snapshot.custom_reference = photoset.custom_reference;
    for photo in photoset.photos {
        let photo = photo_from_wire(photo);
        snapshot.photos.insert(photo.file_name.clone(), photo);
    }
    snapshot
}

fn group_from_wire(group: ApiGroup) -> RemoteGroup {
    let mut snapshot = RemoteGroup::new(RemoteId::new(group.id), group.title);
    snapshot.custom_reference = group.custom_reference;
    for child in group.groups {
        let child = group_from_wire(child);
        snapshot.groups.insert(child.title.clone(), child);
    }
    for photoset in group.photosets {
        let photoset = photoset_from_wire(photoset);
        snapshot.photosets.insert(photoset.title.clone(), photoset);
    }
    snapshot
}

/// Display reference for an upload: the path with the sync root stripped,
/// normalised to forward slashes. Falls back to the bare file name when the
/// path is not under the root.
fn display_reference(local_path: &Path, strip_root: &Path) -> String {
    local_path
        .strip_prefix(strip_root)
        .unwrap_or(local_path)
        .to_string_lossy()
        .replace('\\', "/")
}

// ============================================================================
// GalleryApiProvider
// ============================================================================

/// [`IGalleryProvider`] implementation over the gallery service's JSON API.
pub struct GalleryApiProvider {
    client: ApiClient,
}

impl GalleryApiProvider {
    /// Creates a provider for the given service base URL and credentials.
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            client: ApiClient::new(base_url, username, password),
        }
    }
}

#[async_trait::async_trait]
impl IGalleryProvider for GalleryApiProvider {
    async fn authenticate(&self) -> anyhow::Result<()> {
        self.client.authenticate().await
    }

    async fn load_group_hierarchy(&self) -> anyhow::Result<RemoteGroup> {
        let root = self.client.fetch_hierarchy().await?;
        Ok(group_from_wire(root))
    }

    async fn create_group(
        &self,
        parent: &RemoteGroup,
        update: &GroupUpdate,
    ) -> anyhow::Result<RemoteGroup> {
        let created = self
            .client
            .create_group(
                parent.id.as_str(),
                &CreateObjectRequest {
                    title: &update.title,
                    caption: &update.caption,
                    custom_reference: &update.custom_reference,
                },
            )
            .await?;
        Ok(group_from_wire(created))
    }

    async fn create_photoset(
        &self,
        parent: &RemoteGroup,
        update: &PhotosetUpdate,
    ) -> anyhow::Result<RemotePhotoset> {
        let created = self
            .client
            .create_photoset(
                parent.id.as_str(),
                &CreateObjectRequest {
                    title: &update.title,
                    caption: &update.caption,
                    custom_reference: &update.custom_reference,
                },
            )
            .await?;
        Ok(photoset_from_wire(created))
    }

    async fn load_photoset(&self, photoset: &RemotePhotoset) -> anyhow::Result<RemotePhotoset> {
        let loaded = self.client.fetch_photoset(photoset.id.as_str()).await?;
        Ok(photoset_from_wire(loaded))
    }

    async fn update_group_access(
        &self,
        group: &RemoteGroup,
        policy: &AccessPolicy,
    ) -> anyhow::Result<()> {
        self.client
            .update_access("groups", group.id.as_str(), policy.attributes())
            .await
    }

    async fn update_photoset_access(
        &self,
        photoset: &RemotePhotoset,
        policy: &AccessPolicy,
    ) -> anyhow::Result<()> {
        self.client
            .update_access("photosets", photoset.id.as_str(), policy.attributes())
            .await
    }

    async fn update_photo_access(
        &self,
        photo: &RemotePhoto,
        policy: &AccessPolicy,
    ) -> anyhow::Result<()> {
        self.client
            .update_access("photos", photo.id.as_str(), policy.attributes())
            .await
    }

    async fn upload(
        &self,
        photoset: &RemotePhotoset,
        local_path: &Path,
        strip_root: &Path,
    ) -> anyhow::Result<RemotePhoto> {
        let data = tokio::fs::read(local_path)
            .await
            .with_context(|| format!("failed to read {}", local_path.display()))?;
        let file_name = local_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .with_context(|| format!("{} has no file name", local_path.display()))?;
        let reference = display_reference(local_path, strip_root);

        let photo = self
            .client
            .upload_photo(photoset.id.as_str(), &file_name, &reference, data)
            .await?;
        Ok(photo_from_wire(photo))
    }

    async fn replace_photo(
        &self,
        original: &RemotePhoto,
        replacement: &RemotePhoto,
    ) -> anyhow::Result<()> {
        self.client
            .replace_photo(original.id.as_str(), replacement.id.as_str())
            .await
    }

    async fn delete_photo(&self, photo: &RemotePhoto) -> anyhow::Result<()> {
        self.client.delete_photo(photo.id.as_str()).await
    }
}
