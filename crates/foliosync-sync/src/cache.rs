//! Remote object cache adapter
//!
//! A thin get-or-create facade between the folder tasks and the gallery
//! provider. Lookup order is: the parent snapshot loaded at run start, then
//! the run-scoped map of objects this run already created, then a remote
//! create call (followed by access-policy application and a `created` event).
//!
//! The remote service has no locking primitive, so two tasks racing to
//! create the same not-yet-existing child could each create one. A
//! per-(parent, title) async mutex closes that window: the second task finds
//! the first task's entry in the created map. The lock map is built per run
//! and torn down with it.

use std::sync::Arc;

use anyhow::Context;
use dashmap::DashMap;
use foliosync_core::domain::path::RelativePath;
use foliosync_core::domain::remote::{RemoteGroup, RemotePhotoset};
use foliosync_core::ports::gallery::{GroupUpdate, PhotosetUpdate};
use tokio::sync::Mutex;
use tracing::debug;

use crate::engine::SyncContext;
use crate::events::ObjectKind;

/// Key of a child object: (parent remote id, child title).
type ChildKey = (String, String);

/// Run-scoped cache of remote objects, with keyed creation locks.
#[derive(Debug, Default)]
pub struct RemoteCache {
    /// One async mutex per (parent, title) pair under creation
    locks: DashMap<ChildKey, Arc<Mutex<()>>>,
    /// Groups created during this run
    created_groups: DashMap<ChildKey, RemoteGroup>,
    /// Photosets created during this run
    created_photosets: DashMap<ChildKey, RemotePhotoset>,
}

impl RemoteCache {
    /// Creates an empty cache for one run.
    pub fn new() -> Self {
        Self::default()
    }

    fn creation_lock(&self, key: &ChildKey) -> Arc<Mutex<()>> {
        self.locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Looks up a child group by title under `parent`, creating it remotely
    /// if absent. Never returns a "not found": the result is either an
    /// existing or a freshly created group.
    ///
    /// `child_path` is the relative path the child will live at; its slug
    /// path becomes the new group's custom reference.
    ///
    /// A failure here is terminal for the subtree rooted at the child - the
    /// caller skips that one subfolder and continues with its siblings.
    pub async fn get_or_create_group(
        &self,
        ctx: &SyncContext,
        parent: &RemoteGroup,
        title: &str,
        child_path: &RelativePath,
    ) -> anyhow::Result<RemoteGroup> {
        let key = (parent.id.as_str().to_string(), title.to_string());
        let lock = self.creation_lock(&key);
        let _guard = lock.lock().await;

        if let Some(existing) = parent.child_group(title) {
            debug!(title, "Group already exists remotely");
            return Ok(existing.clone());
        }
        if let Some(created) = self.created_groups.get(&key) {
            debug!(title, "Group already created during this run");
            return Ok(created.clone());
        }

        let update = GroupUpdate {
            title: title.to_string(),
            caption: title.to_string(),
            custom_reference: child_path.as_str().to_string(),
        };
        let group = ctx
            .provider
            .create_group(parent, &update)
            .await
            .with_context(|| format!("failed to create group '{title}'"))?;

        if !ctx.new_group_access.is_empty() {
            ctx.provider
                .update_group_access(&group, &ctx.new_group_access)
                .await
                .with_context(|| format!("failed to set access on new group '{title}'"))?;
        }

        ctx.events.created(child_path, ObjectKind::Group, title);
        self.created_groups.insert(key, group.clone());
        Ok(group)
    }

    /// Looks up a photoset by title under `group`, creating it remotely if
    /// absent, then materializes its photo listing before returning - the
    /// caller immediately queries membership.
    ///
    /// `folder_path` is the owning folder's relative path; the new
    /// photoset's custom reference is `<prefix>photos`.
    ///
    /// A failure here (create or load) aborts only this folder's photo
    /// work; subfolder recursion proceeds independently.
    pub async fn get_or_create_photoset(
        &self,
        ctx: &SyncContext,
        group: &RemoteGroup,
        title: &str,
        folder_path: &RelativePath,
    ) -> anyhow::Result<RemotePhotoset> {
        let key = (group.id.as_str().to_string(), title.to_string());
        let lock = self.creation_lock(&key);
        let _guard = lock.lock().await;

        let photoset = if let Some(existing) = group.photoset(title) {
            debug!(title, "Photoset already exists remotely");
            existing.clone()
        } else if let Some(created) = self.created_photosets.get(&key) {
            debug!(title, "Photoset already created during this run");
            created.clone()
        } else {
            let update = PhotosetUpdate {
                title: title.to_string(),
                caption: title.to_string(),
                custom_reference: folder_path.photoset_reference(),
            };
            let photoset = ctx
                .provider
                .create_photoset(group, &update)
                .await
                .with_context(|| format!("failed to create photoset '{title}'"))?;

            if !ctx.new_photoset_access.is_empty() {
                ctx.provider
                    .update_photoset_access(&photoset, &ctx.new_photoset_access)
                    .await
                    .with_context(|| format!("failed to set access on new photoset '{title}'"))?;
            }

            ctx.events.created(folder_path, ObjectKind::Photoset, title);
            self.created_photosets.insert(key, photoset.clone());
            photoset
        };

        // Always re-load: the snapshot from the hierarchy (or from creation)
        // does not carry the photo listing the diff needs.
        ctx.provider
            .load_photoset(&photoset)
            .await
            .with_context(|| format!("failed to load photoset '{title}'"))
    }
}
