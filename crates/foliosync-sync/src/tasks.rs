//! Folder reconciliation and photo upload tasks
//!
//! A [`FolderSyncTask`] reconciles exactly one local folder with one remote
//! group: it ensures the group's photoset exists, diffs the folder's files
//! against the photoset's photos, dispatches an [`UploadTask`] per file that
//! needs uploading or replacing, and dispatches a child folder task per
//! subfolder after ensuring the corresponding remote sub-group exists.
//!
//! Tasks never wait on the children they dispatch; overall run completion
//! belongs to the [`scheduler`](crate::scheduler). Every failure is
//! converted to an error event at this boundary and scoped as narrowly as
//! the failed object allows: a photoset failure skips one folder's photo
//! work, a sub-group failure skips one subtree, an upload failure skips one
//! file. Siblings always proceed.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, Utc};
use foliosync_core::domain::errors::DomainError;
use foliosync_core::domain::path::{slugify, RelativePath};
use foliosync_core::domain::remote::{RemoteGroup, RemotePhoto, RemotePhotoset};
use tracing::debug;

use crate::engine::SyncContext;
use crate::events::ObjectKind;
use crate::filter::NameFilter;
use crate::scheduler::Scheduler;

/// A unit of work consumed by the scheduler.
#[derive(Debug)]
pub(crate) enum Task {
    Folder(FolderSyncTask),
    Upload(UploadTask),
}

impl Task {
    pub(crate) async fn run(self, ctx: &Arc<SyncContext>, scheduler: &Scheduler) {
        match self {
            Task::Folder(task) => task.run(ctx, scheduler).await,
            Task::Upload(task) => task.run(ctx).await,
        }
    }
}

/// Title of the photoset that holds a folder's photos.
///
/// Do NOT change this rule after the first sync: photos are matched by
/// photoset title, so a different rule will miss every existing photoset
/// and re-upload the whole tree.
pub(crate) fn photoset_title(group: &RemoteGroup) -> &str {
    &group.title
}

// ============================================================================
// Local folder listing
// ============================================================================

/// Filtered, sorted view of one local folder.
#[derive(Debug, Default)]
struct FolderListing {
    /// Subfolder names, lexicographic
    dirs: Vec<String>,
    /// Supported file names, lexicographic
    files: Vec<String>,
}

/// Enumerates `folder`, applying the name filter to everything and the
/// file-type filter to files. Sorting is lexicographic so relative paths
/// and log output are reproducible across runs.
fn list_folder(folder: &Path, filter: &NameFilter) -> anyhow::Result<FolderListing> {
    let mut listing = FolderListing::default();

    let entries = std::fs::read_dir(folder)
        .with_context(|| format!("failed to read directory {}", folder.display()))?;

    for entry in entries {
        let entry = entry.with_context(|| format!("failed to read entry in {}", folder.display()))?;
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            debug!(path = ?entry.path(), "Skipping non-UTF-8 entry name");
            continue;
        };
        if !filter.is_allowed_name(&name) {
            continue;
        }

        let file_type = entry
            .file_type()
            .with_context(|| format!("failed to stat {}", entry.path().display()))?;
        if file_type.is_dir() {
            listing.dirs.push(name);
        } else if file_type.is_file() && filter.is_supported_file(&name) {
            listing.files.push(name);
        }
    }

    listing.dirs.sort();
    listing.files.sort();
    Ok(listing)
}

/// Local file modification time as UTC.
fn local_mtime(path: &Path) -> anyhow::Result<DateTime<Utc>> {
    let modified = std::fs::metadata(path)
        .and_then(|m| m.modified())
        .with_context(|| format!("failed to stat {}", path.display()))?;
    Ok(modified.into())
}

// ============================================================================
// FolderSyncTask
// ============================================================================

/// Reconciles one local folder with one remote group.
#[derive(Debug)]
pub(crate) struct FolderSyncTask {
    /// The remote group this folder maps to
    group: RemoteGroup,
    /// Absolute path of the local folder
    folder: PathBuf,
    /// Position of the folder relative to the sync root
    path: RelativePath,
}

impl FolderSyncTask {
    pub(crate) fn new(group: RemoteGroup, folder: PathBuf, path: RelativePath) -> Self {
        Self {
            group,
            folder,
            path,
        }
    }

    #[tracing::instrument(skip(self, ctx, scheduler), fields(path = %self.path, folder = %self.folder.display()))]
    async fn run(self, ctx: &Arc<SyncContext>, scheduler: &Scheduler) {
        let listing = match list_folder(&self.folder, &ctx.filter) {
            Ok(listing) => listing,
            Err(err) => {
                ctx.events.error(
                    &self.path,
                    ObjectKind::Group,
                    &self.group.title,
                    &format!("{err:#}"),
                );
                return;
            }
        };

        debug!(
            dirs = listing.dirs.len(),
            files = listing.files.len(),
            "Listed folder"
        );

        self.sync_photos(ctx, scheduler, &listing.files).await;
        self.sync_subfolders(ctx, scheduler, &listing.dirs).await;
    }

    /// Ensures this folder's photoset exists and dispatches an upload task
    /// per file that has no remote counterpart (or an outdated one).
    ///
    /// The existence check happens here, before dispatch: an upload task
    /// itself never re-checks, so dispatching two uploads for one file name
    /// would create duplicates. Failure to obtain the photoset abandons
    /// this folder's photo work only.
    async fn sync_photos(&self, ctx: &Arc<SyncContext>, scheduler: &Scheduler, files: &[String]) {
        let title = photoset_title(&self.group);
        let photoset = match ctx
            .cache
            .get_or_create_photoset(ctx, &self.group, title, &self.path)
            .await
        {
            Ok(photoset) => photoset,
            Err(err) => {
                ctx.events
                    .error(&self.path, ObjectKind::Photoset, title, &format!("{err:#}"));
                return;
            }
        };

        for name in files {
            let file = self.folder.join(name);
            match photoset.photo(name) {
                None => {
                    scheduler.submit(Task::Upload(UploadTask::new(
                        photoset.clone(),
                        file,
                        self.path.clone(),
                        None,
                    )));
                }
                Some(photo) if ctx.reupload_newer => {
                    // uploaded_on is whatever timezone the service reports;
                    // if that differs from the local clock's zone this
                    // comparison can be off by up to a day.
                    match local_mtime(&file) {
                        Ok(mtime) if mtime > photo.uploaded_on => {
                            scheduler.submit(Task::Upload(UploadTask::new(
                                photoset.clone(),
                                file,
                                self.path.clone(),
                                Some(photo.clone()),
                            )));
                        }
                        Ok(_) => {}
                        Err(err) => {
                            ctx.events.error(
                                &self.path,
                                ObjectKind::Photo,
                                name,
                                &format!("{err:#}"),
                            );
                        }
                    }
                }
                Some(_) => {}
            }
        }
    }

    /// Ensures a remote sub-group per subfolder and dispatches a child
    /// folder task for each. A failed subfolder (create error, empty slug,
    /// slug collision) is skipped with an error event; its siblings proceed.
    async fn sync_subfolders(&self, ctx: &Arc<SyncContext>, scheduler: &Scheduler, dirs: &[String]) {
        // slug -> title that claimed it; collisions would silently merge
        // two folders into one remote group, so they are errors instead.
        let mut claimed_slugs: HashMap<String, String> = HashMap::new();

        for name in dirs {
            let title = name.trim();
            let slug = slugify(name);

            if slug.is_empty() {
                ctx.events.error(
                    &self.path,
                    ObjectKind::Group,
                    title,
                    &DomainError::EmptySlug(title.to_string()).to_string(),
                );
                continue;
            }
            if let Some(first) = claimed_slugs.get(&slug) {
                ctx.events.error(
                    &self.path,
                    ObjectKind::Group,
                    title,
                    &DomainError::SlugCollision {
                        first: first.clone(),
                        second: title.to_string(),
                        slug: slug.clone(),
                    }
                    .to_string(),
                );
                continue;
            }
            claimed_slugs.insert(slug.clone(), title.to_string());

            let child_path = self.path.child(&slug);
            match ctx
                .cache
                .get_or_create_group(ctx, &self.group, title, &child_path)
                .await
            {
                Ok(child) => {
                    scheduler.submit(Task::Folder(FolderSyncTask::new(
                        child,
                        self.folder.join(name),
                        child_path,
                    )));
                }
                Err(err) => {
                    ctx.events
                        .error(&self.path, ObjectKind::Group, title, &format!("{err:#}"));
                }
            }
        }
    }
}

// ============================================================================
// UploadTask
// ============================================================================

/// Uploads one local file into one remote photoset.
///
/// With `existing` set, runs the replace sequence instead: upload the new
/// content, replace the existing photo with it, delete the now-orphaned
/// temporary upload. The three remote steps have no compensation - a
/// partial failure is reported as an error for this single file and the
/// remote may be left with the temporary photo.
#[derive(Debug)]
pub(crate) struct UploadTask {
    photoset: RemotePhotoset,
    file: PathBuf,
    path: RelativePath,
    existing: Option<RemotePhoto>,
}

impl UploadTask {
    pub(crate) fn new(
        photoset: RemotePhotoset,
        file: PathBuf,
        path: RelativePath,
        existing: Option<RemotePhoto>,
    ) -> Self {
        Self {
            photoset,
            file,
            path,
            existing,
        }
    }

    fn file_name(&self) -> String {
        self.file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    #[tracing::instrument(skip(self, ctx), fields(path = %self.path, file = %self.file.display()))]
    async fn run(self, ctx: &Arc<SyncContext>) {
        let name = self.file_name();
        if let Err(err) = self.execute(ctx).await {
            ctx.events
                .error(&self.path, ObjectKind::Photo, &name, &format!("{err:#}"));
        }
    }

    async fn execute(&self, ctx: &Arc<SyncContext>) -> anyhow::Result<()> {
        let uploaded = ctx
            .provider
            .upload(&self.photoset, &self.file, &ctx.local_root)
            .await
            .context("upload failed")?;

        match &self.existing {
            None => {
                if !ctx.new_photo_access.is_empty() {
                    ctx.provider
                        .update_photo_access(&uploaded, &ctx.new_photo_access)
                        .await
                        .context("failed to set access on new photo")?;
                }
                ctx.events
                    .created(&self.path, ObjectKind::Photo, &uploaded.file_name);
            }
            Some(original) => {
                ctx.provider
                    .replace_photo(original, &uploaded)
                    .await
                    .context("replace failed")?;
                ctx.provider
                    .delete_photo(&uploaded)
                    .await
                    .context("failed to delete temporary upload")?;
                ctx.events
                    .replaced(&self.path, ObjectKind::Photo, &original.file_name);
            }
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
