//! Sync engine entry point
//!
//! [`SyncEngine::sync`] runs one synchronization pass:
//!
//! 1. Authenticate (failure aborts the run - nothing has been dispatched)
//! 2. Load the remote group hierarchy
//! 3. Spawn the event collector and submit the root folder task
//! 4. Wait for the transitive task set to reach quiescence
//! 5. Return the accumulated [`SyncReport`]
//!
//! The engine only ever creates remote objects and uploads/replaces photos.
//! Deletion of remote-only or local-only content is deliberately not
//! implemented; the configuration toggles for it are accepted and ignored.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use foliosync_core::config::Config;
use foliosync_core::domain::access::AccessPolicy;
use foliosync_core::domain::path::RelativePath;
use foliosync_core::ports::gallery::IGalleryProvider;
use tracing::{debug, info};

use crate::cache::RemoteCache;
use crate::events::{self, EventSender, SyncReport};
use crate::filter::NameFilter;
use crate::scheduler::{self, ConcurrencyModel};
use crate::tasks::FolderSyncTask;
use crate::SyncError;

/// Process-wide immutable state for one sync run.
///
/// Constructed once from configuration at the start of [`SyncEngine::sync`]
/// and shared read-only by every task. The [`RemoteCache`] inside it is the
/// run's only shared mutable resource.
pub struct SyncContext {
    /// Remote service operations
    pub provider: Arc<dyn IGalleryProvider>,
    /// Root of the local photo tree
    pub local_root: PathBuf,
    /// Name / file-type filtering
    pub filter: NameFilter,
    /// Whether newer local files replace their remote counterparts
    pub reupload_newer: bool,
    /// Access policy for newly created groups
    pub new_group_access: AccessPolicy,
    /// Access policy for newly created photosets
    pub new_photoset_access: AccessPolicy,
    /// Access policy for newly uploaded photos
    pub new_photo_access: AccessPolicy,
    /// Get-or-create facade over the remote hierarchy
    pub cache: RemoteCache,
    /// Event stream all tasks report into
    pub events: EventSender,
}

/// Recursive tree synchronization engine.
///
/// ## Dependencies
///
/// - `provider`: remote gallery operations ([`IGalleryProvider`])
/// - configuration: local root, filters, reupload policy, access policies,
///   concurrency model
pub struct SyncEngine {
    provider: Arc<dyn IGalleryProvider>,
    local_root: PathBuf,
    filter: NameFilter,
    reupload_newer: bool,
    new_group_access: AccessPolicy,
    new_photoset_access: AccessPolicy,
    new_photo_access: AccessPolicy,
    model: ConcurrencyModel,
}

impl SyncEngine {
    /// Creates a new `SyncEngine` from a provider and configuration.
    pub fn new(provider: Arc<dyn IGalleryProvider>, config: &Config) -> Self {
        if config.sync.delete_missing_remote || config.sync.delete_missing_local {
            debug!(
                "delete_missing_remote / delete_missing_local are set but deletion \
                 is not implemented; the toggles are ignored"
            );
        }

        Self {
            provider,
            local_root: config.sync.local_root.clone(),
            filter: NameFilter::new(&config.filters),
            reupload_newer: config.sync.reupload_newer,
            new_group_access: config.access.new_group.clone(),
            new_photoset_access: config.access.new_photoset.clone(),
            new_photo_access: config.access.new_photo.clone(),
            model: ConcurrencyModel::from_config(&config.sync),
        }
    }

    /// Performs one synchronization run.
    ///
    /// The run always reaches quiescence: scoped failures (a folder, a
    /// subtree, a single file) are reported in the returned
    /// [`SyncReport::errors`] rather than propagated. Only authentication
    /// and the initial hierarchy load abort the run.
    #[tracing::instrument(skip(self))]
    pub async fn sync(&self) -> Result<SyncReport, SyncError> {
        let start = Instant::now();

        self.provider
            .authenticate()
            .await
            .map_err(SyncError::Authentication)?;
        info!("Authenticated with remote service");

        let root_group = self
            .provider
            .load_group_hierarchy()
            .await
            .map_err(SyncError::HierarchyLoad)?;
        info!(
            root = %root_group.title,
            local_root = %self.local_root.display(),
            "Loaded remote hierarchy, starting sync"
        );

        let (events, receiver) = events::channel();
        let collector = tokio::spawn(receiver.collect());

        let ctx = Arc::new(SyncContext {
            provider: self.provider.clone(),
            local_root: self.local_root.clone(),
            filter: self.filter.clone(),
            reupload_newer: self.reupload_newer,
            new_group_access: self.new_group_access.clone(),
            new_photoset_access: self.new_photoset_access.clone(),
            new_photo_access: self.new_photo_access.clone(),
            cache: RemoteCache::new(),
            events,
        });

        let root_task =
            FolderSyncTask::new(root_group, self.local_root.clone(), RelativePath::root());
        scheduler::run(ctx.clone(), &self.model, root_task).await;

        // Last event sender lives in the context; dropping it ends the
        // collector's stream.
        drop(ctx);
        let mut report = collector.await?;
        report.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            groups_created = report.groups_created,
            photosets_created = report.photosets_created,
            photos_uploaded = report.photos_uploaded,
            photos_replaced = report.photos_replaced,
            errors = report.errors.len(),
            duration_ms = report.duration_ms,
            "Sync run completed"
        );

        Ok(report)
    }
}
