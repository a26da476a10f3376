//! foliosync sync - recursive tree synchronization engine
//!
//! Reconciles a local directory tree against a remote group/photoset/photo
//! hierarchy: folders become groups, image files become photos inside a
//! per-folder photoset. The remote service offers create/read/update calls
//! only, so the engine is built around idempotent get-or-create steps and
//! scoped failure handling - one branch failing never stops its siblings.
//!
//! ## Modules
//!
//! - [`engine`] - [`engine::SyncEngine`] entry point orchestrating a run
//! - [`tasks`] - folder reconciliation and photo upload tasks
//! - [`scheduler`] - bounded worker pool / unbounded fan-out dispatch
//! - [`cache`] - get-or-create facade over the remote hierarchy
//! - [`filter`] - name and file-type filtering
//! - [`events`] - the run's observable event stream and report

pub mod cache;
pub mod engine;
pub mod events;
pub mod filter;
pub mod scheduler;
pub mod tasks;

use thiserror::Error;

/// Fatal errors that abort a sync run before any task is dispatched.
///
/// Everything that happens after dispatch is scoped to a task boundary and
/// reported through the event stream instead (see [`events`]).
#[derive(Debug, Error)]
pub enum SyncError {
    /// The remote service rejected the configured credentials
    #[error("Authentication failed: {0:#}")]
    Authentication(anyhow::Error),

    /// The initial hierarchy load failed
    #[error("Failed to load remote group hierarchy: {0:#}")]
    HierarchyLoad(anyhow::Error),

    /// The event collector task died (it never should)
    #[error("Event collector task failed: {0}")]
    EventCollector(#[from] tokio::task::JoinError),
}
