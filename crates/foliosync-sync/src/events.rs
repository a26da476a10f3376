//! Sync event stream
//!
//! Every remote object created (or error encountered) during a run produces
//! one [`SyncEvent`]. Tasks send events into a shared channel and a single
//! consumer drains it, logging each event via `tracing` and accumulating the
//! run's [`SyncReport`]. Concurrent tasks therefore never contend on a log
//! sink; the channel is the only synchronization point.

use std::fmt::{self, Display, Formatter};

use foliosync_core::domain::path::RelativePath;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// The kind of remote object an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ObjectKind {
    Group,
    Photoset,
    Photo,
}

impl Display for ObjectKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ObjectKind::Group => write!(f, "group"),
            ObjectKind::Photoset => write!(f, "photoset"),
            ObjectKind::Photo => write!(f, "photo"),
        }
    }
}

/// What happened to the object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EventOp {
    /// A remote object was created (or a photo uploaded)
    Created,
    /// An existing photo's content was replaced by a newer local file
    Replaced,
    /// The operation for this object failed; the run continues
    Error,
}

impl Display for EventOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            EventOp::Created => write!(f, "created"),
            EventOp::Replaced => write!(f, "replaced"),
            EventOp::Error => write!(f, "error"),
        }
    }
}

/// One observable outcome of the run.
#[derive(Debug, Clone, Serialize)]
pub struct SyncEvent {
    /// Slug path of the object relative to the sync root
    pub relative_path: String,
    /// Object kind
    pub kind: ObjectKind,
    /// Object title (group/photoset title, photo file name)
    pub title: String,
    /// Operation tag
    pub op: EventOp,
    /// Error detail, present when `op` is [`EventOp::Error`]
    pub detail: Option<String>,
}

/// Sending half of the event stream, cloned into every task context.
///
/// Sends never fail loudly: if the consumer is gone the event is dropped
/// with a tracing warning, mirroring the rule that reporting must not break
/// sync work.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<SyncEvent>,
}

impl EventSender {
    fn send(&self, event: SyncEvent) {
        if self.tx.send(event).is_err() {
            warn!("Event consumer dropped; discarding sync event");
        }
    }

    /// Reports a created remote object.
    pub fn created(&self, path: &RelativePath, kind: ObjectKind, title: &str) {
        self.send(SyncEvent {
            relative_path: path.as_str().to_string(),
            kind,
            title: title.to_string(),
            op: EventOp::Created,
            detail: None,
        });
    }

    /// Reports a replaced photo.
    pub fn replaced(&self, path: &RelativePath, kind: ObjectKind, title: &str) {
        self.send(SyncEvent {
            relative_path: path.as_str().to_string(),
            kind,
            title: title.to_string(),
            op: EventOp::Replaced,
            detail: None,
        });
    }

    /// Reports a scoped failure.
    pub fn error(&self, path: &RelativePath, kind: ObjectKind, title: &str, detail: &str) {
        self.send(SyncEvent {
            relative_path: path.as_str().to_string(),
            kind,
            title: title.to_string(),
            op: EventOp::Error,
            detail: Some(detail.to_string()),
        });
    }
}

/// Receiving half of the event stream; consumed by [`EventReceiver::collect`].
#[derive(Debug)]
pub struct EventReceiver {
    rx: mpsc::UnboundedReceiver<SyncEvent>,
}

/// Creates a connected sender/receiver pair for one run.
pub fn channel() -> (EventSender, EventReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventSender { tx }, EventReceiver { rx })
}

/// Summary of a completed synchronization run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    /// Remote groups created
    pub groups_created: u32,
    /// Remote photosets created
    pub photosets_created: u32,
    /// New photos uploaded
    pub photos_uploaded: u32,
    /// Existing photos replaced by newer local content
    pub photos_replaced: u32,
    /// Scoped errors, one message per failed object
    pub errors: Vec<String>,
    /// Wall-clock duration of the run in milliseconds
    pub duration_ms: u64,
}

impl SyncReport {
    /// True when the run finished without a single scoped error.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

impl EventReceiver {
    /// Drains the stream until every sender is dropped, logging each event
    /// and accumulating the run report.
    pub async fn collect(mut self) -> SyncReport {
        let mut report = SyncReport::default();

        while let Some(event) = self.rx.recv().await {
            match event.op {
                EventOp::Created => {
                    info!(
                        path = %event.relative_path,
                        kind = %event.kind,
                        title = %event.title,
                        "Created remote object"
                    );
                    match event.kind {
                        ObjectKind::Group => report.groups_created += 1,
                        ObjectKind::Photoset => report.photosets_created += 1,
                        ObjectKind::Photo => report.photos_uploaded += 1,
                    }
                }
                EventOp::Replaced => {
                    info!(
                        path = %event.relative_path,
                        kind = %event.kind,
                        title = %event.title,
                        "Replaced remote photo"
                    );
                    report.photos_replaced += 1;
                }
                EventOp::Error => {
                    let detail = event.detail.as_deref().unwrap_or("unknown error");
                    warn!(
                        path = %event.relative_path,
                        kind = %event.kind,
                        title = %event.title,
                        detail,
                        "Sync error"
                    );
                    report.errors.push(format!(
                        "{} '{}' at '{}': {}",
                        event.kind, event.title, event.relative_path, detail
                    ));
                }
            }
        }

        report
    }
}
