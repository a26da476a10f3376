//! Remote object snapshots
//!
//! These are point-in-time views of the remote hierarchy as returned by the
//! gallery provider. They are plain data: the engine never mutates a
//! snapshot, it asks the provider to create objects and receives fresh
//! snapshots back. Child lookups are keyed by title (groups, photosets) or
//! by file name (photos); photo file names match case-sensitively.
//!
//! `BTreeMap` is used for the child maps so iteration order is stable,
//! keeping log output reproducible across runs.

use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Provider-assigned identifier of a remote object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteId(String);

impl RemoteId {
    /// Wraps a provider-assigned id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw id string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RemoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A remote container node, analogous to a folder.
///
/// Once created, a group's Title → custom-reference identity must remain
/// stable forever: renaming a group (or changing the slug rule) after the
/// first sync orphans it and later runs will re-create it from scratch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteGroup {
    /// Provider-assigned id
    pub id: RemoteId,
    /// Display title (the local folder name, trimmed)
    pub title: String,
    /// URL slug this group was created under, if known
    pub custom_reference: Option<String>,
    /// Child groups by title
    pub groups: BTreeMap<String, RemoteGroup>,
    /// Child photosets by title
    pub photosets: BTreeMap<String, RemotePhotoset>,
}

impl RemoteGroup {
    /// Creates an empty group snapshot.
    pub fn new(id: RemoteId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            custom_reference: None,
            groups: BTreeMap::new(),
            photosets: BTreeMap::new(),
        }
    }

    /// Looks up a child group by title (exact match).
    #[must_use]
    pub fn child_group(&self, title: &str) -> Option<&RemoteGroup> {
        self.groups.get(title)
    }

    /// Looks up a child photoset by title (exact match).
    #[must_use]
    pub fn photoset(&self, title: &str) -> Option<&RemotePhotoset> {
        self.photosets.get(title)
    }
}

/// A remote gallery holding photos, owned by exactly one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemotePhotoset {
    /// Provider-assigned id
    pub id: RemoteId,
    /// Display title
    pub title: String,
    /// Caption shown alongside the gallery
    pub caption: Option<String>,
    /// URL slug this photoset was created under, if known
    pub custom_reference: Option<String>,
    /// Contained photos by file name (case-sensitive)
    pub photos: BTreeMap<String, RemotePhoto>,
}

impl RemotePhotoset {
    /// Creates an empty photoset snapshot.
    pub fn new(id: RemoteId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            caption: None,
            custom_reference: None,
            photos: BTreeMap::new(),
        }
    }

    /// Looks up a photo by file name (case-sensitive).
    #[must_use]
    pub fn photo(&self, file_name: &str) -> Option<&RemotePhoto> {
        self.photos.get(file_name)
    }
}

/// One uploaded image within a photoset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemotePhoto {
    /// Provider-assigned id
    pub id: RemoteId,
    /// Base name of the uploaded file (the match key within its photoset)
    pub file_name: String,
    /// When the service recorded the upload
    pub uploaded_on: DateTime<Utc>,
}
