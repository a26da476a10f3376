//! Relative paths and slugs
//!
//! Remote objects are addressed by a URL-safe custom reference derived from
//! the folder's position under the sync root. [`RelativePath`] models that
//! position as an append-only path of slugs: extending it is the only way to
//! build a deeper path, so the reference produced for a fixed local tree is
//! deterministic and independent of task scheduling order.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Derives a URL-safe slug from a display title.
///
/// Runs of whitespace become a single `_`, characters outside
/// alphanumerics / `_` / `.` / `-` are dropped, leading and trailing
/// `_ . -` and spaces are trimmed, and the result is lowercased.
///
/// A slug, once used as a custom reference, is permanent: changing this
/// rule after a first sync orphans every previously created remote object.
pub fn slugify(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut in_whitespace = false;

    for c in title.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                out.push('_');
            }
            in_whitespace = true;
        } else {
            in_whitespace = false;
            if c.is_alphanumeric() || matches!(c, '_' | '.' | '-') {
                out.push(c);
            }
        }
    }

    out.trim_matches(|c: char| matches!(c, '_' | '.' | '-' | ' '))
        .to_lowercase()
}

/// Position of a folder relative to the sync root, as a `/`-joined slug path.
///
/// The root is the empty path. [`RelativePath::child`] is append-only:
/// `parent.child(slug)` yields `"<parent>/<slug>"` (or just `"<slug>"` at the
/// root). Custom references for remote objects derive from it:
///
/// - a subfolder's group reference is the child path itself
/// - a folder's photoset reference is [`RelativePath::photoset_reference`]
///   (`"<prefix>photos"`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelativePath(String);

impl RelativePath {
    /// The sync root (empty path).
    #[must_use]
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Builds a relative path from an already-joined slug string.
    ///
    /// Used by adapters and tests; the engine itself only extends paths
    /// via [`RelativePath::child`].
    pub fn from_slug_path(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Returns true for the sync root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Extends the path by one slug segment.
    #[must_use]
    pub fn child(&self, slug: &str) -> Self {
        if self.0.is_empty() {
            Self(slug.to_string())
        } else {
            Self(format!("{}/{slug}", self.0))
        }
    }

    /// The path with a trailing `/`, or the empty string at the root.
    ///
    /// This is the prefix every custom reference under this folder starts
    /// with.
    #[must_use]
    pub fn prefix(&self) -> String {
        if self.0.is_empty() {
            String::new()
        } else {
            format!("{}/", self.0)
        }
    }

    /// Custom reference for this folder's photoset: `"<prefix>photos"`.
    #[must_use]
    pub fn photoset_reference(&self) -> String {
        format!("{}photos", self.prefix())
    }

    /// The raw slug path.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RelativePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
