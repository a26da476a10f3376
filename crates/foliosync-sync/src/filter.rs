//! Name and file-type filtering
//!
//! Two independent predicates decide what participates in a sync:
//!
//! - the name filter drops entries whose name starts with a configured
//!   exclusion prefix (case-insensitive) - applied to files AND folders,
//!   so an excluded directory is never descended into
//! - the file filter keeps only supported extensions (case-insensitive,
//!   matched without the leading dot) - applied to files only
//!
//! Callers run the two passes separately: name filter first, then file
//! filter on the survivors. [`NameFilter::filter_files`] deliberately does
//! NOT re-apply the name filter.

use std::path::Path;

use foliosync_core::config::FilterConfig;

/// Pure predicate/filter functions over filter configuration captured at
/// construction.
#[derive(Debug, Clone)]
pub struct NameFilter {
    /// Exclusion prefixes, lowercased once
    exclude_prefixes: Vec<String>,
    /// Allowed extensions, lowercased once, no leading dot
    supported_extensions: Vec<String>,
}

impl NameFilter {
    /// Captures the filter configuration, normalising case up front.
    pub fn new(config: &FilterConfig) -> Self {
        Self {
            exclude_prefixes: config
                .exclude_prefixes
                .iter()
                .map(|p| p.to_lowercase())
                .collect(),
            supported_extensions: config
                .supported_extensions
                .iter()
                .map(|e| e.to_lowercase())
                .collect(),
        }
    }

    /// Returns true if a file or folder name should be synced.
    pub fn is_allowed_name(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        !self
            .exclude_prefixes
            .iter()
            .any(|prefix| lower.starts_with(prefix.as_str()))
    }

    /// Returns true if a file name has a supported extension.
    ///
    /// Depends only on the extension; a name excluded by
    /// [`NameFilter::is_allowed_name`] can still return true here.
    pub fn is_supported_file(&self, name: &str) -> bool {
        match Path::new(name).extension().and_then(|e| e.to_str()) {
            Some(ext) => {
                let ext = ext.to_lowercase();
                self.supported_extensions.iter().any(|s| *s == ext)
            }
            None => false,
        }
    }

    /// Keeps only the names allowed by the exclusion-prefix rule.
    pub fn filter_entries(&self, names: Vec<String>) -> Vec<String> {
        names
            .into_iter()
            .filter(|n| self.is_allowed_name(n))
            .collect()
    }

    /// Keeps only supported file names.
    ///
    /// Note that this does NOT first run [`NameFilter::filter_entries`];
    /// callers apply the two passes in order.
    pub fn filter_files(&self, names: Vec<String>) -> Vec<String> {
        names
            .into_iter()
            .filter(|n| self.is_supported_file(n))
            .collect()
    }
}
