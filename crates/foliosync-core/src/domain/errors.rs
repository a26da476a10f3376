//! Domain error types

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid local path format or content
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// A title produced an empty slug
    #[error("Title '{0}' slugifies to an empty string")]
    EmptySlug(String),

    /// Two sibling titles produced the same slug
    #[error("Slug collision: '{first}' and '{second}' both slugify to '{slug}'")]
    SlugCollision {
        /// Title that claimed the slug first
        first: String,
        /// Title that collided with it
        second: String,
        /// The contested slug
        slug: String,
    },

    /// Generic validation failure
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}
