//! Access policies for newly created remote objects
//!
//! The remote service lets each object carry a set of named access
//! attributes (visibility, search masks, passwords, ...). foliosync does not
//! interpret them; it forwards whatever the configuration specifies to the
//! access-update endpoint right after creating an object.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A named set of access attributes applied to a newly created remote object.
///
/// An empty policy means "leave the service defaults alone" - the engine
/// skips the access-update call entirely in that case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessPolicy(BTreeMap<String, String>);

impl AccessPolicy {
    /// Creates an empty policy (service defaults).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True if no attributes are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sets one attribute, returning the policy for chaining.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// The attribute map, in name order.
    #[must_use]
    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.0
    }
}

impl FromIterator<(String, String)> for AccessPolicy {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
