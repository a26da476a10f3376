//! Domain model for foliosync
//!
//! Contains the remote object snapshots (groups, photosets, photos),
//! relative path / slug handling, access policies, and domain errors.

pub mod access;
pub mod errors;
pub mod path;
pub mod remote;
