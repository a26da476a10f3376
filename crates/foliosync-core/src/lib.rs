//! foliosync core - domain model, configuration, and ports
//!
//! This crate holds everything the sync engine and its adapters agree on:
//!
//! - [`domain`] - remote object snapshots, relative paths and slugs,
//!   access policies, domain errors
//! - [`config`] - typed configuration with YAML loading, validation,
//!   and a builder
//! - [`ports`] - the gallery provider port the engine drives and the
//!   HTTP adapter implements

pub mod config;
pub mod domain;
pub mod ports;
