//! Metadata lookup services.
//!
//! # Module layout
//!
//! - [`provider`] -- the [`LookupService`] trait.
//! - [`registry`] -- [`ServiceRegistry`] and remote name resolution.
//! - [`omdb`] -- the OMDb implementation.

pub mod omdb;
pub mod provider;
pub mod registry;

use std::sync::Arc;

use crate::config::Config;

pub use omdb::OmdbService;
pub use provider::LookupService;
pub use registry::{Resolved, ServiceRegistry};

/// Names accepted for `default_service`.
pub const KNOWN_SERVICES: &[&str] = &["omdb"];

/// Build a registry with every built-in service configured from `config`.
pub fn build_registry(config: &Config) -> ServiceRegistry {
    let mut registry = ServiceRegistry::new(config);
    registry.register(Arc::new(OmdbService::new(&config.services.omdb)));
    registry
}
