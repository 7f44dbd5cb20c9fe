//! Registry of lookup services and remote name resolution.
//!
//! The [`ServiceRegistry`] holds every registered [`LookupService`] and knows
//! which one the configuration selected. [`ServiceRegistry::resolve`] turns a
//! locally parsed record into a remote one plus the rendered destination
//! name; any failure along the way yields `None` so the caller can fall back
//! to local rendering.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, warn};

use super::provider::LookupService;
use crate::config::{Config, Directories};
use crate::media::Media;
use crate::overrides::Overrides;
use crate::paths;

/// A successful remote lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// Name of the service that answered.
    pub service: &'static str,
    /// The record as returned by the service, with overrides applied.
    pub media: Media,
    /// Name rendered with the service's templates.
    pub name: String,
    /// Base directory for the rendered name.
    pub base: PathBuf,
}

/// A registry of [`LookupService`] implementations.
pub struct ServiceRegistry {
    services: Vec<Arc<dyn LookupService>>,
    default_service: String,
    overrides: Overrides,
    directories: Directories,
}

impl ServiceRegistry {
    /// Create an empty registry using the default service name, overrides
    /// and directories from `config`.
    pub fn new(config: &Config) -> Self {
        Self {
            services: Vec::new(),
            default_service: config.default_service.clone(),
            overrides: config.overrides.clone(),
            directories: config.directories.clone(),
        }
    }

    /// Register a service. Services are kept in registration order.
    pub fn register(&mut self, service: Arc<dyn LookupService>) {
        self.services.push(service);
    }

    /// Look up a service by name, ignoring case.
    pub fn get(&self, name: &str) -> Option<&dyn LookupService> {
        self.services
            .iter()
            .find(|s| s.name().eq_ignore_ascii_case(name))
            .map(|s| s.as_ref())
    }

    /// The service named by `default_service`, if registered.
    pub fn default_service(&self) -> Option<&dyn LookupService> {
        self.get(&self.default_service)
    }

    /// Query the default service for `media` and render the result.
    ///
    /// Returns `None` when no default service is registered, it is
    /// unavailable, the search fails or returns an invalid record, or the
    /// service's template cannot be rendered.
    pub async fn resolve(&self, media: &Media) -> Option<Resolved> {
        let Some(service) = self.default_service() else {
            debug!("No lookup service named {:?}", self.default_service);
            return None;
        };
        if !service.is_available() {
            debug!("Lookup service {} is not available", service.name());
            return None;
        }

        let mut remote = match service.search(media).await {
            Ok(remote) => remote,
            Err(e) => {
                warn!("{} lookup for {:?} failed: {}", service.name(), media.name(), e);
                return None;
            }
        };
        if !remote.is_valid() {
            warn!("{} returned no name for {:?}", service.name(), media.name());
            return None;
        }

        remote.set_ext(media.ext());
        let name = self.overrides.apply(remote.name());
        remote.set_name(name);

        let rendered = match remote.render_name(service.templates()) {
            Ok(rendered) if !rendered.is_empty() => rendered,
            Ok(_) => return None,
            Err(e) => {
                warn!("Cannot render {} result for {:?}: {}", service.name(), remote.name(), e);
                return None;
            }
        };

        let directories = service.directories().unwrap_or(&self.directories);
        let base = match paths::expand_directory(directories.for_kind(remote.kind())) {
            Ok(base) => base,
            Err(e) => {
                warn!("Cannot expand {} directory: {}", remote.kind(), e);
                return None;
            }
        };

        debug!("{} resolved {:?} to {:?}", service.name(), media.name(), rendered);
        Some(Resolved {
            service: service.name(),
            media: remote,
            name: rendered,
            base,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenameTemplates;
    use crate::error::{Error, Result};
    use async_trait::async_trait;

    struct StubService {
        service_name: &'static str,
        available: bool,
        result: Option<Media>,
        templates: RenameTemplates,
        directories: Option<Directories>,
    }

    impl StubService {
        fn new(result: Option<Media>) -> Self {
            Self {
                service_name: "stub",
                available: true,
                result,
                templates: RenameTemplates::default(),
                directories: Some(Directories {
                    movies: "/remote/movies".to_string(),
                    shows: "/remote/shows".to_string(),
                }),
            }
        }
    }

    #[async_trait]
    impl LookupService for StubService {
        fn name(&self) -> &'static str {
            self.service_name
        }

        fn is_available(&self) -> bool {
            self.available
        }

        async fn search(&self, _media: &Media) -> Result<Media> {
            self.result.clone().ok_or_else(|| Error::lookup("not found"))
        }

        fn templates(&self) -> &RenameTemplates {
            &self.templates
        }

        fn directories(&self) -> Option<&Directories> {
            self.directories.as_ref()
        }
    }

    fn registry_with(service: StubService) -> ServiceRegistry {
        let mut config = Config::default();
        config.default_service = "stub".to_string();
        config.overrides.insert("alien", "Alien (Director's Cut)");
        let mut registry = ServiceRegistry::new(&config);
        registry.register(Arc::new(service));
        registry
    }

    #[test]
    fn get_is_case_insensitive() {
        let registry = registry_with(StubService::new(None));
        assert!(registry.get("STUB").is_some());
        assert!(registry.get("omdb").is_none());
        assert_eq!(registry.default_service().unwrap().name(), "stub");
    }

    #[tokio::test]
    async fn resolve_success_applies_overrides_and_ext() {
        let registry = registry_with(StubService::new(Some(Media::movie("alien", 1979))));
        let local = Media::movie("Aliens", 0).with_ext("mkv");

        let resolved = registry.resolve(&local).await.unwrap();
        assert_eq!(resolved.service, "stub");
        assert_eq!(resolved.media.name(), "Alien (Director's Cut)");
        assert_eq!(resolved.name, "Alien (Director's Cut) (1979).mkv");
        assert_eq!(resolved.base, PathBuf::from("/remote/movies"));
    }

    #[tokio::test]
    async fn resolve_falls_back_to_global_directories() {
        let mut service = StubService::new(Some(Media::show("Lost", 1, 2)));
        service.directories = None;
        let mut config = Config::default();
        config.default_service = "stub".to_string();
        config.directories.shows = "/global/shows".to_string();
        let mut registry = ServiceRegistry::new(&config);
        registry.register(Arc::new(service));

        let resolved = registry.resolve(&Media::show("Lost", 1, 2)).await.unwrap();
        assert_eq!(resolved.base, PathBuf::from("/global/shows"));
    }

    #[tokio::test]
    async fn resolve_none_on_failure() {
        let registry = registry_with(StubService::new(None));
        assert!(registry.resolve(&Media::movie("x", 0)).await.is_none());

        let registry = registry_with(StubService::new(Some(Media::movie("", 0))));
        assert!(registry.resolve(&Media::movie("x", 0)).await.is_none());

        let mut unavailable = StubService::new(Some(Media::movie("x", 1)));
        unavailable.available = false;
        let registry = registry_with(unavailable);
        assert!(registry.resolve(&Media::movie("x", 0)).await.is_none());

        let mut broken = StubService::new(Some(Media::movie("x", 1)));
        broken.templates.movies = "{nope}".to_string();
        let registry = registry_with(broken);
        assert!(registry.resolve(&Media::movie("x", 0)).await.is_none());
    }

    #[tokio::test]
    async fn resolve_none_without_default() {
        let mut registry = ServiceRegistry::new(&Config::default());
        registry.register(Arc::new(StubService::new(Some(Media::movie("x", 1)))));
        assert!(registry.resolve(&Media::movie("x", 0)).await.is_none());
    }
}
