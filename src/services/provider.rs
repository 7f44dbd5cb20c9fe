//! Trait definition for metadata lookup services.

use async_trait::async_trait;

use crate::config::{Directories, RenameTemplates};
use crate::error::Result;
use crate::media::Media;

/// A remote source of canonical names for movies and shows.
///
/// `search` returns a record of the same variant as its input. Services
/// carry their own rename templates because they may supply fields (such as
/// an episode title) the local parser cannot.
#[async_trait]
pub trait LookupService: Send + Sync {
    /// Short lowercase identifier, matched against `default_service`.
    fn name(&self) -> &'static str;

    /// Whether the service is configured well enough to be queried.
    fn is_available(&self) -> bool;

    async fn search(&self, media: &Media) -> Result<Media>;

    /// Templates used to render a name from this service's results.
    fn templates(&self) -> &RenameTemplates;

    /// Base directories for this service's results; `None` uses the global
    /// ones.
    fn directories(&self) -> Option<&Directories>;
}
