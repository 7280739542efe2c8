pub mod gitiles;

use async_trait::async_trait;
use gmirror_core::catalog::RepoMap;
use gmirror_core::error::MirrorError;

pub use gitiles::GitilesLister;

/// A source of repositories to mirror.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch the full catalog as a name to clone-URL mapping.
    async fn list_repos(&self) -> Result<RepoMap, MirrorError>;
}
