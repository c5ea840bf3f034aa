use async_trait::async_trait;
use futures_util::future::try_join_all;

use crate::{Launch, LaunchId, Result};

/// Read access to the launch catalog.
///
/// One instance is shared process-wide. Implementations apply their own
/// timeouts and return errors instead of hanging.
#[async_trait]
pub trait LaunchCatalog: Send + Sync {
    /// Fetches every launch, ordered ascending by launch id.
    async fn get_all_launches(&self) -> Result<Vec<Launch>>;

    /// Fetches one launch, or `None` if the catalog does not know it.
    async fn get_launch_by_id(&self, id: LaunchId) -> Result<Option<Launch>>;
}

/// Extension trait providing convenience methods for catalogs.
#[async_trait]
pub trait LaunchCatalogExt: LaunchCatalog {
    /// Fetches several launches concurrently, skipping unknown ids.
    ///
    /// The result keeps the order of `ids`.
    async fn get_launches_by_ids(&self, ids: &[LaunchId]) -> Result<Vec<Launch>> {
        let found = try_join_all(ids.iter().map(|id| self.get_launch_by_id(*id))).await?;
        Ok(found.into_iter().flatten().collect())
    }
}

impl<T: LaunchCatalog + ?Sized> LaunchCatalogExt for T {}
