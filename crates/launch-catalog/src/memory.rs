use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{CatalogError, Launch, LaunchCatalog, LaunchId, Mission, Result, Rocket};

#[derive(Debug, Default)]
struct InMemoryCatalogState {
    launches: Vec<Launch>,
}

/// In-memory launch catalog for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLaunchCatalog {
    state: Arc<RwLock<InMemoryCatalogState>>,
    unavailable: Arc<AtomicBool>,
    fetches: Arc<AtomicUsize>,
}

impl InMemoryLaunchCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog serving the given launches, sorted by id with
    /// duplicate ids collapsed to the first occurrence.
    pub fn with_launches(mut launches: Vec<Launch>) -> Self {
        launches.sort_by_key(|launch| launch.id);
        launches.dedup_by_key(|launch| launch.id);
        Self {
            state: Arc::new(RwLock::new(InMemoryCatalogState { launches })),
            ..Self::default()
        }
    }

    /// Creates a catalog with launches numbered `1..=count`.
    pub fn with_generated(count: i64) -> Self {
        Self::with_launches((1..=count).map(generated_launch).collect())
    }

    /// Makes every subsequent call fail as if the remote were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Returns how many catalog calls have been served.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<()> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(CatalogError::Unavailable(
                "in-memory catalog marked unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

fn generated_launch(n: i64) -> Launch {
    Launch {
        id: LaunchId::new(n),
        site: Some(format!("Site {n}")),
        mission: Mission {
            name: Some(format!("Mission {n}")),
            mission_patch_small: Some(format!("https://images.example/{n}-small.png")),
            mission_patch_large: Some(format!("https://images.example/{n}.png")),
        },
        rocket: Rocket {
            id: "falcon9".to_string(),
            name: Some("Falcon 9".to_string()),
            rocket_type: Some("FT".to_string()),
        },
    }
}

#[async_trait]
impl LaunchCatalog for InMemoryLaunchCatalog {
    async fn get_all_launches(&self) -> Result<Vec<Launch>> {
        self.check_available()?;
        tokio::task::yield_now().await;
        Ok(self.state.read().await.launches.clone())
    }

    async fn get_launch_by_id(&self, id: LaunchId) -> Result<Option<Launch>> {
        self.check_available()?;
        tokio::task::yield_now().await;
        Ok(self
            .state
            .read()
            .await
            .launches
            .iter()
            .find(|launch| launch.id == id)
            .cloned())
    }
}
