use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::RatingObservation,
    services::{providers::DatasetSource, Catalog},
    store::{RatingStore, Snapshot, SnapshotCache},
};

/// Bounds applied to `top_n` on the HTTP surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendationLimits {
    pub default_top_n: usize,
    pub max_top_n: usize,
}

impl Default for RecommendationLimits {
    fn default() -> Self {
        Self {
            default_top_n: 5,
            max_top_n: 10,
        }
    }
}

impl From<&Config> for RecommendationLimits {
    fn from(config: &Config) -> Self {
        Self {
            default_top_n: config.default_top_n,
            max_top_n: config.max_top_n,
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<RwLock<AppStateInner>>,
    pub snapshots: Arc<SnapshotCache>,
    pub source: Option<Arc<dyn DatasetSource>>,
    pub limits: RecommendationLimits,
}

/// Inner state that can be modified
pub struct AppStateInner {
    pub ratings: RatingStore,
    pub catalog: Arc<Catalog>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Creates a state with no ratings and an empty catalog
    pub fn new() -> Self {
        Self::with_data(RatingStore::new(), Catalog::default())
    }

    /// Creates a state over already loaded data
    pub fn with_data(ratings: RatingStore, catalog: Catalog) -> Self {
        Self {
            inner: Arc::new(RwLock::new(AppStateInner {
                ratings,
                catalog: Arc::new(catalog),
            })),
            snapshots: Arc::new(SnapshotCache::new()),
            source: None,
            limits: RecommendationLimits::default(),
        }
    }

    /// Sets the provider used by `reload`
    pub fn with_source(mut self, source: Arc<dyn DatasetSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_limits(mut self, limits: RecommendationLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Snapshot matching the current rating store, rebuilt if the store moved on
    ///
    /// Concurrent callers that miss wait for a single rebuild instead of each
    /// computing their own similarity table.
    pub async fn snapshot(&self) -> AppResult<Arc<Snapshot>> {
        if let Some(snapshot) = self.cached_snapshot().await {
            return Ok(snapshot);
        }

        let _rebuilding = self.snapshots.lock_rebuilds().await;
        let (version, observations) = {
            let inner = self.inner.read().await;
            let version = inner.ratings.version();
            if let Some(snapshot) = self.snapshots.get(version).await {
                return Ok(snapshot);
            }
            (version, inner.ratings.observations().to_vec())
        };

        self.snapshots.rebuild(version, observations).await
    }

    async fn cached_snapshot(&self) -> Option<Arc<Snapshot>> {
        let version = self.inner.read().await.ratings.version();
        self.snapshots.get(version).await
    }

    pub async fn catalog(&self) -> Arc<Catalog> {
        self.inner.read().await.catalog.clone()
    }

    /// Appends ratings and returns the new store version
    pub async fn add_ratings(&self, observations: Vec<RatingObservation>) -> AppResult<u64> {
        if observations.is_empty() {
            return Err(AppError::InvalidInput("No ratings provided".to_string()));
        }

        let count = observations.len();
        let version = self.inner.write().await.ratings.extend(observations)?;
        tracing::info!(count, version, "Ratings added");
        Ok(version)
    }

    /// Reloads catalog and ratings from the configured source, then rebuilds the snapshot
    pub async fn reload(&self) -> AppResult<Arc<Snapshot>> {
        let source = self
            .source
            .clone()
            .ok_or_else(|| AppError::Unavailable("No dataset source configured".to_string()))?;

        tracing::info!(source = source.name(), "Reloading dataset");

        let (places, observations) = tokio::try_join!(source.load_places(), source.load_ratings())?;
        let catalog = Catalog::from_places(places);

        {
            let mut inner = self.inner.write().await;
            inner.ratings.replace(observations)?;
            inner.catalog = Arc::new(catalog);
        }

        self.snapshot().await
    }
}
