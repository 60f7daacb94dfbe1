use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, MutexGuard, RwLock};

use crate::{
    error::{AppError, AppResult},
    models::{RatingObservation, Recommendation, UserId},
    services::{RatingMatrix, Recommender, SimilarityTable},
};

/// Matrix and similarity table derived from one version of the rating store
///
/// Immutable once built; readers share it through an `Arc`.
#[derive(Debug)]
pub struct Snapshot {
    version: u64,
    built_at: DateTime<Utc>,
    matrix: RatingMatrix,
    similarity: SimilarityTable,
}

impl Snapshot {
    /// Builds the matrix and the similarity table. This is the expensive step.
    pub fn build(version: u64, observations: &[RatingObservation]) -> Self {
        let matrix = RatingMatrix::from_observations(observations);
        let similarity = SimilarityTable::compute(&matrix);

        Self {
            version,
            built_at: Utc::now(),
            matrix,
            similarity,
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    pub fn matrix(&self) -> &RatingMatrix {
        &self.matrix
    }

    pub fn similarity(&self) -> &SimilarityTable {
        &self.similarity
    }

    /// Top `top_n` unseen places for the user, empty for unknown users
    pub fn recommend(&self, user_id: UserId, top_n: usize) -> Vec<Recommendation> {
        Recommender::new(&self.matrix, &self.similarity).recommend(user_id, top_n)
    }
}

/// Holds the current snapshot and swaps in rebuilt ones
///
/// Rebuilds happen off to the side from a copy of the observations; the new
/// snapshot replaces the old `Arc` in one write, so readers see either the
/// old table or the complete new one. Callers that miss the cache hold the
/// rebuild guard while rebuilding, so each version is built once.
#[derive(Default)]
pub struct SnapshotCache {
    current: RwLock<Option<Arc<Snapshot>>>,
    rebuild_guard: Mutex<()>,
    builds: AtomicU64,
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current snapshot, if one was built
    pub async fn current(&self) -> Option<Arc<Snapshot>> {
        self.current.read().await.clone()
    }

    /// Returns the current snapshot when it was built from `version`
    pub async fn get(&self, version: u64) -> Option<Arc<Snapshot>> {
        self.current
            .read()
            .await
            .as_ref()
            .filter(|snapshot| snapshot.version == version)
            .cloned()
    }

    /// Serializes rebuilds; re-check `get` after acquiring it
    pub async fn lock_rebuilds(&self) -> MutexGuard<'_, ()> {
        self.rebuild_guard.lock().await
    }

    /// Number of snapshots built so far
    pub fn build_count(&self) -> u64 {
        self.builds.load(Ordering::Relaxed)
    }

    /// Builds a snapshot for `version` on the blocking pool and installs it
    ///
    /// If a snapshot of the same or a newer version got installed meanwhile,
    /// that one is kept and returned instead.
    pub async fn rebuild(
        &self,
        version: u64,
        observations: Vec<RatingObservation>,
    ) -> AppResult<Arc<Snapshot>> {
        tracing::info!(
            version,
            observations = observations.len(),
            "Rebuilding similarity snapshot"
        );

        let snapshot = tokio::task::spawn_blocking(move || Snapshot::build(version, &observations))
            .await
            .map_err(|e| AppError::Internal(format!("Snapshot build failed: {}", e)))?;
        self.builds.fetch_add(1, Ordering::Relaxed);
        let snapshot = Arc::new(snapshot);

        let mut current = self.current.write().await;
        if let Some(existing) = current.as_ref() {
            if existing.version >= version {
                tracing::debug!(
                    version,
                    installed = existing.version,
                    "Discarding rebuilt snapshot, a newer one is installed"
                );
                return Ok(existing.clone());
            }
        }
        *current = Some(snapshot.clone());

        tracing::info!(
            version,
            users = snapshot.matrix.user_count(),
            places = snapshot.matrix.place_count(),
            "Similarity snapshot installed"
        );

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PlaceId;

    fn observations() -> Vec<RatingObservation> {
        vec![
            RatingObservation::new(UserId(1), PlaceId(1), 5.0).unwrap(),
            RatingObservation::new(UserId(2), PlaceId(1), 5.0).unwrap(),
            RatingObservation::new(UserId(2), PlaceId(2), 4.0).unwrap(),
        ]
    }

    #[test]
    fn test_snapshot_recommend() {
        let snapshot = Snapshot::build(1, &observations());
        let recs = snapshot.recommend(UserId(1), 5);

        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].place_id, PlaceId(2));
        assert!(snapshot.recommend(UserId(7), 5).is_empty());
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = Snapshot::build(0, &[]);
        assert!(snapshot.matrix().is_empty());
        assert!(snapshot.similarity().is_empty());
        assert!(snapshot.recommend(UserId(1), 3).is_empty());
    }

    #[tokio::test]
    async fn test_cache_starts_empty() {
        let cache = SnapshotCache::new();
        assert!(cache.current().await.is_none());
        assert!(cache.get(0).await.is_none());
    }

    #[tokio::test]
    async fn test_rebuild_installs_snapshot() {
        let cache = SnapshotCache::new();
        let snapshot = cache.rebuild(3, observations()).await.unwrap();

        assert_eq!(snapshot.version(), 3);
        assert!(cache.get(3).await.is_some());
        assert!(cache.get(2).await.is_none());
    }

    #[tokio::test]
    async fn test_older_rebuild_does_not_replace_newer() {
        let cache = SnapshotCache::new();
        cache.rebuild(5, observations()).await.unwrap();

        let returned = cache.rebuild(4, Vec::new()).await.unwrap();
        assert_eq!(cache.build_count(), 2);

        assert_eq!(returned.version(), 5);
        assert_eq!(cache.current().await.unwrap().version(), 5);
        assert_eq!(returned.matrix().user_count(), 2);
    }

    #[tokio::test]
    async fn test_readers_keep_old_snapshot_after_swap() {
        let cache = SnapshotCache::new();
        let old = cache.rebuild(1, observations()).await.unwrap();
        let new = cache.rebuild(2, Vec::new()).await.unwrap();

        assert_eq!(old.matrix().user_count(), 2);
        assert!(new.matrix().is_empty());
        assert_eq!(cache.current().await.unwrap().version(), 2);
    }
}
