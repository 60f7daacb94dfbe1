use crate::{error::InputError, models::RatingObservation};

pub mod cache;

pub use cache::{Snapshot, SnapshotCache};

/// Raw rating observations plus a version that changes on every mutation
///
/// Derived artifacts (matrix, similarity table) are tagged with the version
/// they were built from and rebuilt when it moves.
#[derive(Debug, Clone, Default)]
pub struct RatingStore {
    observations: Vec<RatingObservation>,
    version: u64,
}

impl RatingStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the given observations, validating each one
    pub fn from_observations(observations: Vec<RatingObservation>) -> Result<Self, InputError> {
        let mut store = Self::new();
        store.replace(observations)?;
        Ok(store)
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Observations in insertion order
    pub fn observations(&self) -> &[RatingObservation] {
        &self.observations
    }

    /// Appends one observation
    pub fn insert(&mut self, observation: RatingObservation) -> Result<u64, InputError> {
        self.extend(vec![observation])
    }

    /// Appends a batch of observations; nothing is stored if any is invalid
    pub fn extend(&mut self, observations: Vec<RatingObservation>) -> Result<u64, InputError> {
        for obs in &observations {
            obs.validate()?;
        }
        self.observations.extend(observations);
        self.version += 1;
        Ok(self.version)
    }

    /// Replaces every observation, as after a full dataset reload
    pub fn replace(&mut self, observations: Vec<RatingObservation>) -> Result<u64, InputError> {
        for obs in &observations {
            obs.validate()?;
        }
        self.observations = observations;
        self.version += 1;
        Ok(self.version)
    }
}
