//! Dataset provider abstraction
//!
//! The recommendation core never reads files itself. Providers supply the
//! place catalog and the rating observations from wherever they live:
//! a local CSV export, a remote raw file, or fixtures in tests.

use crate::{
    error::AppResult,
    models::{Place, RatingObservation},
};

pub mod csv_file;

pub use csv_file::{CsvSource, DatasetLocation};

/// Trait for dataset providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait DatasetSource: Send + Sync {
    /// Loads the full place catalog
    async fn load_places(&self) -> AppResult<Vec<Place>>;

    /// Loads every rating observation, in source order
    ///
    /// Repeated (user, place) pairs are kept; the matrix averages them.
    async fn load_ratings(&self) -> AppResult<Vec<RatingObservation>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
