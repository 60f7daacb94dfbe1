pub mod catalog;
pub mod matrix;
pub mod providers;
pub mod recommender;
pub mod similarity;
pub mod stats;

pub use catalog::Catalog;
pub use matrix::{RatingMatrix, RatingRow};
pub use recommender::Recommender;
pub use similarity::{cosine_similarity, SimilarityTable};
pub use stats::DatasetStats;
