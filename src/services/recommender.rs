use std::collections::BTreeMap;

use crate::models::{PlaceId, Recommendation, UserId};

use super::matrix::RatingMatrix;
use super::similarity::SimilarityTable;

/// Running weighted sum for one candidate place
#[derive(Debug, Default, Clone, Copy)]
struct WeightedSum {
    numerator: f64,
    denominator: f64,
}

/// User-based collaborative filtering over a rating snapshot
pub struct Recommender<'a> {
    matrix: &'a RatingMatrix,
    similarity: &'a SimilarityTable,
}

impl<'a> Recommender<'a> {
    /// Creates a recommender over a matrix and the similarity table computed from it
    pub fn new(matrix: &'a RatingMatrix, similarity: &'a SimilarityTable) -> Self {
        Self { matrix, similarity }
    }

    /// Predicted rating of one place for a user
    ///
    /// Returns `None` when the user is unknown, has already rated the place,
    /// or no similar user has rated it.
    pub fn predict(&self, user_id: UserId, place_id: PlaceId) -> Option<f64> {
        let row = self.matrix.row(user_id)?;
        if row.contains_key(&place_id) {
            return None;
        }

        let mut sum = WeightedSum::default();
        for (neighbor, similarity) in self.similarity.neighbors(user_id) {
            if let Some(rating) = self.matrix.rating(neighbor, place_id) {
                sum.add(similarity, rating);
            }
        }
        sum.prediction()
    }

    /// Ranks the places the user has not rated by predicted rating
    ///
    /// Unknown users get an empty list. Places no neighbor with positive
    /// weight has rated are left out rather than scored as zero. Ties on the
    /// predicted rating are broken by ascending place id, so raising `top_n`
    /// only ever appends entries.
    pub fn recommend(&self, user_id: UserId, top_n: usize) -> Vec<Recommendation> {
        let Some(target_row) = self.matrix.row(user_id) else {
            tracing::debug!(user_id = %user_id, "No ratings for user, nothing to recommend");
            return Vec::new();
        };
        if !self.similarity.contains(user_id) {
            return Vec::new();
        }

        // Accumulate neighbor contributions per unseen place
        let mut sums: BTreeMap<PlaceId, WeightedSum> = BTreeMap::new();
        for (neighbor, similarity) in self.similarity.neighbors(user_id) {
            let Some(neighbor_row) = self.matrix.row(neighbor) else {
                continue;
            };
            for (place_id, rating) in neighbor_row {
                if target_row.contains_key(place_id) {
                    continue;
                }
                sums.entry(*place_id).or_default().add(similarity, *rating);
            }
        }

        let mut candidates: Vec<Recommendation> = sums
            .into_iter()
            .filter_map(|(place_id, sum)| {
                sum.prediction().map(|predicted_rating| Recommendation {
                    place_id,
                    predicted_rating,
                })
            })
            .collect();

        candidates.sort_by(|a, b| {
            b.predicted_rating
                .total_cmp(&a.predicted_rating)
                .then_with(|| a.place_id.cmp(&b.place_id))
        });
        candidates.truncate(top_n);

        tracing::debug!(
            user_id = %user_id,
            top_n,
            returned = candidates.len(),
            "Computed recommendations"
        );

        candidates
    }
}

impl WeightedSum {
    fn add(&mut self, similarity: f64, rating: f64) {
        if rating > 0.0 {
            self.numerator += similarity * rating;
            self.denominator += similarity;
        }
    }

    fn prediction(&self) -> Option<f64> {
        (self.denominator > 0.0).then(|| self.numerator / self.denominator)
    }
}
