use std::collections::HashMap;

use serde::Serialize;

use crate::models::{PlaceId, RatingObservation};

use super::catalog::Catalog;
use super::matrix::RatingMatrix;

/// Number of places listed in the popularity ranking
pub const TOP_PLACES: usize = 10;

/// Aggregate figures describing the loaded dataset
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DatasetStats {
    pub total_places: usize,
    pub total_users: usize,
    pub total_ratings: usize,
    pub top_places: Vec<PlacePopularity>,
    pub categories: Vec<CategoryCount>,
    pub rating_distribution: Vec<RatingCount>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlacePopularity {
    pub place_id: PlaceId,
    pub name: String,
    pub rating_count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RatingCount {
    pub rating: f64,
    pub count: usize,
}

impl DatasetStats {
    /// Computes the statistics
    ///
    /// `total_ratings` and the popularity ranking count raw observations,
    /// duplicates included. `total_users` counts rows of the rating matrix.
    pub fn compute(
        observations: &[RatingObservation],
        matrix: &RatingMatrix,
        catalog: &Catalog,
    ) -> Self {
        Self {
            total_places: catalog.len(),
            total_users: matrix.user_count(),
            total_ratings: observations.len(),
            top_places: top_places(observations, catalog, TOP_PLACES),
            categories: categories(catalog),
            rating_distribution: rating_distribution(observations),
        }
    }
}

fn top_places(
    observations: &[RatingObservation],
    catalog: &Catalog,
    limit: usize,
) -> Vec<PlacePopularity> {
    let mut counts: HashMap<PlaceId, usize> = HashMap::new();
    for obs in observations {
        *counts.entry(obs.place_id).or_insert(0) += 1;
    }

    let mut ranked: Vec<PlacePopularity> = counts
        .into_iter()
        .filter_map(|(place_id, rating_count)| {
            catalog.get(place_id).map(|place| PlacePopularity {
                place_id,
                name: place.name.clone(),
                rating_count,
            })
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.rating_count
            .cmp(&a.rating_count)
            .then_with(|| a.place_id.cmp(&b.place_id))
    });
    ranked.truncate(limit);
    ranked
}

fn categories(catalog: &Catalog) -> Vec<CategoryCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for place in catalog.iter() {
        *counts.entry(place.category.as_str()).or_insert(0) += 1;
    }

    let mut categories: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(category, count)| CategoryCount {
            category: category.to_string(),
            count,
        })
        .collect();
    categories.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.category.cmp(&b.category)));
    categories
}

/// Counts of each distinct rating value, ascending by value
fn rating_distribution(observations: &[RatingObservation]) -> Vec<RatingCount> {
    let mut ratings: Vec<f64> = observations.iter().map(|o| o.rating).collect();
    ratings.sort_by(f64::total_cmp);

    let mut distribution: Vec<RatingCount> = Vec::new();
    for rating in ratings {
        match distribution.last_mut() {
            Some(last) if last.rating == rating => last.count += 1,
            _ => distribution.push(RatingCount { rating, count: 1 }),
        }
    }
    distribution
}
