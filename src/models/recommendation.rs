use serde::{Deserialize, Serialize};

use super::{Place, PlaceId};

/// A scored candidate produced by the recommender, before the catalog join
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub place_id: PlaceId,
    pub predicted_rating: f64,
}

/// A recommendation joined with the place's catalog attributes, returned to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendedPlace {
    pub place_id: PlaceId,
    pub predicted_rating: f64,
    pub name: String,
    pub city: String,
    pub category: String,
    pub price: u64,
    pub rating: f64,
}

impl RecommendedPlace {
    pub fn new(recommendation: &Recommendation, place: &Place) -> Self {
        Self {
            place_id: recommendation.place_id,
            predicted_rating: recommendation.predicted_rating,
            name: place.name.clone(),
            city: place.city.clone(),
            category: place.category.clone(),
            price: place.price,
            rating: place.rating,
        }
    }
}
