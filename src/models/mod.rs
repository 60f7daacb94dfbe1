use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub mod place;
pub mod rating;
pub mod recommendation;

pub use place::{Place, PlaceRecord};
pub use rating::{RatingObservation, RatingRecord};
pub use recommendation::{Recommendation, RecommendedPlace};

/// Identifier of a user in the rating dataset
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(pub u32);

/// Identifier of a tourist destination in the catalog
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlaceId(pub u32);

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for PlaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for UserId {
    fn from(id: u32) -> Self {
        UserId(id)
    }
}

impl From<u32> for PlaceId {
    fn from(id: u32) -> Self {
        PlaceId(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_display() {
        assert_eq!(format!("{}", UserId(42)), "42");
    }

    #[test]
    fn test_place_id_serde_is_transparent() {
        let json = serde_json::to_string(&PlaceId(7)).unwrap();
        assert_eq!(json, "7");

        let deserialized: PlaceId = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, PlaceId(7));
    }
}
