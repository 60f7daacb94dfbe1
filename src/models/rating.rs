use serde::{Deserialize, Serialize};

use super::{PlaceId, UserId};
use crate::error::InputError;

/// A single rating a user gave to a place
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RatingObservation {
    pub user_id: UserId,
    pub place_id: PlaceId,
    pub rating: f64,
}

impl RatingObservation {
    /// Creates a validated observation
    pub fn new(user_id: UserId, place_id: PlaceId, rating: f64) -> Result<Self, InputError> {
        let observation = Self {
            user_id,
            place_id,
            rating,
        };
        observation.validate()?;
        Ok(observation)
    }

    /// Ratings must be finite and strictly positive, zero is reserved for "unrated"
    pub fn validate(&self) -> Result<(), InputError> {
        if !self.rating.is_finite() || self.rating <= 0.0 {
            return Err(InputError::InvalidRating {
                user_id: self.user_id.0,
                place_id: self.place_id.0,
                rating: self.rating,
            });
        }
        Ok(())
    }
}

// ============================================================================
// Dataset Types
// ============================================================================

/// Raw row of the ratings table as exported by the dataset
#[derive(Debug, Clone, Deserialize)]
pub struct RatingRecord {
    #[serde(rename = "User_Id", default)]
    pub user_id: Option<u32>,
    #[serde(rename = "Place_Id", default)]
    pub place_id: Option<u32>,
    #[serde(rename = "Place_Ratings", default)]
    pub rating: Option<f64>,
}

impl RatingRecord {
    /// Converts the raw row, `line` is only used for error reporting
    pub fn into_observation(self, line: u64) -> Result<RatingObservation, InputError> {
        let user_id = self.user_id.ok_or(InputError::MissingField {
            field: "User_Id",
            line,
        })?;
        let place_id = self.place_id.ok_or(InputError::MissingField {
            field: "Place_Id",
            line,
        })?;
        let rating = self.rating.ok_or(InputError::MissingField {
            field: "Place_Ratings",
            line,
        })?;

        RatingObservation::new(UserId(user_id), PlaceId(place_id), rating)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_observation() {
        let obs = RatingObservation::new(UserId(1), PlaceId(10), 4.0).unwrap();
        assert_eq!(obs.user_id, UserId(1));
        assert_eq!(obs.place_id, PlaceId(10));
        assert_eq!(obs.rating, 4.0);
    }

    #[test]
    fn test_zero_rating_rejected() {
        let result = RatingObservation::new(UserId(1), PlaceId(10), 0.0);
        assert!(matches!(result, Err(InputError::InvalidRating { .. })));
    }

    #[test]
    fn test_nan_rating_rejected() {
        let result = RatingObservation::new(UserId(1), PlaceId(10), f64::NAN);
        assert!(matches!(result, Err(InputError::InvalidRating { .. })));
    }

    #[test]
    fn test_record_missing_place_id() {
        let record = RatingRecord {
            user_id: Some(1),
            place_id: None,
            rating: Some(3.0),
        };
        let err = record.into_observation(5).unwrap_err();
        assert_eq!(
            err,
            InputError::MissingField {
                field: "Place_Id",
                line: 5
            }
        );
    }

    #[test]
    fn test_observation_deserializes_from_json() {
        let json = r#"{"user_id":3,"place_id":12,"rating":5.0}"#;
        let obs: RatingObservation = serde_json::from_str(json).unwrap();
        assert_eq!(obs.user_id, UserId(3));
        assert_eq!(obs.place_id, PlaceId(12));
    }
}
