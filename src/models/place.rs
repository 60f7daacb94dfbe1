use serde::{Deserialize, Serialize};

use super::PlaceId;
use crate::error::InputError;

/// A tourist destination with its descriptive attributes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Place {
    pub place_id: PlaceId,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub city: String,
    /// Ticket price in rupiah
    pub price: u64,
    /// Aggregate rating published for the place, not used for scoring
    pub rating: f64,
}

/// Raw row of the place catalog table as exported by the dataset
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceRecord {
    #[serde(rename = "Place_Id", default)]
    pub place_id: Option<u32>,
    #[serde(rename = "Place_Name", default)]
    pub name: Option<String>,
    #[serde(rename = "Description", default)]
    pub description: Option<String>,
    #[serde(rename = "Category", default)]
    pub category: Option<String>,
    #[serde(rename = "City", default)]
    pub city: Option<String>,
    #[serde(rename = "Price", default)]
    pub price: Option<u64>,
    #[serde(rename = "Rating", default)]
    pub rating: Option<f64>,
}

impl PlaceRecord {
    /// Converts the raw row, `line` is only used for error reporting
    pub fn into_place(self, line: u64) -> Result<Place, InputError> {
        let missing = |field| InputError::MissingField { field, line };

        Ok(Place {
            place_id: PlaceId(self.place_id.ok_or_else(|| missing("Place_Id"))?),
            name: self.name.ok_or_else(|| missing("Place_Name"))?,
            description: self.description.filter(|d| !d.is_empty()),
            category: self.category.unwrap_or_default(),
            city: self.city.unwrap_or_default(),
            price: self.price.unwrap_or(0),
            rating: self.rating.unwrap_or(0.0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_into_place() {
        let record = PlaceRecord {
            place_id: Some(1),
            name: Some("Candi Prambanan".to_string()),
            description: Some(String::new()),
            category: Some("Budaya".to_string()),
            city: Some("Yogyakarta".to_string()),
            price: Some(50000),
            rating: Some(4.7),
        };

        let place = record.into_place(2).unwrap();
        assert_eq!(place.place_id, PlaceId(1));
        assert_eq!(place.name, "Candi Prambanan");
        assert_eq!(place.description, None);
        assert_eq!(place.price, 50000);
    }

    #[test]
    fn test_record_without_name_rejected() {
        let record = PlaceRecord {
            place_id: Some(1),
            name: None,
            description: None,
            category: None,
            city: None,
            price: None,
            rating: None,
        };

        let err = record.into_place(4).unwrap_err();
        assert_eq!(
            err,
            InputError::MissingField {
                field: "Place_Name",
                line: 4
            }
        );
    }
}
