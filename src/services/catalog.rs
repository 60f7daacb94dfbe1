use std::collections::HashMap;

use crate::models::{Place, PlaceId, Recommendation, RecommendedPlace};

/// Place metadata keyed by id, used to decorate recommendations for display
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    places: HashMap<PlaceId, Place>,
}

impl Catalog {
    /// Builds the catalog; a repeated place id replaces the earlier entry
    pub fn from_places(places: Vec<Place>) -> Self {
        let total = places.len();
        let places: HashMap<PlaceId, Place> =
            places.into_iter().map(|p| (p.place_id, p)).collect();

        if places.len() < total {
            tracing::warn!(
                duplicates = total - places.len(),
                "Catalog contains repeated place ids, keeping the last entry"
            );
        }

        Self { places }
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    pub fn get(&self, place_id: PlaceId) -> Option<&Place> {
        self.places.get(&place_id)
    }

    /// All places ordered by id
    pub fn sorted(&self) -> Vec<&Place> {
        let mut places: Vec<&Place> = self.places.values().collect();
        places.sort_by_key(|p| p.place_id);
        places
    }

    pub fn iter(&self) -> impl Iterator<Item = &Place> {
        self.places.values()
    }

    /// Attaches catalog attributes to recommendations, keeping their order
    ///
    /// Recommendations without a catalog entry are dropped.
    pub fn join(&self, recommendations: &[Recommendation]) -> Vec<RecommendedPlace> {
        recommendations
            .iter()
            .filter_map(|rec| match self.places.get(&rec.place_id) {
                Some(place) => Some(RecommendedPlace::new(rec, place)),
                None => {
                    tracing::warn!(
                        place_id = %rec.place_id,
                        "Recommended place missing from catalog, dropping it"
                    );
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(id: u32, name: &str) -> Place {
        Place {
            place_id: PlaceId(id),
            name: name.to_string(),
            description: None,
            category: "Taman Hiburan".to_string(),
            city: "Yogyakarta".to_string(),
            price: 10000,
            rating: 4.5,
        }
    }

    #[test]
    fn test_join_preserves_order_and_drops_unknown() {
        let catalog = Catalog::from_places(vec![place(1, "Malioboro"), place(2, "Tugu")]);
        let recs = vec![
            Recommendation {
                place_id: PlaceId(2),
                predicted_rating: 4.8,
            },
            Recommendation {
                place_id: PlaceId(9),
                predicted_rating: 4.5,
            },
            Recommendation {
                place_id: PlaceId(1),
                predicted_rating: 3.9,
            },
        ];

        let joined = catalog.join(&recs);
        assert_eq!(joined.len(), 2);
        assert_eq!(joined[0].name, "Tugu");
        assert_eq!(joined[0].predicted_rating, 4.8);
        assert_eq!(joined[1].name, "Malioboro");
        assert_eq!(joined[1].city, "Yogyakarta");
    }

    #[test]
    fn test_repeated_place_id_keeps_last() {
        let catalog = Catalog::from_places(vec![place(1, "Old"), place(1, "New")]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(PlaceId(1)).unwrap().name, "New");
    }

    #[test]
    fn test_sorted_by_id() {
        let catalog = Catalog::from_places(vec![place(3, "C"), place(1, "A"), place(2, "B")]);
        let ids: Vec<u32> = catalog.sorted().iter().map(|p| p.place_id.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
