use std::collections::{BTreeMap, BTreeSet};

use crate::models::{PlaceId, RatingObservation, UserId};

/// Ratings of a single user, keyed by place. Absent keys are unrated places.
pub type RatingRow = BTreeMap<PlaceId, f64>;

/// User-by-place rating matrix
///
/// Stored sparsely: a place missing from a user's row means the user has not
/// rated it. The column set is the union of every place rated by anyone, so
/// the zero-filled dense view of any row has one entry per column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatingMatrix {
    rows: BTreeMap<UserId, RatingRow>,
    places: BTreeSet<PlaceId>,
}

impl RatingMatrix {
    /// Builds the matrix from raw observations
    ///
    /// Duplicate (user, place) observations collapse to the mean of their ratings.
    pub fn from_observations<'a, I>(observations: I) -> Self
    where
        I: IntoIterator<Item = &'a RatingObservation>,
    {
        // Running (sum, count) per pair
        let mut totals: BTreeMap<UserId, BTreeMap<PlaceId, (f64, u32)>> = BTreeMap::new();
        let mut places = BTreeSet::new();
        let mut duplicates = 0usize;

        for obs in observations {
            places.insert(obs.place_id);
            let total = totals
                .entry(obs.user_id)
                .or_default()
                .entry(obs.place_id)
                .or_insert((0.0, 0));
            if total.1 > 0 {
                duplicates += 1;
            }
            total.0 += obs.rating;
            total.1 += 1;
        }

        if duplicates > 0 {
            tracing::debug!(
                duplicates,
                "Collapsed duplicate ratings into their mean"
            );
        }

        let rows = totals
            .into_iter()
            .map(|(user, row)| {
                let row = row
                    .into_iter()
                    .map(|(place, (sum, count))| (place, sum / f64::from(count)))
                    .collect();
                (user, row)
            })
            .collect();

        Self { rows, places }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn user_count(&self) -> usize {
        self.rows.len()
    }

    pub fn place_count(&self) -> usize {
        self.places.len()
    }

    pub fn contains_user(&self, user_id: UserId) -> bool {
        self.rows.contains_key(&user_id)
    }

    /// Users in ascending id order
    pub fn users(&self) -> impl Iterator<Item = UserId> + '_ {
        self.rows.keys().copied()
    }

    /// Columns of the matrix in ascending id order
    pub fn places(&self) -> impl Iterator<Item = PlaceId> + '_ {
        self.places.iter().copied()
    }

    /// Rated places of a user
    pub fn row(&self, user_id: UserId) -> Option<&RatingRow> {
        self.rows.get(&user_id)
    }

    /// Iterates every (user, row) pair in ascending user order
    pub fn rows(&self) -> impl Iterator<Item = (UserId, &RatingRow)> + '_ {
        self.rows.iter().map(|(user, row)| (*user, row))
    }

    /// The user's rating for a place, `None` when unrated
    pub fn rating(&self, user_id: UserId, place_id: PlaceId) -> Option<f64> {
        self.rows.get(&user_id)?.get(&place_id).copied()
    }

    /// Zero-filled row aligned with `places()`
    pub fn dense_row(&self, user_id: UserId) -> Option<Vec<f64>> {
        let row = self.rows.get(&user_id)?;
        Some(
            self.places
                .iter()
                .map(|place| row.get(place).copied().unwrap_or(0.0))
                .collect(),
        )
    }

    /// Places in the column set the user has not rated
    pub fn unseen_places(&self, user_id: UserId) -> Vec<PlaceId> {
        match self.rows.get(&user_id) {
            Some(row) => self
                .places
                .iter()
                .filter(|place| !row.contains_key(place))
                .copied()
                .collect(),
            None => Vec::new(),
        }
    }
}
