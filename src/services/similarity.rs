use std::collections::HashMap;

use crate::models::UserId;

use super::matrix::{RatingMatrix, RatingRow};

/// Cosine similarity between two sparse rating rows
///
/// Missing keys count as zero, which gives the same result as comparing the
/// zero-filled dense rows. A row with zero magnitude has similarity 0 with
/// everything, itself included.
pub fn cosine_similarity(a: &RatingRow, b: &RatingRow) -> f64 {
    let norm_a = magnitude(a);
    let norm_b = magnitude(b);
    cosine_with_norms(a, norm_a, b, norm_b)
}

fn magnitude(row: &RatingRow) -> f64 {
    row.values().map(|r| r * r).sum::<f64>().sqrt()
}

fn dot(a: &RatingRow, b: &RatingRow) -> f64 {
    // Walk the shorter row and look each place up in the longer one
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    short
        .iter()
        .filter_map(|(place, ra)| long.get(place).map(|rb| ra * rb))
        .sum()
}

fn cosine_with_norms(a: &RatingRow, norm_a: f64, b: &RatingRow, norm_b: f64) -> f64 {
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot(a, b) / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

/// Symmetric user-by-user cosine similarity table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimilarityTable {
    users: Vec<UserId>,
    index: HashMap<UserId, usize>,
    /// Row-major `users.len() x users.len()` scores
    scores: Vec<f64>,
}

impl SimilarityTable {
    /// Computes similarity for every pair of users in the matrix
    ///
    /// Cost is O(U² × P); only the upper triangle is computed and mirrored.
    pub fn compute(matrix: &RatingMatrix) -> Self {
        let rows: Vec<(UserId, &RatingRow)> = matrix.rows().collect();
        let norms: Vec<f64> = rows.iter().map(|(_, row)| magnitude(row)).collect();
        let n = rows.len();

        let mut scores = vec![0.0; n * n];
        for i in 0..n {
            for j in i..n {
                let sim = cosine_with_norms(rows[i].1, norms[i], rows[j].1, norms[j]);
                scores[i * n + j] = sim;
                scores[j * n + i] = sim;
            }
        }

        let users: Vec<UserId> = rows.iter().map(|(user, _)| *user).collect();
        let index = users.iter().enumerate().map(|(i, u)| (*u, i)).collect();

        tracing::debug!(users = n, "Computed user similarity table");

        Self {
            users,
            index,
            scores,
        }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn contains(&self, user_id: UserId) -> bool {
        self.index.contains_key(&user_id)
    }

    /// Users covered by the table in ascending id order
    pub fn users(&self) -> &[UserId] {
        &self.users
    }

    /// Similarity of two users, `None` if either is unknown
    pub fn get(&self, a: UserId, b: UserId) -> Option<f64> {
        let i = *self.index.get(&a)?;
        let j = *self.index.get(&b)?;
        Some(self.scores[i * self.users.len() + j])
    }

    /// Every other user with their similarity to `user_id`, in ascending id order
    pub fn neighbors(&self, user_id: UserId) -> Vec<(UserId, f64)> {
        let Some(&i) = self.index.get(&user_id) else {
            return Vec::new();
        };
        let n = self.users.len();
        self.users
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(j, other)| (*other, self.scores[i * n + j]))
            .collect()
    }
}
