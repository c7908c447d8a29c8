//! Rating Matrix & Factorization Engine.
//!
//! Pivots historical ratings into a user × course matrix, predicts
//! unseen ratings through truncated SVD, then resolves the requester
//! either by nearest-neighbor smoothing over the most similar historical
//! users or by the population baseline. Insufficient data never fails —
//! it reports [`CollabSignal::Insufficient`] and the caller falls back
//! to the popularity policy.

pub mod factorization;
pub mod matrix;

use std::collections::BTreeMap;

use nalgebra::DVector;

use crate::catalog::Catalog;
use crate::storage::{RatingRow, RatingsStore};
use crate::types::identifiers::CourseId;
use crate::types::recommendation::RatingMap;
pub use matrix::RatingMatrix;

/// Collaborative engine parameters.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CollabConfig {
    /// Factorization is skipped entirely below this many historical
    /// rating rows.
    pub min_ratings: usize,
    /// Target rank of the truncated decomposition.
    pub rank: usize,
    /// How many similar historical users to average when the requester
    /// supplies explicit ratings.
    pub neighbors: usize,
}

impl Default for CollabConfig {
    fn default() -> Self {
        Self {
            min_ratings: 10,
            rank: 50,
            neighbors: 5,
        }
    }
}

/// Outcome of a collaborative scoring pass.
#[derive(Debug, Clone, PartialEq)]
pub enum CollabSignal {
    /// Predicted rating per candidate course, already truncated to the
    /// requested candidate count and purged of courses the requester has
    /// rated.
    Predicted(BTreeMap<CourseId, f64>),
    /// Too little data, a degenerate matrix, or a failed decomposition.
    /// The blender treats every course as zero collaborative signal and
    /// callers that need an ordering use the popularity fallback.
    Insufficient,
}

/// Seam the blender scores collaborative signal through.
pub trait CollabScorer {
    fn scores(&self, catalog: &Catalog, rating_map: &RatingMap, top_n: usize) -> CollabSignal;
}

/// Engine over one historical ratings snapshot.
#[derive(Debug, Clone)]
pub struct CollabEngine {
    snapshot: Vec<RatingRow>,
    config: CollabConfig,
}

impl CollabEngine {
    pub fn new(snapshot: Vec<RatingRow>, config: CollabConfig) -> Self {
        Self { snapshot, config }
    }

    /// Pull the full ratings snapshot from the storage collaborator.
    pub fn from_store(store: &dyn RatingsStore, config: CollabConfig) -> Self {
        Self::new(store.all_ratings(), config)
    }

    pub fn snapshot_len(&self) -> usize {
        self.snapshot.len()
    }

    /// The requester's predicted-rating row over the matrix columns.
    fn resolve_user(
        &self,
        matrix: &RatingMatrix,
        predicted: &nalgebra::DMatrix<f64>,
        rating_map: &RatingMap,
    ) -> DVector<f64> {
        if rating_map.is_empty() {
            // Population baseline: column-wise mean of all predictions.
            return DVector::from_iterator(
                matrix.n_courses(),
                predicted.column_iter().map(|c| c.mean()),
            );
        }

        // Nearest-neighbor smoothing: cosine against every historical
        // user's raw row, average the predicted rows of the closest few.
        let user_vector = matrix.project_user(rating_map);
        let mut similarities: Vec<(usize, f64)> = (0..matrix.n_users())
            .map(|i| (i, cosine_dense(&user_vector, &matrix.user_row(i))))
            .collect();
        similarities.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });

        let chosen: Vec<usize> = similarities
            .into_iter()
            .take(self.config.neighbors.max(1))
            .map(|(i, _)| i)
            .collect();

        let mut averaged = DVector::<f64>::zeros(matrix.n_courses());
        for &i in &chosen {
            averaged += predicted.row(i).transpose();
        }
        averaged / chosen.len() as f64
    }
}

impl CollabScorer for CollabEngine {
    fn scores(&self, _catalog: &Catalog, rating_map: &RatingMap, top_n: usize) -> CollabSignal {
        if self.snapshot.len() < self.config.min_ratings {
            tracing::debug!(
                rows = self.snapshot.len(),
                min = self.config.min_ratings,
                "too few historical ratings; skipping factorization"
            );
            return CollabSignal::Insufficient;
        }

        let Some(matrix) = RatingMatrix::build(&self.snapshot) else {
            return CollabSignal::Insufficient;
        };
        let Some(predicted) = factorization::predict_all(&matrix, self.config.rank) else {
            return CollabSignal::Insufficient;
        };

        let user_predictions = self.resolve_user(&matrix, &predicted, rating_map);

        // Already-seen courses are never recommended.
        let mut candidates: Vec<(&CourseId, f64)> = matrix
            .courses()
            .iter()
            .zip(user_predictions.iter())
            .filter(|(id, _)| !rating_map.contains_key(*id))
            .map(|(id, &value)| (id, value))
            .collect();

        // Value desc, id asc; deterministic for equal predictions.
        candidates.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(b.0))
        });
        candidates.truncate(top_n);

        CollabSignal::Predicted(
            candidates
                .into_iter()
                .map(|(id, value)| (id.clone(), value))
                .collect(),
        )
    }
}

impl<T: CollabScorer + ?Sized> CollabScorer for std::sync::Arc<T> {
    fn scores(&self, catalog: &Catalog, rating_map: &RatingMap, top_n: usize) -> CollabSignal {
        (**self).scores(catalog, rating_map, top_n)
    }
}

fn cosine_dense(a: &DVector<f64>, b: &DVector<f64>) -> f64 {
    let denom = a.norm() * b.norm();
    if denom == 0.0 {
        return 0.0;
    }
    a.dot(b) / denom
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn row(user: &str, course: &str, value: f64) -> RatingRow {
        RatingRow {
            username: user.to_string(),
            course_id: CourseId::new(course),
            value,
        }
    }

    fn dense_snapshot() -> Vec<RatingRow> {
        // Two camps of raters over four courses, 12 rows total.
        vec![
            row("amy", "a", 5.0),
            row("amy", "b", 5.0),
            row("amy", "c", 1.0),
            row("ben", "a", 5.0),
            row("ben", "b", 4.0),
            row("ben", "c", 1.0),
            row("cal", "c", 5.0),
            row("cal", "d", 5.0),
            row("cal", "a", 1.0),
            row("dee", "c", 4.0),
            row("dee", "d", 5.0),
            row("dee", "a", 2.0),
        ]
    }

    #[test]
    fn below_minimum_rows_reports_insufficient() {
        let engine = CollabEngine::new(
            vec![row("amy", "a", 5.0)],
            CollabConfig::default(),
        );
        let signal = engine.scores(&Catalog::new(vec![]), &RatingMap::new(), 10);
        assert_eq!(signal, CollabSignal::Insufficient);
    }

    #[test]
    fn requester_ratings_steer_predictions_toward_their_camp() {
        let engine = CollabEngine::new(dense_snapshot(), CollabConfig::default());

        let mut rating_map = RatingMap::new();
        rating_map.insert(CourseId::new("a"), 5.0);
        rating_map.insert(CourseId::new("b"), 5.0);

        let CollabSignal::Predicted(scores) =
            engine.scores(&Catalog::new(vec![]), &rating_map, 10)
        else {
            panic!("expected predictions")
        };

        // Rated courses are excluded outright.
        assert!(!scores.contains_key(&CourseId::new("a")));
        assert!(!scores.contains_key(&CourseId::new("b")));
        assert!(scores.contains_key(&CourseId::new("c")));
        assert!(scores.contains_key(&CourseId::new("d")));
    }

    #[test]
    fn empty_rating_map_uses_population_baseline() {
        let engine = CollabEngine::new(dense_snapshot(), CollabConfig::default());
        let CollabSignal::Predicted(scores) =
            engine.scores(&Catalog::new(vec![]), &RatingMap::new(), 2)
        else {
            panic!("expected predictions")
        };
        // Truncated to the requested candidate count.
        assert_eq!(scores.len(), 2);
    }
}
