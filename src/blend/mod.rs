//! Hybrid Blender.
//!
//! Merges the content and collaborative score vectors over one catalog
//! subset: zero-fill, smoothing floor, per-column max normalization,
//! α-blend, popularity boost, exclusion of already-rated courses, stable
//! descending sort, truncation. All degeneracies (zero maxima, empty
//! signals, cold starts) are absorbed here; the only outward failures
//! are an empty subset and an out-of-range α.

pub mod explain;

use std::cmp::Ordering;

use crate::catalog::Catalog;
use crate::collab::{CollabScorer, CollabSignal};
use crate::content::{ContentQuery, ContentScorer};
use crate::types::recommendation::{
    BlendConfig, RatingMap, RecommendError, RecommendRequest, Recommendation,
    RecommendationMetadata, RecommendationResult,
};

/// Blends one content scorer with one collaborative scorer.
pub struct HybridBlender<C, F> {
    content: C,
    collab: F,
    config: BlendConfig,
}

impl<C, F> HybridBlender<C, F>
where
    C: ContentScorer,
    F: CollabScorer,
{
    pub fn new(content: C, collab: F, config: BlendConfig) -> Result<Self, RecommendError> {
        if !(0.0..=1.0).contains(&config.alpha) || config.alpha.is_nan() {
            return Err(RecommendError::InvalidAlpha(config.alpha));
        }
        Ok(Self {
            content,
            collab,
            config,
        })
    }

    /// Produce a ranked result of length ≤ `request.top_n`.
    ///
    /// `user_history` is the requester's persisted rating history,
    /// fetched by the caller from the storage collaborator; it drives
    /// the warm content query and is distinct from the session-explicit
    /// `request.rating_map`.
    pub fn recommend(
        &self,
        catalog: &Catalog,
        request: &RecommendRequest,
        user_history: &RatingMap,
    ) -> Result<RecommendationResult, RecommendError> {
        if catalog.is_empty() {
            return Err(RecommendError::EmptyCatalog);
        }

        // Ask both engines for a superset of candidates over the same
        // subset the caller is operating on.
        let candidate_count = request.top_n.saturating_mul(self.config.candidate_factor.max(1));

        let query = if request.user_id.is_some() && !user_history.is_empty() {
            ContentQuery::Warm {
                history: user_history,
                skills: &request.skills,
            }
        } else {
            ContentQuery::Cold(&request.skills)
        };

        let mut content_scores = self.content.scores(catalog, &query);
        // A scorer returning the wrong length must not panic the blend;
        // missing rows carry zero signal, extras are dropped.
        content_scores.resize(catalog.len(), 0.0);

        // Courses absent from the collaborative output carry zero
        // signal, never null.
        let mut collab_scores = vec![0.0; catalog.len()];
        let signal = self
            .collab
            .scores(catalog, &request.rating_map, candidate_count);
        let collaborative_used = matches!(signal, CollabSignal::Predicted(_));
        if let CollabSignal::Predicted(predictions) = signal {
            for (id, value) in predictions {
                if let Some(row) = catalog.position(&id) {
                    collab_scores[row] = value;
                }
            }
        }

        // A course with literally-zero raw signal in one dimension must
        // not be zeroed out of the blend; only courses at zero in both
        // dimensions rank last.
        apply_smoothing(
            &mut content_scores,
            self.config.smoothing_ratio,
            self.config.smoothing_epsilon,
        );
        apply_smoothing(
            &mut collab_scores,
            self.config.smoothing_ratio,
            self.config.smoothing_epsilon,
        );

        // The de-meaned reconstruction can predict below zero for weakly
        // rated courses; scores leave this point as fractions in [0, 1].
        normalize_by_max(&mut content_scores);
        normalize_by_max(&mut collab_scores);
        clamp_unit(&mut content_scores);
        clamp_unit(&mut collab_scores);

        let alpha = self.config.alpha;
        let mut hybrid: Vec<f64> = content_scores
            .iter()
            .zip(&collab_scores)
            .map(|(c, f)| alpha * c + (1.0 - alpha) * f)
            .collect();

        apply_popularity_boost(catalog, &mut hybrid, &self.config);

        // Rank: hybrid desc; the sort is stable so equal scores keep
        // catalog order.
        let mut order: Vec<usize> = (0..catalog.len())
            .filter(|&row| {
                !request
                    .rating_map
                    .contains_key(&catalog.courses()[row].course_id)
            })
            .collect();
        let excluded_as_rated = catalog.len() - order.len();
        order.sort_by(|&a, &b| {
            hybrid[b]
                .partial_cmp(&hybrid[a])
                .unwrap_or(Ordering::Equal)
        });
        order.truncate(request.top_n);

        debug_assert!(order.windows(2).all(|w| hybrid[w[0]] >= hybrid[w[1]]));

        let items: Vec<Recommendation> = order
            .iter()
            .map(|&row| {
                let score = hybrid[row];
                Recommendation {
                    course: catalog.courses()[row].clone(),
                    content_score: content_scores[row],
                    collab_score: collab_scores[row],
                    hybrid_score: score,
                    match_percentage: (score * 1000.0).round() / 10.0,
                }
            })
            .collect();

        tracing::debug!(
            considered = catalog.len(),
            returned = items.len(),
            collaborative_used,
            "blend complete"
        );

        Ok(RecommendationResult {
            meta: RecommendationMetadata {
                skills: request.skills.clone(),
                alpha,
                courses_considered: catalog.len(),
                courses_returned: items.len(),
                courses_excluded_as_rated: excluded_as_rated,
                collaborative_used,
            },
            items,
        })
    }
}

/// Add a small positive floor to every score: 10% of the minimum
/// positive score observed, or `epsilon` when the column has no positive
/// score at all.
fn apply_smoothing(scores: &mut [f64], ratio: f64, epsilon: f64) {
    let min_positive = scores
        .iter()
        .copied()
        .filter(|&s| s > 0.0)
        .fold(f64::INFINITY, f64::min);
    let floor = if min_positive.is_finite() {
        ratio * min_positive
    } else {
        epsilon
    };
    for score in scores {
        *score += floor;
    }
}

/// Divide by the column maximum; skipped when the maximum is 0 to avoid
/// NaN.
fn normalize_by_max(scores: &mut [f64]) {
    let max = scores.iter().copied().fold(0.0_f64, f64::max);
    if max > 0.0 {
        for score in scores {
            *score /= max;
        }
    }
}

/// Pin a score column to [0, 1]. Negative predictions survive smoothing
/// and an all-negative column skips max normalization entirely, so the
/// unit range is enforced here, not assumed.
fn clamp_unit(scores: &mut [f64]) {
    for score in scores {
        *score = score.clamp(0.0, 1.0);
    }
}

/// Multiplicative boost rewarding well-established courses:
/// `boost = w × (rs·rating_norm + vs·reviews_norm)`, review counts
/// log-compressed, final score clipped to 1.0 so popularity never
/// dominates relevance.
fn apply_popularity_boost(catalog: &Catalog, hybrid: &mut [f64], config: &BlendConfig) {
    if config.boost_weight == 0.0 {
        return;
    }

    let max_rate = catalog
        .courses()
        .iter()
        .map(|c| c.rate)
        .fold(0.0_f64, f64::max);
    let max_reviews_log = catalog
        .courses()
        .iter()
        .map(|c| (c.reviews as f64).ln_1p())
        .fold(0.0_f64, f64::max);

    for (row, course) in catalog.courses().iter().enumerate() {
        let rating_norm = if max_rate > 0.0 {
            course.rate / max_rate
        } else {
            0.0
        };
        let reviews_norm = if max_reviews_log > 0.0 {
            (course.reviews as f64).ln_1p() / max_reviews_log
        } else {
            0.0
        };
        let boost = config.boost_weight
            * (config.boost_rating_share * rating_norm
                + config.boost_reviews_share * reviews_norm);
        hybrid[row] = (hybrid[row] * (1.0 + boost)).min(1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoothing_uses_fraction_of_min_positive() {
        let mut scores = vec![0.0, 0.2, 0.5];
        apply_smoothing(&mut scores, 0.1, 0.01);
        assert!((scores[0] - 0.02).abs() < 1e-12);
        assert!((scores[1] - 0.22).abs() < 1e-12);
    }

    #[test]
    fn smoothing_falls_back_to_epsilon_for_all_zero_column() {
        let mut scores = vec![0.0, 0.0];
        apply_smoothing(&mut scores, 0.1, 0.01);
        assert_eq!(scores, vec![0.01, 0.01]);
    }

    #[test]
    fn zero_max_skips_normalization() {
        let mut scores = vec![0.0, 0.0];
        normalize_by_max(&mut scores);
        assert!(scores.iter().all(|s| *s == 0.0 && s.is_finite()));
    }

    #[test]
    fn normalization_maps_max_to_one() {
        let mut scores = vec![0.5, 2.0];
        normalize_by_max(&mut scores);
        assert_eq!(scores, vec![0.25, 1.0]);
    }

    #[test]
    fn clamp_pins_negatives_to_zero() {
        let mut scores = vec![-0.49, 0.5, 1.0];
        clamp_unit(&mut scores);
        assert_eq!(scores, vec![0.0, 0.5, 1.0]);
    }
}
