use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::Course;
use crate::types::identifiers::CourseId;

/// Explicit ratings supplied with a request: course → rating value.
///
/// Ordered map so every iteration over it is deterministic.
pub type RatingMap = BTreeMap<CourseId, f64>;

/// A recommendation request.
///
/// Everything the engine needs arrives as an explicit argument; the core
/// never resolves "who is the current user" from ambient state.
#[derive(Debug, Clone)]
pub struct RecommendRequest {
    /// Free-text interests/skills, comma separated ("python, finance").
    pub skills: String,
    /// Ratings the requester entered this session. Courses present here
    /// are never recommended back.
    pub rating_map: RatingMap,
    /// Optional identifier used to look up the requester's persisted
    /// rating history for warm content queries.
    pub user_id: Option<String>,
    /// Maximum number of results.
    pub top_n: usize,
}

impl RecommendRequest {
    pub fn new(skills: impl Into<String>, top_n: usize) -> Self {
        Self {
            skills: skills.into(),
            rating_map: RatingMap::new(),
            user_id: None,
            top_n,
        }
    }

    #[must_use]
    pub fn with_rating_map(mut self, rating_map: RatingMap) -> Self {
        self.rating_map = rating_map;
        self
    }

    #[must_use]
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}

/// Tunable blend parameters.
///
/// The smoothing floor and popularity-boost coefficients are fields, not
/// constants, so test suites can characterize sensitivity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlendConfig {
    /// Weight of the content signal; `1 - alpha` goes to the
    /// collaborative signal. Must lie in [0, 1].
    pub alpha: f64,
    /// The blender asks each engine for `candidate_factor × top_n`
    /// candidates before merging.
    pub candidate_factor: usize,
    /// Smoothing floor = `smoothing_ratio × min positive score` per
    /// column.
    pub smoothing_ratio: f64,
    /// Floor used when a column has no positive score at all.
    pub smoothing_epsilon: f64,
    /// Overall weight of the popularity boost. Zero disables the boost.
    pub boost_weight: f64,
    /// Rating share inside the boost.
    pub boost_rating_share: f64,
    /// Review-count share inside the boost.
    pub boost_reviews_share: f64,
}

impl Default for BlendConfig {
    fn default() -> Self {
        Self {
            alpha: 0.7,
            candidate_factor: 2,
            smoothing_ratio: 0.1,
            smoothing_epsilon: 0.01,
            boost_weight: 0.1,
            boost_rating_share: 0.7,
            boost_reviews_share: 0.3,
        }
    }
}

/// One ranked result. All score fields are canonical fractions in
/// [0, 1]; `match_percentage` is derived exactly once, here, so no
/// downstream consumer ever needs to sniff percentage-vs-fraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub course: Course,
    /// Normalized content similarity.
    pub content_score: f64,
    /// Normalized collaborative prediction.
    pub collab_score: f64,
    /// Blended score after smoothing, normalization and boost.
    pub hybrid_score: f64,
    /// `round(hybrid_score × 100, 1)`, for display.
    pub match_percentage: f64,
}

/// Metadata describing how a result was produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationMetadata {
    pub skills: String,
    pub alpha: f64,
    pub courses_considered: usize,
    pub courses_returned: usize,
    pub courses_excluded_as_rated: usize,
    /// False when the factorization engine routed to the popularity
    /// fallback (cold start or sparse data).
    pub collaborative_used: bool,
}

/// The final output of a recommendation operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub items: Vec<Recommendation>,
    pub meta: RecommendationMetadata,
}

#[derive(Debug, thiserror::Error)]
pub enum RecommendError {
    /// The catalog subset has zero rows; even the fallback has nothing
    /// to rank.
    #[error("catalog subset is empty; nothing to rank")]
    EmptyCatalog,

    /// Blend weight outside [0, 1].
    #[error("blend weight alpha must lie in [0, 1], got {0}")]
    InvalidAlpha(f64),
}
