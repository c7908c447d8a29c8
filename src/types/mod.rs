pub mod identifiers;
pub mod recommendation;

pub use identifiers::{CourseId, SnapshotVersion};
pub use recommendation::{
    BlendConfig, RatingMap, RecommendError, RecommendRequest, Recommendation,
    RecommendationMetadata, RecommendationResult,
};
