//! Top-level recommendation operation.
//!
//! Wires the fitted content model, the collaborative engine and the
//! blender together for one request. Each call is request-scoped and
//! synchronous; pass a [`ModelCache`] to reuse fitted models across
//! requests against an unchanged snapshot.

use serde::{Deserialize, Serialize};

use crate::blend::HybridBlender;
use crate::cache::ModelCache;
use crate::catalog::Catalog;
use crate::collab::{CollabConfig, CollabEngine};
use crate::content::{ContentConfig, ContentModel};
use crate::storage::RatingsStore;
use crate::types::recommendation::{
    BlendConfig, RatingMap, RecommendError, RecommendRequest, RecommendationResult,
};

/// All engine parameters in one place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub content: ContentConfig,
    pub collab: CollabConfig,
    pub blend: BlendConfig,
}

/// Recommend with default parameters, refitting models for this call.
pub fn recommend(
    catalog: &Catalog,
    store: &dyn RatingsStore,
    request: &RecommendRequest,
) -> Result<RecommendationResult, RecommendError> {
    recommend_with(catalog, store, request, &EngineConfig::default())
}

/// Recommend with explicit parameters, refitting models for this call.
pub fn recommend_with(
    catalog: &Catalog,
    store: &dyn RatingsStore,
    request: &RecommendRequest,
    config: &EngineConfig,
) -> Result<RecommendationResult, RecommendError> {
    let content = ContentModel::fit(catalog, &config.content);
    let collab = CollabEngine::from_store(store, config.collab.clone());
    run(catalog, store, request, config, content, collab)
}

/// Recommend through a model cache: models are refitted only when the
/// catalog, the ratings snapshot, or the configuration changed.
pub fn recommend_cached(
    catalog: &Catalog,
    store: &dyn RatingsStore,
    request: &RecommendRequest,
    config: &EngineConfig,
    cache: &mut ModelCache,
) -> Result<RecommendationResult, RecommendError> {
    let content = cache.content_model(catalog, &config.content);
    let collab = cache.collab_engine(store, &config.collab);
    run(catalog, store, request, config, content, collab)
}

fn run<C, F>(
    catalog: &Catalog,
    store: &dyn RatingsStore,
    request: &RecommendRequest,
    config: &EngineConfig,
    content: C,
    collab: F,
) -> Result<RecommendationResult, RecommendError>
where
    C: crate::content::ContentScorer,
    F: crate::collab::CollabScorer,
{
    // The warm content query needs the requester's persisted history;
    // it is fetched here and passed explicitly, never resolved from
    // ambient session state inside the scoring code.
    let history: RatingMap = request
        .user_id
        .as_deref()
        .map(|user| store.user_ratings(user))
        .unwrap_or_default();

    let blender = HybridBlender::new(content, collab, config.blend.clone())?;
    blender.recommend(catalog, request, &history)
}
