//! Fitted-model caching keyed by snapshot version.
//!
//! A recommendation request is a pure function of (catalog subset, query
//! parameters, ratings snapshot), so the fitted text vector space and
//! the ratings snapshot can be reused across requests and invalidated
//! only when the underlying data — or the fitting configuration —
//! changes. Versions are content hashes, never timestamps.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::collab::{CollabConfig, CollabEngine};
use crate::content::{ContentConfig, ContentModel};
use crate::storage::{RatingRow, RatingsStore};
use crate::types::identifiers::SnapshotVersion;

/// Content-hash version of a ratings snapshot. Rows are sorted before
/// hashing so store iteration order never changes the version.
pub fn ratings_version(rows: &[RatingRow]) -> SnapshotVersion {
    let mut lines: Vec<String> = rows
        .iter()
        .map(|r| format!("{}:{}:{}", r.username, r.course_id, r.value))
        .collect();
    lines.sort();
    SnapshotVersion::from_lines(lines)
}

/// Version of a (catalog, config) pair; the config participates so a
/// parameter change refits even on identical data.
fn keyed_version<C: serde::Serialize>(data: &SnapshotVersion, config: &C) -> SnapshotVersion {
    let config_json = serde_json::to_string(config).unwrap_or_default();
    SnapshotVersion::from_lines([data.as_str(), config_json.as_str()])
}

/// Single-slot cache for the fitted content model and the collaborative
/// engine. Owned by the caller; not shared across threads.
#[derive(Debug, Clone, Default)]
pub struct ModelCache {
    content: Option<(SnapshotVersion, Arc<ContentModel>)>,
    collab: Option<(SnapshotVersion, Arc<CollabEngine>)>,
}

impl ModelCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fitted content model for this catalog, refitting only when the
    /// catalog content or the config changed.
    pub fn content_model(&mut self, catalog: &Catalog, config: &ContentConfig) -> Arc<ContentModel> {
        let version = keyed_version(&catalog.version(), config);
        if let Some((cached_version, model)) = &self.content {
            if *cached_version == version {
                return Arc::clone(model);
            }
        }
        tracing::debug!(version = version.as_str(), "refitting content model");
        let model = Arc::new(ContentModel::fit(catalog, config));
        self.content = Some((version, Arc::clone(&model)));
        model
    }

    /// Collaborative engine over the store's current snapshot,
    /// rebuilding only when the ratings or the config changed.
    pub fn collab_engine(
        &mut self,
        store: &dyn RatingsStore,
        config: &CollabConfig,
    ) -> Arc<CollabEngine> {
        let snapshot = store.all_ratings();
        let version = keyed_version(&ratings_version(&snapshot), config);
        if let Some((cached_version, engine)) = &self.collab {
            if *cached_version == version {
                return Arc::clone(engine);
            }
        }
        tracing::debug!(version = version.as_str(), "rebuilding collaborative engine");
        let engine = Arc::new(CollabEngine::new(snapshot, config.clone()));
        self.collab = Some((version, Arc::clone(&engine)));
        engine
    }
}
