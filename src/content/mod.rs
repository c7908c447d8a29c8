//! Text Similarity Engine.
//!
//! Builds a TF-IDF vector space over each course's combined text fields
//! and scores a query against every course in the catalog. Two query
//! modes exist: cold (vectorize the literal input string) and warm
//! (rating-weighted average of the vectors of previously rated courses).
//! Output is cosine similarity per course — a score for every course in
//! the subset, each in [0, 1], never null or NaN.

pub mod lsa;
pub mod stopwords;
pub mod vectorize;

use std::collections::BTreeMap;

use nalgebra::DVector;

use crate::catalog::Catalog;
use crate::types::recommendation::RatingMap;
pub use lsa::LsaProjection;
pub use vectorize::{cosine, SparseVector, TfidfVectorizer};

/// Content engine parameters.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ContentConfig {
    /// Vocabulary cap.
    pub max_features: usize,
    /// N-gram range, inclusive.
    pub ngram_range: (usize, usize),
    /// Latent rank for the optional LSA projection; `None` scores in raw
    /// TF-IDF space.
    pub lsa_components: Option<usize>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            max_features: 5000,
            ngram_range: (1, 2),
            lsa_components: None,
        }
    }
}

/// How the query vector is built.
#[derive(Debug, Clone)]
pub enum ContentQuery<'a> {
    /// No identifier or no usable rating history: vectorize the literal
    /// free-text input.
    Cold(&'a str),
    /// The requester has persisted ratings: build the query as the
    /// rating-weighted average of the rated courses' own vectors,
    /// falling back to `skills` when none of them appear in the current
    /// catalog subset.
    Warm { history: &'a RatingMap, skills: &'a str },
}

/// Seam the blender scores content through; test doubles implement this.
pub trait ContentScorer {
    /// One similarity per course, aligned with `catalog.courses()` order.
    /// The blender zero-extends a short vector and drops extra entries,
    /// treating misaligned rows as zero signal.
    fn scores(&self, catalog: &Catalog, query: &ContentQuery<'_>) -> Vec<f64>;
}

/// A content model fitted to one catalog snapshot.
#[derive(Debug, Clone)]
pub struct ContentModel {
    vectorizer: TfidfVectorizer,
    doc_vectors: Vec<SparseVector>,
    latent: Option<(LsaProjection, Vec<DVector<f64>>)>,
}

impl ContentModel {
    /// Fit the vector space over the catalog's combined text blobs.
    ///
    /// Fitting never fails: an empty or all-stop-word catalog produces a
    /// model whose scores are uniformly zero.
    pub fn fit(catalog: &Catalog, config: &ContentConfig) -> Self {
        let blobs: Vec<String> = catalog
            .courses()
            .iter()
            .map(|course| course.combined_text())
            .collect();

        let mut vectorizer = TfidfVectorizer::new()
            .with_max_features(config.max_features)
            .with_ngram_range(config.ngram_range.0, config.ngram_range.1);
        let doc_vectors = vectorizer.fit_transform(&blobs);

        let latent = config.lsa_components.and_then(|rank| {
            let projection = LsaProjection::fit(&doc_vectors, vectorizer.vocabulary_size(), rank)?;
            let projected = doc_vectors.iter().map(|v| projection.project(v)).collect();
            Some((projection, projected))
        });

        ContentModel {
            vectorizer,
            doc_vectors,
            latent,
        }
    }

    /// Build the query vector in TF-IDF space.
    fn sparse_query(&self, catalog: &Catalog, query: &ContentQuery<'_>) -> SparseVector {
        match query {
            ContentQuery::Cold(text) => self.vectorizer.transform(text),
            ContentQuery::Warm { history, skills } => {
                let matched = self.matched_rows(catalog, history);
                if matched.is_empty() {
                    return self.vectorizer.transform(skills);
                }
                mean_sparse(&self.doc_vectors, &matched)
            }
        }
    }

    /// Rows of the current subset the requester has rated, with their
    /// rating values as weights.
    fn matched_rows(&self, catalog: &Catalog, history: &RatingMap) -> Vec<(usize, f64)> {
        history
            .iter()
            .filter_map(|(id, &value)| catalog.position(id).map(|row| (row, value)))
            .collect()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vectorizer.vocabulary_size()
    }
}

impl ContentScorer for ContentModel {
    fn scores(&self, catalog: &Catalog, query: &ContentQuery<'_>) -> Vec<f64> {
        debug_assert_eq!(
            catalog.len(),
            self.doc_vectors.len(),
            "model must be fitted to the catalog it scores"
        );

        match &self.latent {
            Some((projection, projected)) => {
                let q = projection.project(&self.sparse_query(catalog, query));
                projected.iter().map(|d| lsa::cosine_clamped(&q, d)).collect()
            }
            None => {
                let q = self.sparse_query(catalog, query);
                self.doc_vectors
                    .iter()
                    .map(|d| cosine(&q, d).clamp(0.0, 1.0))
                    .collect()
            }
        }
    }
}

impl<T: ContentScorer + ?Sized> ContentScorer for std::sync::Arc<T> {
    fn scores(&self, catalog: &Catalog, query: &ContentQuery<'_>) -> Vec<f64> {
        (**self).scores(catalog, query)
    }
}

/// Weighted mean of the selected rows. A zero weight sum falls back to
/// the unweighted mean — never a division by zero.
fn mean_sparse(vectors: &[SparseVector], rows: &[(usize, f64)]) -> SparseVector {
    let weight_sum: f64 = rows.iter().map(|&(_, w)| w).sum();
    let uniform = weight_sum == 0.0;
    let denom = if uniform { rows.len() as f64 } else { weight_sum };

    let mut accum: BTreeMap<usize, f64> = BTreeMap::new();
    for &(row, weight) in rows {
        let w = if uniform { 1.0 } else { weight };
        for (idx, value) in vectors[row].iter() {
            *accum.entry(idx).or_insert(0.0) += w * value;
        }
    }
    for value in accum.values_mut() {
        *value /= denom;
    }
    SparseVector::from_counts(accum)
}
