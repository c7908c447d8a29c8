//! Optional latent-semantic projection of the TF-IDF space.
//!
//! Truncated SVD at a fixed target rank reduces sparsity and captures
//! co-occurrence structure. This is an accuracy/robustness tradeoff, not
//! required for correctness, so every failure path simply declines the
//! projection and the engine scores in raw TF-IDF space instead.

use nalgebra::{DMatrix, DVector, SVD};

use crate::content::vectorize::SparseVector;

/// A fitted projection from TF-IDF space into a k-dimensional latent
/// space: `project(x) = x · Vₖ`.
#[derive(Debug, Clone)]
pub struct LsaProjection {
    /// vocabulary_size × k
    components: DMatrix<f64>,
}

impl LsaProjection {
    /// Fit on the corpus vectors. Returns `None` when the corpus is too
    /// small for the requested rank or the decomposition does not
    /// converge.
    pub fn fit(doc_vectors: &[SparseVector], vocab_size: usize, rank: usize) -> Option<Self> {
        let n_docs = doc_vectors.len();
        // Rank must stay strictly below both dimensions.
        let k = rank.min(n_docs.saturating_sub(1)).min(vocab_size.saturating_sub(1));
        if k < 1 {
            return None;
        }

        let mut dense = DMatrix::<f64>::zeros(n_docs, vocab_size);
        for (row, vector) in doc_vectors.iter().enumerate() {
            for (idx, weight) in vector.iter() {
                dense[(row, idx)] = weight;
            }
        }

        let svd = SVD::try_new(dense, false, true, 1.0e-12, 1000)?;
        let v_t = svd.v_t?;
        let components = v_t.rows(0, k).transpose();

        tracing::debug!(documents = n_docs, vocab = vocab_size, rank = k, "lsa projection fitted");
        Some(LsaProjection { components })
    }

    /// Project a sparse TF-IDF vector into the latent space.
    pub fn project(&self, vector: &SparseVector) -> DVector<f64> {
        let k = self.components.ncols();
        let mut out = DVector::<f64>::zeros(k);
        for (idx, weight) in vector.iter() {
            for dim in 0..k {
                out[dim] += weight * self.components[(idx, dim)];
            }
        }
        out
    }
}

/// Cosine similarity between dense latent vectors, clamped to [0, 1] so
/// the engine's score contract holds even when the latent angle opens
/// past 90 degrees.
pub fn cosine_clamped(a: &DVector<f64>, b: &DVector<f64>) -> f64 {
    let denom = a.norm() * b.norm();
    if denom == 0.0 {
        return 0.0;
    }
    (a.dot(b) / denom).clamp(0.0, 1.0)
}
