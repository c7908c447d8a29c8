//! Term-weighting vector space over course text.
//!
//! Standard TF-IDF with English stop words removed, unigrams + bigrams,
//! and a capped vocabulary. Vectors are L2-normalized at transform time
//! so cosine similarity reduces to a dot product.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::content::stopwords;

/// A sparse, index-sorted term vector.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    /// (vocabulary index, weight), strictly ascending by index.
    terms: Vec<(usize, f64)>,
}

impl SparseVector {
    pub(crate) fn from_counts(counts: BTreeMap<usize, f64>) -> Self {
        SparseVector {
            terms: counts.into_iter().filter(|&(_, w)| w != 0.0).collect(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.terms.iter().copied()
    }

    /// Merge-join dot product; both operands are index-sorted.
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.terms.len() && j < other.terms.len() {
            let (ia, wa) = self.terms[i];
            let (ib, wb) = other.terms[j];
            match ia.cmp(&ib) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += wa * wb;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    pub fn norm(&self) -> f64 {
        self.terms.iter().map(|&(_, w)| w * w).sum::<f64>().sqrt()
    }

    fn scale(&mut self, factor: f64) {
        for term in &mut self.terms {
            term.1 *= factor;
        }
    }
}

/// Cosine similarity between sparse vectors. A zero vector is orthogonal
/// to everything, never NaN.
pub fn cosine(a: &SparseVector, b: &SparseVector) -> f64 {
    let denom = a.norm() * b.norm();
    if denom == 0.0 {
        return 0.0;
    }
    a.dot(b) / denom
}

/// TF-IDF vectorizer.
///
/// `idf(t) = ln((1 + n) / (1 + df(t))) + 1` (smoothed so unseen terms
/// never divide by zero), `tfidf = tf × idf`, rows L2-normalized.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    max_features: usize,
    ngram_range: (usize, usize),
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Defaults match the engine contract: 5000 features, unigrams and
    /// bigrams, English stop words removed.
    pub fn new() -> Self {
        Self {
            max_features: 5000,
            ngram_range: (1, 2),
            vocabulary: HashMap::new(),
            idf: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = max_features;
        self
    }

    #[must_use]
    pub fn with_ngram_range(mut self, min_n: usize, max_n: usize) -> Self {
        self.ngram_range = (min_n.max(1), max_n.max(1));
        self
    }

    /// Learn vocabulary and document frequencies from the corpus.
    ///
    /// An empty corpus, or one that is all stop words, yields an empty
    /// vocabulary; every later transform then produces zero vectors
    /// rather than failing.
    pub fn fit<S: AsRef<str>>(&mut self, documents: &[S]) {
        let n_docs = documents.len();
        let mut term_freq: HashMap<String, usize> = HashMap::new();
        let mut doc_freq: HashMap<String, usize> = HashMap::new();

        for doc in documents {
            let tokens = tokenize(doc.as_ref());
            let mut seen: HashSet<String> = HashSet::new();
            for term in ngrams(&tokens, self.ngram_range) {
                *term_freq.entry(term.clone()).or_insert(0) += 1;
                seen.insert(term);
            }
            for term in seen {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        // Cap the vocabulary at the most frequent terms; ties broken
        // alphabetically for determinism.
        let mut ranked: Vec<(String, usize)> = term_freq.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(self.max_features);

        self.idf = Vec::with_capacity(ranked.len());
        self.vocabulary = HashMap::with_capacity(ranked.len());
        for (idx, (term, _)) in ranked.into_iter().enumerate() {
            let df = doc_freq.get(&term).copied().unwrap_or(0);
            self.idf
                .push(((1.0 + n_docs as f64) / (1.0 + df as f64)).ln() + 1.0);
            self.vocabulary.insert(term, idx);
        }

        tracing::debug!(
            documents = n_docs,
            vocabulary = self.vocabulary.len(),
            "tf-idf vectorizer fitted"
        );
    }

    /// Transform one text into an L2-normalized TF-IDF vector using the
    /// fitted vocabulary. Out-of-vocabulary terms are dropped.
    pub fn transform(&self, text: &str) -> SparseVector {
        let tokens = tokenize(text);
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for term in ngrams(&tokens, self.ngram_range) {
            if let Some(&idx) = self.vocabulary.get(&term) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }
        for (idx, weight) in counts.iter_mut() {
            *weight *= self.idf[*idx];
        }
        let mut vector = SparseVector::from_counts(counts);
        let norm = vector.norm();
        if norm > 0.0 {
            vector.scale(1.0 / norm);
        }
        vector
    }

    /// Fit on the corpus, then transform every document.
    pub fn fit_transform<S: AsRef<str>>(&mut self, documents: &[S]) -> Vec<SparseVector> {
        self.fit(documents);
        documents
            .iter()
            .map(|doc| self.transform(doc.as_ref()))
            .collect()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Lowercase, split on non-alphanumeric boundaries, keep tokens of at
/// least two characters, drop stop words.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= 2)
        .filter(|t| !stopwords::is_stop_word(t))
        .map(str::to_string)
        .collect()
}

/// All n-grams in the configured range, joined with `_`.
fn ngrams(tokens: &[String], range: (usize, usize)) -> Vec<String> {
    let mut out = Vec::new();
    for n in range.0..=range.1 {
        for window in tokens.windows(n) {
            out.push(window.join("_"));
        }
    }
    out
}
