use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Stable course identifier.
///
/// Catalogs rarely ship a natural primary key, so an identifier can be
/// derived deterministically from title + institution: the first 20
/// characters of the title followed by the first 10 of the institution,
/// with spaces replaced by `_`. Uniqueness-in-practice, not guaranteed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(String);

impl CourseId {
    /// Wrap a natural key supplied by the ingestion collaborator.
    pub fn new(raw: impl Into<String>) -> Self {
        CourseId(raw.into())
    }

    /// Derive an identifier from title and institution.
    ///
    /// Slicing is character-based so multi-byte titles never split a
    /// UTF-8 boundary.
    pub fn derive(title: &str, institution: &str) -> Self {
        let mut key: String = title.chars().take(20).collect();
        key.extend(institution.chars().take(10));
        CourseId(key.replace(' ', "_"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CourseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Content-hash version of a data snapshot (catalog or ratings).
///
/// Identical snapshots always hash to the same version, so fitted models
/// can be cached and invalidated on data change.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnapshotVersion(String);

impl SnapshotVersion {
    /// Hash an ordered sequence of lines describing the snapshot.
    pub fn from_lines<S: AsRef<str>>(lines: impl IntoIterator<Item = S>) -> Self {
        let mut hasher = Sha256::new();
        for line in lines {
            hasher.update(line.as_ref().as_bytes());
            hasher.update(b"\n");
        }
        let hex = hex::encode(hasher.finalize());
        SnapshotVersion(format!("sha256:{hex}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
