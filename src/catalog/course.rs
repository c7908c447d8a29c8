use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::identifiers::CourseId;

#[derive(Debug, Error)]
pub enum CourseError {
    /// A course without a title cannot be identified or vectorized.
    #[error("course row {0} is missing a title")]
    MissingTitle(usize),
}

/// A raw catalog row as delivered by the ingestion collaborator.
///
/// Every field is optional; `Course::from_raw` is the single place where
/// dirty input is coerced into the validated record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCourse {
    pub course_id: Option<String>,
    pub title: Option<String>,
    pub institution: Option<String>,
    pub subject: Option<String>,
    pub level: Option<String>,
    pub duration: Option<String>,
    pub skills: Option<String>,
    /// Possibly-dirty numeric rating, e.g. "4.5", "N/A".
    pub rate: Option<String>,
    /// Possibly-dirty review count.
    pub reviews: Option<String>,
}

/// A validated, immutable course record.
///
/// Invariants: `course_id` is always present; textual fields are never
/// null (coerced to empty strings) so vectorization never fails on
/// missing data; `rate` lies in [0, 5]; `reviews` is a plain count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub course_id: CourseId,
    pub title: String,
    pub institution: String,
    pub subject: String,
    pub level: String,
    pub duration: String,
    /// Comma-separated free-text skills list.
    pub skills: String,
    pub rate: f64,
    pub reviews: u64,
}

impl Course {
    /// Coerce a raw row into a validated record.
    ///
    /// This is the ONLY way to construct a `Course` from external data.
    /// `row` is the zero-based position in the source table, used for
    /// error reporting and identifier-free diagnostics.
    pub fn from_raw(row: usize, raw: RawCourse) -> Result<Self, CourseError> {
        let title = raw.title.unwrap_or_default();
        if title.trim().is_empty() {
            return Err(CourseError::MissingTitle(row));
        }

        let institution = raw.institution.unwrap_or_default();
        let course_id = match raw.course_id {
            Some(natural) if !natural.trim().is_empty() => CourseId::new(natural),
            _ => CourseId::derive(&title, &institution),
        };

        Ok(Course {
            course_id,
            title,
            institution,
            subject: raw.subject.unwrap_or_default(),
            level: raw.level.unwrap_or_default(),
            duration: raw.duration.unwrap_or_default(),
            skills: raw.skills.unwrap_or_default(),
            rate: coerce_rate(raw.rate.as_deref()),
            reviews: coerce_reviews(raw.reviews.as_deref()),
        })
    }

    /// One text blob per course, fed to the vectorizer.
    pub fn combined_text(&self) -> String {
        [
            self.title.as_str(),
            self.subject.as_str(),
            self.skills.as_str(),
            self.level.as_str(),
            self.institution.as_str(),
        ]
        .join(" ")
    }
}

/// Invalid → 0.0, clamped to the 0–5 scale.
fn coerce_rate(raw: Option<&str>) -> f64 {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .map_or(0.0, |v| v.clamp(0.0, 5.0))
}

/// Invalid → 0. Accepts "1,234" style thousands separators.
fn coerce_reviews(raw: Option<&str>) -> u64 {
    raw.map(|s| s.trim().replace(',', ""))
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0)
}
