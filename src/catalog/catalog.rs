// Read-only after construction:
// no mutation
// no incremental updates
// rebuilt wholesale when the source data changes

use std::collections::HashMap;

use crate::catalog::course::{Course, CourseError, RawCourse};
use crate::types::identifiers::{CourseId, SnapshotVersion};

/// An in-memory catalog snapshot.
///
/// Preserves source order — the blender's tie-break relies on it — and
/// indexes courses by id for O(1) lookup. Duplicate identifiers keep the
/// first occurrence; derived ids only guarantee uniqueness-in-practice.
#[derive(Debug, Clone)]
pub struct Catalog {
    courses: Vec<Course>,
    index: HashMap<CourseId, usize>,
}

impl Catalog {
    /// Build a catalog from validated courses.
    pub fn new(courses: Vec<Course>) -> Self {
        let mut deduped: Vec<Course> = Vec::with_capacity(courses.len());
        let mut index = HashMap::with_capacity(courses.len());
        for course in courses {
            if index.contains_key(&course.course_id) {
                tracing::debug!(id = %course.course_id, "dropping duplicate course id");
                continue;
            }
            index.insert(course.course_id.clone(), deduped.len());
            deduped.push(course);
        }
        Catalog {
            courses: deduped,
            index,
        }
    }

    /// Build a catalog straight from raw ingestion rows.
    pub fn from_raw_rows(rows: Vec<RawCourse>) -> Result<Self, CourseError> {
        let courses = rows
            .into_iter()
            .enumerate()
            .map(|(row, raw)| Course::from_raw(row, raw))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(courses = courses.len(), "catalog ingested");
        Ok(Self::new(courses))
    }

    /// A catalog containing only the courses the predicate keeps, in the
    /// same relative order. This is how the presentation layer hands the
    /// engine a post-search/post-filter subset.
    pub fn subset(&self, keep: impl Fn(&Course) -> bool) -> Catalog {
        Catalog::new(self.courses.iter().filter(|c| keep(c)).cloned().collect())
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    pub fn get(&self, id: &CourseId) -> Option<&Course> {
        self.index.get(id).map(|&i| &self.courses[i])
    }

    pub fn position(&self, id: &CourseId) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Content-hash version of this snapshot, used to key fitted-model
    /// caches.
    pub fn version(&self) -> SnapshotVersion {
        SnapshotVersion::from_lines(self.courses.iter().map(|c| {
            format!(
                "{}:{}:{}:{}",
                c.course_id,
                c.rate,
                c.reviews,
                c.combined_text()
            )
        }))
    }

    /// The most frequent skills across the catalog, for "popular skills"
    /// affordances in the presentation layer. Skills are split on commas
    /// and trimmed; counts are case-sensitive as stored.
    pub fn top_skills(&self, top_n: usize) -> Vec<String> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for course in &self.courses {
            for skill in course.skills.split(',') {
                let skill = skill.trim();
                if !skill.is_empty() {
                    *counts.entry(skill).or_insert(0) += 1;
                }
            }
        }
        let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
        // Frequency desc, then alphabetical for a deterministic list.
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
            .into_iter()
            .take(top_n)
            .map(|(skill, _)| skill.to_string())
            .collect()
    }
}
