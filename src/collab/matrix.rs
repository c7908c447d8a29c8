use std::collections::{BTreeMap, BTreeSet, HashMap};

use nalgebra::{DMatrix, DVector};

use crate::storage::RatingRow;
use crate::types::identifiers::CourseId;
use crate::types::recommendation::RatingMap;

/// Dense user × course rating matrix pivoted from historical ratings.
///
/// Rows are users who rated anything, columns are the courses that
/// appear in ratings, missing cells are 0 ("no signal", not "low
/// rating"). Duplicate (user, course) pairs aggregate by mean. Rebuilt
/// fresh from the snapshot each time, never mutated in place; row and
/// column order is sorted so a given snapshot always pivots identically.
#[derive(Debug, Clone)]
pub struct RatingMatrix {
    users: Vec<String>,
    courses: Vec<CourseId>,
    values: DMatrix<f64>,
    course_index: HashMap<CourseId, usize>,
}

impl RatingMatrix {
    /// Pivot rating rows into the dense matrix. `None` when there is
    /// nothing to pivot.
    pub fn build(rows: &[RatingRow]) -> Option<Self> {
        if rows.is_empty() {
            return None;
        }

        let users: Vec<String> = rows
            .iter()
            .map(|r| r.username.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let courses: Vec<CourseId> = rows
            .iter()
            .map(|r| r.course_id.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let user_index: HashMap<&str, usize> = users
            .iter()
            .enumerate()
            .map(|(i, u)| (u.as_str(), i))
            .collect();
        let course_index: HashMap<CourseId, usize> = courses
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();

        // Aggregate duplicates by mean before filling.
        let mut cells: BTreeMap<(usize, usize), (f64, usize)> = BTreeMap::new();
        for row in rows {
            let i = user_index[row.username.as_str()];
            let j = course_index[&row.course_id];
            let cell = cells.entry((i, j)).or_insert((0.0, 0));
            cell.0 += row.value;
            cell.1 += 1;
        }

        let mut values = DMatrix::<f64>::zeros(users.len(), courses.len());
        for ((i, j), (sum, count)) in cells {
            values[(i, j)] = sum / count as f64;
        }

        Some(RatingMatrix {
            users,
            courses,
            values,
            course_index,
        })
    }

    pub fn n_users(&self) -> usize {
        self.users.len()
    }

    pub fn n_courses(&self) -> usize {
        self.courses.len()
    }

    pub fn courses(&self) -> &[CourseId] {
        &self.courses
    }

    pub fn values(&self) -> &DMatrix<f64> {
        &self.values
    }

    /// One row of raw (not de-meaned) ratings.
    pub fn user_row(&self, row: usize) -> DVector<f64> {
        self.values.row(row).transpose()
    }

    /// Project the requester's explicit rating map onto this matrix's
    /// column space. Courses absent from the columns are dropped.
    pub fn project_user(&self, rating_map: &RatingMap) -> DVector<f64> {
        let mut vector = DVector::<f64>::zeros(self.courses.len());
        for (id, &value) in rating_map {
            if let Some(&j) = self.course_index.get(id) {
                vector[j] = value;
            }
        }
        vector
    }
}
