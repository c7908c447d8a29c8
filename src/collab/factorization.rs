//! Truncated-SVD reconstruction of the rating matrix.
//!
//! De-mean each user's row, decompose, keep the top-k latent dimensions,
//! reconstruct and re-add the means. The reconstruction yields a dense
//! predicted rating for every (user, course) pair, including pairs the
//! user never rated — that is the collaborative signal.

use nalgebra::{DMatrix, DVector, SVD};

use crate::collab::matrix::RatingMatrix;

/// Reconstruct the full predicted-rating matrix at rank
/// `min(rank, rows − 1, cols − 1)`.
///
/// Returns `None` whenever factorization is undefined (a single column,
/// a single user, rank below 1) or the decomposition fails to converge —
/// the caller routes those to the fallback policy instead of failing.
pub fn predict_all(matrix: &RatingMatrix, rank: usize) -> Option<DMatrix<f64>> {
    let rows = matrix.n_users();
    let cols = matrix.n_courses();

    // k must be >= 1 and strictly below both dimensions.
    let k = rank.min(cols.saturating_sub(1)).min(rows.saturating_sub(1));
    if k < 1 {
        tracing::debug!(rows, cols, "matrix too small for factorization");
        return None;
    }

    let raw = matrix.values();
    let means = DVector::<f64>::from_iterator(rows, raw.row_iter().map(|r| r.mean()));

    let mut centered = raw.clone();
    for i in 0..rows {
        for j in 0..cols {
            centered[(i, j)] -= means[i];
        }
    }

    let svd = SVD::try_new(centered, true, true, 1.0e-12, 1000)?;
    let u = svd.u?;
    let v_t = svd.v_t?;
    let sigma = svd.singular_values;

    // Rank-k reconstruction plus the per-user mean.
    let mut predicted = DMatrix::<f64>::zeros(rows, cols);
    for i in 0..rows {
        for j in 0..cols {
            let mut cell = 0.0;
            for l in 0..k {
                cell += u[(i, l)] * sigma[l] * v_t[(l, j)];
            }
            predicted[(i, j)] = cell + means[i];
        }
    }

    tracing::debug!(rows, cols, rank = k, "rating matrix factorized");
    Some(predicted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::RatingRow;
    use crate::types::CourseId;

    fn row(user: &str, course: &str, value: f64) -> RatingRow {
        RatingRow {
            username: user.to_string(),
            course_id: CourseId::new(course),
            value,
        }
    }

    #[test]
    fn single_column_is_undefined() {
        let matrix = RatingMatrix::build(&[row("amy", "a", 5.0), row("zoe", "a", 3.0)]).unwrap();
        assert!(predict_all(&matrix, 50).is_none());
    }

    #[test]
    fn single_user_is_undefined() {
        let matrix = RatingMatrix::build(&[row("amy", "a", 5.0), row("amy", "b", 3.0)]).unwrap();
        assert!(predict_all(&matrix, 50).is_none());
    }

    #[test]
    fn full_rank_reconstruction_reproduces_observed_ratings() {
        let matrix = RatingMatrix::build(&[
            row("amy", "a", 5.0),
            row("amy", "b", 1.0),
            row("ben", "a", 4.0),
            row("ben", "c", 2.0),
            row("zoe", "b", 3.0),
            row("zoe", "c", 5.0),
        ])
        .unwrap();
        // k = min(50, 2, 2) = 2: exact reconstruction of the centered
        // matrix, so every observed cell comes back unchanged.
        let predicted = predict_all(&matrix, 50).unwrap();
        let raw = matrix.values();
        for i in 0..matrix.n_users() {
            for j in 0..matrix.n_courses() {
                assert!((predicted[(i, j)] - raw[(i, j)]).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn truncated_reconstruction_fills_unrated_cells() {
        // Two like-minded users and one outlier; the unrated cell for
        // "cal" should land near what the similar users gave it.
        let matrix = RatingMatrix::build(&[
            row("amy", "a", 5.0),
            row("amy", "b", 5.0),
            row("amy", "c", 1.0),
            row("ben", "a", 5.0),
            row("ben", "b", 4.0),
            row("ben", "c", 1.0),
            row("cal", "a", 5.0),
            row("cal", "c", 1.0),
        ])
        .unwrap();
        let predicted = predict_all(&matrix, 1).unwrap();
        // Column order: a, b, c; row order: amy, ben, cal.
        assert!(predicted[(2, 1)] > predicted[(2, 2)]);
    }
}
