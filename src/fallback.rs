//! Cold-start / sparse-data fallback policy.
//!
//! A pure popularity order — rating descending, review count descending
//! — over the candidate subset, excluding anything the requester has
//! already rated. Guarantees every request returns *something* even with
//! zero historical data.

use crate::catalog::{Catalog, Course};
use crate::types::recommendation::RatingMap;

/// Rank the subset by (rate desc, reviews desc), skip rated courses,
/// truncate to `top_n`. The sort is stable, so equally popular courses
/// keep their catalog order.
pub fn popularity_ranking<'a>(
    catalog: &'a Catalog,
    rating_map: &RatingMap,
    top_n: usize,
) -> Vec<&'a Course> {
    let mut candidates: Vec<&Course> = catalog
        .courses()
        .iter()
        .filter(|c| !rating_map.contains_key(&c.course_id))
        .collect();
    candidates.sort_by(|a, b| {
        b.rate
            .partial_cmp(&a.rate)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.reviews.cmp(&a.reviews))
    });
    candidates.truncate(top_n);
    candidates
}
