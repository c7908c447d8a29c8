//! Human-readable rationales for ranked results.
//!
//! Pure presentation logic over the component scores: thresholds turn
//! the transparent score breakdown into short "why this course" clauses.

use serde::{Deserialize, Serialize};

use crate::types::recommendation::Recommendation;

/// Thresholds that trigger each rationale clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RationaleThresholds {
    /// A component score above this percentage is called out.
    pub strong_component_pct: f64,
    /// Ratings above this are "highly rated".
    pub strong_rating: f64,
    /// Review counts above this are "well established".
    pub established_reviews: u64,
}

impl Default for RationaleThresholds {
    fn default() -> Self {
        Self {
            strong_component_pct: 60.0,
            strong_rating: 4.0,
            established_reviews: 1000,
        }
    }
}

/// Build the rationale for one result.
pub fn rationale(rec: &Recommendation, thresholds: &RationaleThresholds) -> String {
    let mut clauses: Vec<String> = Vec::new();

    if rec.content_score * 100.0 > thresholds.strong_component_pct {
        clauses.push("closely matches your skills and interests".to_string());
    }
    if rec.collab_score * 100.0 > thresholds.strong_component_pct {
        clauses.push("highly rated by learners with similar tastes".to_string());
    }
    if rec.course.rate > thresholds.strong_rating {
        clauses.push(format!("carries a strong {:.1}-star rating", rec.course.rate));
    }
    if rec.course.reviews > thresholds.established_reviews {
        clauses.push(format!("well established with {} reviews", rec.course.reviews));
    }

    if clauses.is_empty() {
        format!("ranked by overall fit ({:.1}% match)", rec.match_percentage)
    } else {
        let mut text = clauses.join("; ");
        if let Some(first) = text.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Course;
    use crate::types::CourseId;

    fn rec(content: f64, collab: f64, rate: f64, reviews: u64) -> Recommendation {
        Recommendation {
            course: Course {
                course_id: CourseId::new("c"),
                title: "Course".to_string(),
                institution: String::new(),
                subject: String::new(),
                level: String::new(),
                duration: String::new(),
                skills: String::new(),
                rate,
                reviews,
            },
            content_score: content,
            collab_score: collab,
            hybrid_score: 0.5,
            match_percentage: 50.0,
        }
    }

    #[test]
    fn strong_content_triggers_skills_clause() {
        let text = rationale(&rec(0.8, 0.1, 3.0, 10), &RationaleThresholds::default());
        assert!(text.to_lowercase().contains("matches your skills"));
    }

    #[test]
    fn popularity_clauses_use_absolute_thresholds() {
        let text = rationale(&rec(0.1, 0.1, 4.6, 2500), &RationaleThresholds::default());
        assert!(text.contains("4.6-star"));
        assert!(text.contains("2500 reviews"));
    }

    #[test]
    fn weak_everything_gets_generic_fit_text() {
        let text = rationale(&rec(0.1, 0.1, 3.0, 10), &RationaleThresholds::default());
        assert!(text.contains("overall fit"));
    }
}
