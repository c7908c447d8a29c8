//! Contract with the storage collaborator.
//!
//! The core never talks to a database; it reads aggregated snapshots
//! through [`RatingsStore`]. Interactions are owned and persisted
//! elsewhere — only ratings feed the factorization engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::identifiers::CourseId;
use crate::types::recommendation::RatingMap;

/// What a user did with a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    Rating,
    View,
    Enroll,
}

/// A single historical event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub username: String,
    pub course_id: CourseId,
    pub kind: InteractionKind,
    pub value: f64,
    pub timestamp: DateTime<Utc>,
}

/// One historical rating, as consumed by the factorization engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingRow {
    pub username: String,
    pub course_id: CourseId,
    pub value: f64,
}

/// Read access to historical ratings.
pub trait RatingsStore {
    /// Every historical rating row.
    fn all_ratings(&self) -> Vec<RatingRow>;

    /// The given user's ratings, course → value.
    fn user_ratings(&self, user_id: &str) -> RatingMap;
}

/// In-memory store over an interaction log. Used by tests and demos;
/// production backends implement [`RatingsStore`] against their own
/// persistence.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRatingsStore {
    interactions: Vec<Interaction>,
}

impl InMemoryRatingsStore {
    pub fn new(interactions: Vec<Interaction>) -> Self {
        Self { interactions }
    }

    /// Convenience constructor from bare (user, course, value) triples.
    pub fn from_ratings<U, C>(rows: impl IntoIterator<Item = (U, C, f64)>) -> Self
    where
        U: Into<String>,
        C: Into<String>,
    {
        let interactions = rows
            .into_iter()
            .map(|(user, course, value)| Interaction {
                username: user.into(),
                course_id: CourseId::new(course),
                kind: InteractionKind::Rating,
                value,
                timestamp: Utc::now(),
            })
            .collect();
        Self::new(interactions)
    }

    pub fn push(&mut self, interaction: Interaction) {
        self.interactions.push(interaction);
    }
}

impl RatingsStore for InMemoryRatingsStore {
    fn all_ratings(&self) -> Vec<RatingRow> {
        self.interactions
            .iter()
            .filter(|i| i.kind == InteractionKind::Rating)
            .map(|i| RatingRow {
                username: i.username.clone(),
                course_id: i.course_id.clone(),
                value: i.value,
            })
            .collect()
    }

    fn user_ratings(&self, user_id: &str) -> RatingMap {
        self.interactions
            .iter()
            .filter(|i| i.kind == InteractionKind::Rating && i.username == user_id)
            .map(|i| (i.course_id.clone(), i.value))
            .collect()
    }
}
