//! Hybrid course recommendation engine.
//!
//! `recommender-core` scores a fixed in-memory catalog against a
//! learner's interests by blending two independent signals: TF-IDF text
//! similarity between the query and course metadata (content-based) and
//! truncated-SVD predictions over the community's historical ratings
//! (collaborative). The blender smooths, normalizes, α-weights and
//! popularity-boosts the two score columns, then emits a ranked,
//! explainable result. Degenerate inputs — no ratings, empty corpora,
//! zero-variance scores, unseen users — route to deterministic fallback
//! paths instead of failing.
//!
//! Identical inputs always produce identical rankings; ties preserve
//! catalog order.
//!
//! # Quick start
//!
//! ```
//! use recommender_core::catalog::{Catalog, RawCourse};
//! use recommender_core::storage::InMemoryRatingsStore;
//! use recommender_core::types::RecommendRequest;
//!
//! let catalog = Catalog::from_raw_rows(vec![
//!     RawCourse {
//!         title: Some("Python for Data Science".into()),
//!         skills: Some("python, pandas, statistics".into()),
//!         rate: Some("4.6".into()),
//!         reviews: Some("1500".into()),
//!         ..RawCourse::default()
//!     },
//!     RawCourse {
//!         title: Some("French Cooking".into()),
//!         skills: Some("cuisine, baking".into()),
//!         ..RawCourse::default()
//!     },
//! ])
//! .unwrap();
//!
//! let store = InMemoryRatingsStore::default();
//! let request = RecommendRequest::new("python, machine learning", 5);
//! let result = recommender_core::recommend(&catalog, &store, &request).unwrap();
//!
//! assert_eq!(result.items[0].course.title, "Python for Data Science");
//! ```

pub mod blend;
pub mod cache;
pub mod catalog;
pub mod collab;
pub mod content;
pub mod engine;
pub mod fallback;
pub mod storage;
pub mod types;

pub use engine::{recommend, recommend_cached, recommend_with, EngineConfig};
