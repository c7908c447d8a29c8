//! Identical inputs must produce identical outputs, byte for byte.

use recommender_core::cache::ModelCache;
use recommender_core::catalog::{Catalog, RawCourse};
use recommender_core::storage::InMemoryRatingsStore;
use recommender_core::types::{CourseId, RecommendRequest};
use recommender_core::EngineConfig;

fn sample_catalog() -> Catalog {
    let rows = vec![
        ("Python for Data Science", "python, pandas, numpy", "4.6", "1500"),
        ("Machine Learning Foundations", "python, statistics", "4.8", "3200"),
        ("French Cooking", "cuisine, baking", "4.2", "800"),
        ("Digital Marketing", "seo, branding", "3.9", "650"),
        ("Deep Learning with Python", "python, neural networks", "4.7", "2100"),
    ];
    Catalog::from_raw_rows(
        rows.into_iter()
            .map(|(title, skills, rate, reviews)| RawCourse {
                title: Some(title.to_string()),
                institution: Some("Online U".to_string()),
                skills: Some(skills.to_string()),
                rate: Some(rate.to_string()),
                reviews: Some(reviews.to_string()),
                ..RawCourse::default()
            })
            .collect(),
    )
    .unwrap()
}

fn sample_store() -> InMemoryRatingsStore {
    InMemoryRatingsStore::from_ratings([
        ("amy", "Python_for_Data_ScieOnline_U", 5.0),
        ("amy", "Machine_Learning_FouOnline_U", 5.0),
        ("amy", "French_CookingOnline_U", 2.0),
        ("ben", "Python_for_Data_ScieOnline_U", 4.0),
        ("ben", "Deep_Learning_with_POnline_U", 5.0),
        ("cal", "French_CookingOnline_U", 5.0),
        ("cal", "Digital_MarketingOnline_U", 4.0),
        ("dee", "Machine_Learning_FouOnline_U", 4.0),
        ("dee", "Deep_Learning_with_POnline_U", 4.0),
        ("eve", "Digital_MarketingOnline_U", 3.0),
        ("eve", "Python_for_Data_ScieOnline_U", 5.0),
    ])
}

#[test]
fn repeated_requests_serialize_identically() {
    let catalog = sample_catalog();
    let store = sample_store();
    let request = RecommendRequest::new("python, machine learning", 4).with_user_id("amy");

    let first = recommender_core::recommend(&catalog, &store, &request).unwrap();
    let second = recommender_core::recommend(&catalog, &store, &request).unwrap();

    let a = serde_json::to_string(&first).unwrap();
    let b = serde_json::to_string(&second).unwrap();
    assert_eq!(a, b);
}

#[test]
fn cached_and_uncached_paths_agree() {
    let catalog = sample_catalog();
    let store = sample_store();
    let config = EngineConfig::default();
    let request = RecommendRequest::new("python", 3);

    let direct = recommender_core::recommend_with(&catalog, &store, &request, &config).unwrap();

    let mut cache = ModelCache::new();
    let cached_cold =
        recommender_core::recommend_cached(&catalog, &store, &request, &config, &mut cache)
            .unwrap();
    let cached_warm =
        recommender_core::recommend_cached(&catalog, &store, &request, &config, &mut cache)
            .unwrap();

    let reference = serde_json::to_string(&direct).unwrap();
    assert_eq!(reference, serde_json::to_string(&cached_cold).unwrap());
    assert_eq!(reference, serde_json::to_string(&cached_warm).unwrap());
}

#[test]
fn equal_scores_keep_catalog_order() {
    // Two textually identical courses: every signal ties, so the
    // catalog order decides.
    let catalog = Catalog::from_raw_rows(vec![
        RawCourse {
            course_id: Some("first".into()),
            title: Some("Rust Programming".into()),
            skills: Some("rust".into()),
            ..RawCourse::default()
        },
        RawCourse {
            course_id: Some("second".into()),
            title: Some("Rust Programming".into()),
            skills: Some("rust".into()),
            ..RawCourse::default()
        },
    ])
    .unwrap();
    let store = InMemoryRatingsStore::default();

    let result =
        recommender_core::recommend(&catalog, &store, &RecommendRequest::new("rust", 2)).unwrap();
    assert_eq!(result.items[0].course.course_id, CourseId::new("first"));
    assert_eq!(result.items[1].course.course_id, CourseId::new("second"));
}
