use recommender_core::catalog::{Catalog, RawCourse};
use recommender_core::storage::InMemoryRatingsStore;
use recommender_core::types::{CourseId, RatingMap, RecommendError, RecommendRequest};

fn raw(title: &str, skills: &str, rate: &str, reviews: &str) -> RawCourse {
    RawCourse {
        title: Some(title.to_string()),
        institution: Some("Online U".to_string()),
        skills: Some(skills.to_string()),
        rate: Some(rate.to_string()),
        reviews: Some(reviews.to_string()),
        ..RawCourse::default()
    }
}

fn sample_catalog() -> Catalog {
    Catalog::from_raw_rows(vec![
        raw("Python for Data Science", "python, pandas", "4.6", "1500"),
        raw("Machine Learning Foundations", "python, statistics", "4.8", "3200"),
        raw("French Cooking", "cuisine, baking", "4.2", "800"),
        raw("Digital Marketing", "seo, branding", "3.9", "650"),
    ])
    .unwrap()
}

#[test]
fn cold_start_with_zero_history_still_returns_ranked_results() {
    let catalog = sample_catalog();
    let store = InMemoryRatingsStore::default();

    let result =
        recommender_core::recommend(&catalog, &store, &RecommendRequest::new("python", 3)).unwrap();

    assert!(!result.items.is_empty());
    assert!(result.items.len() <= 3);
    assert!(!result.meta.collaborative_used);
    // Content still separates the python courses from the rest.
    assert!(result.items[0]
        .course
        .skills
        .contains("python"));
}

#[test]
fn rich_history_engages_the_collaborative_signal() {
    let catalog = sample_catalog();
    let store = InMemoryRatingsStore::from_ratings([
        ("amy", "Python_for_Data_ScieOnline_U", 5.0),
        ("amy", "Machine_Learning_FouOnline_U", 5.0),
        ("ben", "Python_for_Data_ScieOnline_U", 4.0),
        ("ben", "French_CookingOnline_U", 2.0),
        ("cal", "French_CookingOnline_U", 5.0),
        ("cal", "Digital_MarketingOnline_U", 4.0),
        ("dee", "Machine_Learning_FouOnline_U", 4.0),
        ("dee", "Digital_MarketingOnline_U", 2.0),
        ("eve", "Python_for_Data_ScieOnline_U", 5.0),
        ("eve", "French_CookingOnline_U", 3.0),
    ]);

    let result =
        recommender_core::recommend(&catalog, &store, &RecommendRequest::new("python", 4)).unwrap();

    assert!(result.meta.collaborative_used);
    assert_eq!(result.meta.courses_considered, 4);
    for item in &result.items {
        assert!(item.hybrid_score.is_finite());
        assert!((0.0..=1.0).contains(&item.hybrid_score));
    }
}

#[test]
fn session_ratings_are_excluded_from_the_blend() {
    let catalog = sample_catalog();
    let store = InMemoryRatingsStore::default();

    let mut rating_map = RatingMap::new();
    rating_map.insert(CourseId::new("Python_for_Data_ScieOnline_U"), 5.0);

    let request = RecommendRequest::new("python", 10).with_rating_map(rating_map);
    let result = recommender_core::recommend(&catalog, &store, &request).unwrap();

    assert_eq!(result.meta.courses_excluded_as_rated, 1);
    assert!(result
        .items
        .iter()
        .all(|r| r.course.course_id.as_str() != "Python_for_Data_ScieOnline_U"));
}

#[test]
fn empty_subset_surfaces_a_descriptive_condition() {
    let catalog = sample_catalog().subset(|c| c.rate > 4.9);
    let store = InMemoryRatingsStore::default();

    let err = recommender_core::recommend(&catalog, &store, &RecommendRequest::new("python", 3))
        .err()
        .expect("nothing to rank");
    assert!(matches!(err, RecommendError::EmptyCatalog));
}

#[test]
fn zero_top_n_returns_an_empty_list_not_an_error() {
    let catalog = sample_catalog();
    let store = InMemoryRatingsStore::default();

    let result =
        recommender_core::recommend(&catalog, &store, &RecommendRequest::new("python", 0)).unwrap();
    assert!(result.items.is_empty());
    assert_eq!(result.meta.courses_considered, 4);
}

#[test]
fn unknown_user_id_degrades_to_cold_query() {
    let catalog = sample_catalog();
    let store = InMemoryRatingsStore::default();

    let request = RecommendRequest::new("cuisine", 2).with_user_id("nobody");
    let result = recommender_core::recommend(&catalog, &store, &request).unwrap();
    assert_eq!(result.items[0].course.title, "French Cooking");
}
