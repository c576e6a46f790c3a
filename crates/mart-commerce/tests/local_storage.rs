//! Comparison list and recent searches on a file-backed cache.

use mart_cache::Cache;
use mart_commerce::compare::COMPARE_KEY;
use mart_commerce::prelude::*;
use mart_commerce::search::RECENT_SEARCHES_KEY;
use rust_decimal::Decimal;

fn product(id: u64) -> Product {
    Product::new(id, format!("Product {}", id), format!("SKU-{}", id), Money::inr(Decimal::from(id * 10)))
}

#[test]
fn comparison_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    let selector = ComparisonSelector::new(Cache::open(dir.path()).unwrap());
    for id in 1..=4 {
        selector.add_to_compare(product(id)).unwrap();
    }
    assert!(matches!(
        selector.add_to_compare(product(5)),
        Err(CommerceError::ComparisonFull { max: MAX_COMPARE })
    ));
    selector.remove_from_compare(&ProductId::from(2u64));
    drop(selector);

    let reopened = ComparisonSelector::new(Cache::open(dir.path()).unwrap());
    let snapshot = reopened.snapshot();
    let ids: Vec<&str> = snapshot.ids().map(|id| id.as_str()).collect();
    assert_eq!(ids, vec!["1", "3", "4"]);
}

#[test]
fn hand_edited_comparison_file_is_tolerated() {
    let dir = tempfile::tempdir().unwrap();
    let cache = Cache::open(dir.path()).unwrap();
    cache.set(COMPARE_KEY, &serde_json::json!({"oops": []})).unwrap();

    let selector = ComparisonSelector::new(cache.clone());
    assert!(selector.is_empty());

    // The next change rewrites a well-formed list.
    selector.add_to_compare(product(9)).unwrap();
    let stored: Vec<Product> = cache.get(COMPARE_KEY).unwrap().unwrap();
    assert_eq!(stored.len(), 1);
}

#[test]
fn recent_searches_survive_restart() {
    let dir = tempfile::tempdir().unwrap();

    let mut recent = RecentSearches::load(Cache::open(dir.path()).unwrap());
    for term in ["rice", "atta", "rice", "sugar", "dal", "ghee", "oil"] {
        recent.record(term);
    }
    assert_eq!(recent.terms().len(), 5);

    let cache = Cache::open(dir.path()).unwrap();
    let stored: Vec<String> = cache.get(RECENT_SEARCHES_KEY).unwrap().unwrap();
    assert_eq!(stored, vec!["oil", "ghee", "dal", "sugar", "rice"]);
    assert_eq!(RecentSearches::load(cache).terms(), stored.as_slice());
}
