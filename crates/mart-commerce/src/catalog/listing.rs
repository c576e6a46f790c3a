//! List responses and pagination.

use serde::{Deserialize, Serialize};

/// A list endpoint's body: either a bare array or a DRF-style page.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Items(Vec<T>),
    Page {
        #[serde(default)]
        count: Option<u64>,
        #[serde(default)]
        next: Option<String>,
        #[serde(default)]
        previous: Option<String>,
        results: Vec<T>,
    },
}

impl<T> Listing<T> {
    /// Flatten into a [`Page`], mapping each item.
    ///
    /// Items for which `f` returns `None` are dropped from the page and from
    /// the reported total when the total came from the array itself.
    pub fn into_page<U>(self, mut f: impl FnMut(T) -> Option<U>) -> Page<U> {
        match self {
            Listing::Items(items) => {
                let items: Vec<U> = items.into_iter().filter_map(&mut f).collect();
                Page {
                    count: items.len() as u64,
                    has_next: false,
                    has_previous: false,
                    items,
                }
            }
            Listing::Page {
                count,
                next,
                previous,
                results,
            } => {
                let items: Vec<U> = results.into_iter().filter_map(&mut f).collect();
                Page {
                    count: count.unwrap_or(items.len() as u64),
                    has_next: next.is_some(),
                    has_previous: previous.is_some(),
                    items,
                }
            }
        }
    }
}

/// One page of normalized results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Total across all pages, as reported by the backend.
    pub count: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            count: 0,
            has_next: false,
            has_previous: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_array() {
        let listing: Listing<u32> = serde_json::from_value(json!([1, 2, 3])).unwrap();
        let page = listing.into_page(Some);
        assert_eq!(page.items, vec![1, 2, 3]);
        assert_eq!(page.count, 3);
        assert!(!page.has_next);
    }

    #[test]
    fn test_paginated_object() {
        let listing: Listing<u32> = serde_json::from_value(json!({
            "count": 40,
            "next": "https://api/products/?page=2",
            "previous": null,
            "results": [1, 2]
        }))
        .unwrap();
        let page = listing.into_page(Some);
        assert_eq!(page.items, vec![1, 2]);
        assert_eq!(page.count, 40);
        assert!(page.has_next);
        assert!(!page.has_previous);
    }

    #[test]
    fn test_filtered_items_dropped() {
        let listing: Listing<i32> = serde_json::from_value(json!([1, -1, 2])).unwrap();
        let page = listing.into_page(|n| (n > 0).then_some(n));
        assert_eq!(page.items, vec![1, 2]);
        assert_eq!(page.count, 2);
    }

    #[test]
    fn test_other_shapes_rejected() {
        assert!(serde_json::from_value::<Listing<u32>>(json!({"detail": "nope"})).is_err());
    }
}
