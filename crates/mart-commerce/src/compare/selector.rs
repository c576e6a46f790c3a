//! The comparison selector: a persisted, observable [`ComparisonSet`].

use super::{ComparisonSet, COMPARE_KEY};
use crate::catalog::Product;
use crate::ids::ProductId;
use crate::CommerceError;
use mart_cache::Cache;
use serde_json::Value;
use tokio::sync::watch;
use tracing::warn;

/// Products picked for side-by-side comparison.
///
/// Every change is written through to the cache under `compareList` before
/// the call returns. Write failures are logged and the in-memory set is
/// kept.
pub struct ComparisonSelector {
    cache: Cache,
    state: watch::Sender<ComparisonSet>,
}

impl ComparisonSelector {
    /// Load any persisted set from `cache`. Unreadable data loads as the
    /// empty set.
    pub fn new(cache: Cache) -> Self {
        let set = load(&cache);
        let (state, _) = watch::channel(set);
        Self { cache, state }
    }

    pub fn snapshot(&self) -> ComparisonSet {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ComparisonSet> {
        self.state.subscribe()
    }

    pub fn contains(&self, id: &ProductId) -> bool {
        self.state.borrow().contains(id)
    }

    pub fn len(&self) -> usize {
        self.state.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.state.borrow().is_full()
    }

    pub fn remaining_slots(&self) -> usize {
        self.state.borrow().remaining_slots()
    }

    /// Add a product. Already present is a no-op; a full set is
    /// [`CommerceError::ComparisonFull`] and leaves the set as it was.
    pub fn add_to_compare(&self, product: Product) -> Result<ComparisonSet, CommerceError> {
        let mut result = Ok(());
        self.state.send_if_modified(|set| match set.try_add(product) {
            Ok(added) => {
                if added {
                    self.persist(set);
                }
                added
            }
            Err(e) => {
                result = Err(e);
                false
            }
        });
        result.map(|()| self.snapshot())
    }

    /// Remove a product if present.
    pub fn remove_from_compare(&self, id: &ProductId) -> ComparisonSet {
        self.state.send_if_modified(|set| {
            let removed = set.remove(id);
            if removed {
                self.persist(set);
            }
            removed
        });
        self.snapshot()
    }

    pub fn clear_compare(&self) -> ComparisonSet {
        self.state.send_if_modified(|set| {
            let had_items = !set.is_empty();
            set.clear();
            self.persist(set);
            had_items
        });
        self.snapshot()
    }

    fn persist(&self, set: &ComparisonSet) {
        if let Err(e) = self.cache.set(COMPARE_KEY, set) {
            warn!(error = %e, "failed to persist comparison list");
        }
    }
}

fn load(cache: &Cache) -> ComparisonSet {
    let stored = match cache.get::<Value>(COMPARE_KEY) {
        Ok(Some(value)) => value,
        Ok(None) => return ComparisonSet::new(),
        Err(e) => {
            warn!(error = %e, "discarding unreadable comparison list");
            return ComparisonSet::new();
        }
    };
    let Value::Array(entries) = stored else {
        warn!("stored comparison list is not a list; starting empty");
        return ComparisonSet::new();
    };
    let products: Vec<Product> = entries
        .into_iter()
        .filter_map(|entry| {
            serde_json::from_value(entry)
                .inspect_err(|e| warn!(error = %e, "skipping unreadable compared product"))
                .ok()
        })
        .collect();
    let (set, dropped) = ComparisonSet::from_products(products);
    if dropped {
        warn!(kept = set.len(), "stored comparison list had duplicates or too many products");
    }
    set
}

impl std::fmt::Debug for ComparisonSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComparisonSelector")
            .field("products", &self.state.borrow().len())
            .finish_non_exhaustive()
    }
}
