//! Recent search terms, persisted across sessions.

use mart_cache::Cache;
use tracing::warn;

/// Cache key the terms are persisted under.
pub const RECENT_SEARCHES_KEY: &str = "recentSearches";

/// How many terms are remembered.
pub const MAX_RECENT_SEARCHES: usize = 5;

/// Most-recent-first list of distinct search terms.
#[derive(Debug, Clone)]
pub struct RecentSearches {
    cache: Cache,
    terms: Vec<String>,
}

impl RecentSearches {
    /// Load the stored terms. Unreadable data loads as empty.
    pub fn load(cache: Cache) -> Self {
        let terms = match cache.get::<Vec<String>>(RECENT_SEARCHES_KEY) {
            Ok(terms) => terms.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "discarding unreadable recent searches");
                Vec::new()
            }
        };
        let mut recent = Self {
            cache,
            terms: Vec::new(),
        };
        // Oldest first so the newest ends up at the front.
        for term in terms.iter().rev() {
            recent.push_front(term);
        }
        recent
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Remember `term`. Blank terms are ignored; a repeated term moves to
    /// the front.
    pub fn record(&mut self, term: &str) {
        if self.push_front(term) {
            if let Err(e) = self.cache.set(RECENT_SEARCHES_KEY, &self.terms) {
                warn!(error = %e, "failed to persist recent searches");
            }
        }
    }

    pub fn clear(&mut self) {
        self.terms.clear();
        if let Err(e) = self.cache.delete(RECENT_SEARCHES_KEY) {
            warn!(error = %e, "failed to clear recent searches");
        }
    }

    fn push_front(&mut self, term: &str) -> bool {
        let term = term.trim();
        if term.is_empty() {
            return false;
        }
        self.terms.retain(|t| t != term);
        self.terms.insert(0, term.to_string());
        self.terms.truncate(MAX_RECENT_SEARCHES);
        true
    }
}
