//! Search module.
//!
//! Type-ahead suggestions over a loaded catalog and the buyer's recent
//! search terms. Full-text search itself is the backend's `search` filter
//! (see [`ProductQuery::with_search`](crate::catalog::ProductQuery::with_search)).

mod recent;
mod suggest;

pub use recent::{RecentSearches, MAX_RECENT_SEARCHES, RECENT_SEARCHES_KEY};
pub use suggest::{suggest, DEFAULT_SUGGESTION_LIMIT};
