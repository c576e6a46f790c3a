//! Product comparison.
//!
//! A buyer can put up to four distinct products side by side. The selection
//! survives restarts through the local cache.

mod selector;
mod set;

pub use selector::ComparisonSelector;
pub use set::{ComparisonRow, ComparisonSet};

/// Most products that can be compared at once.
pub const MAX_COMPARE: usize = 4;

/// Cache key the selection is persisted under.
pub const COMPARE_KEY: &str = "compareList";
