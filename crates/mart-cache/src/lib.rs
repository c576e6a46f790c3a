//! Durable local key-value storage for the Mart storefront client.
//!
//! Plays the role browser local storage plays for a web storefront: small
//! JSON documents (the comparison list, recent searches, the access token)
//! that survive restarts but are never correctness-critical.
//!
//! # Example
//!
//! ```rust,ignore
//! use mart_cache::Cache;
//!
//! let cache = Cache::open("/home/me/.local/share/mart")?;
//!
//! // Store a value
//! cache.set("recentSearches", &vec!["rice".to_string()])?;
//!
//! // Retrieve a value
//! let recent: Option<Vec<String>> = cache.get("recentSearches")?;
//!
//! // Delete a value
//! cache.delete("recentSearches")?;
//! ```

mod error;
mod kv;

pub use error::CacheError;
pub use kv::{Cache, FileBackend, KvBackend, MemoryBackend};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, KvBackend};
}
