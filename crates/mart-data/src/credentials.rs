//! Bearer credential storage.

use mart_cache::Cache;
use std::sync::{Arc, RwLock};
use tracing::warn;

/// Local storage key the access token is persisted under.
pub const TOKEN_KEY: &str = "access_token";

/// The bearer token attached to authenticated requests.
///
/// Clones share the same token, so invalidating it after a 401 is seen by
/// every holder. When backed by a [`Cache`], changes are persisted
/// best-effort.
#[derive(Clone, Default)]
pub struct Credentials {
    token: Arc<RwLock<Option<String>>>,
    cache: Option<Cache>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("authenticated", &self.is_authenticated())
            .field("persistent", &self.cache.is_some())
            .finish()
    }
}

impl Credentials {
    /// Credentials with no token and no persistence.
    pub fn new() -> Self {
        Self::default()
    }

    /// In-memory credentials holding `token`.
    pub fn with_token(token: impl Into<String>) -> Self {
        let creds = Self::new();
        creds.store(Some(token.into()));
        creds
    }

    /// Credentials persisted in `cache`, loading any previously stored token.
    pub fn persistent(cache: Cache) -> Self {
        let token = match cache.get::<String>(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!(error = %e, "discarding unreadable stored access token");
                None
            }
        };
        Self {
            token: Arc::new(RwLock::new(token)),
            cache: Some(cache),
        }
    }

    /// Current token, if any.
    pub fn token(&self) -> Option<String> {
        match self.token.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Whether a token is present.
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Replace the token and persist it.
    pub fn set(&self, token: impl Into<String>) {
        let token = token.into();
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.set(TOKEN_KEY, &token) {
                warn!(error = %e, "failed to persist access token");
            }
        }
        self.store(Some(token));
    }

    /// Drop the token (session teardown).
    pub fn clear(&self) {
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.delete(TOKEN_KEY) {
                warn!(error = %e, "failed to remove persisted access token");
            }
        }
        self.store(None);
    }

    fn store(&self, value: Option<String>) {
        match self.token.write() {
            Ok(mut guard) => *guard = value,
            Err(poisoned) => *poisoned.into_inner() = value,
        }
    }
}
