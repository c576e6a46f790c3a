//! Commerce error types.

use mart_cache::CacheError;
use mart_data::FetchError;
use thiserror::Error;

/// Errors that can occur in storefront operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// The backend call failed (network, timeout or non-success status).
    #[error("Backend request failed: {0}")]
    Backend(FetchError),

    /// The backend rejected the credential; the session has been cleared.
    #[error("Not authorized (HTTP {status}); please log in again")]
    Unauthorized { status: u16 },

    /// Input rejected before any backend call.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The comparison set already holds its maximum number of products.
    #[error("Comparison list is full ({max} products); remove one first")]
    ComparisonFull { max: usize },

    /// The backend answered with a body we could not make sense of.
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),

    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Item not in cart.
    #[error("Item not in cart: {0}")]
    ItemNotInCart(String),

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Local storage error.
    #[error("Storage error: {0}")]
    Storage(#[from] CacheError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CommerceError {
    /// Timeouts and connection failures.
    pub fn is_transient(&self) -> bool {
        matches!(self, CommerceError::Backend(e) if e.is_transient())
    }

    /// Errors raised locally before anything was sent.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CommerceError::Validation(_) | CommerceError::ComparisonFull { .. }
        )
    }
}

impl From<FetchError> for CommerceError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::Unauthorized { status } => CommerceError::Unauthorized { status },
            other => CommerceError::Backend(other),
        }
    }
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::Serialization(e.to_string())
    }
}

/// Checkout and input validation failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Your cart is empty")]
    EmptyCart,

    #[error("Please select a payment method")]
    MissingPaymentMethod,

    #[error("Please select a delivery address")]
    MissingAddress,

    #[error("Please choose a date for scheduled delivery")]
    MissingScheduledDate,

    #[error("Scheduled delivery date {0} is in the past")]
    ScheduledDateInPast(chrono::NaiveDate),

    #[error("Quantity {quantity} is not a multiple of the minimum order quantity {moq}")]
    InvalidQuantity { quantity: u32, moq: u32 },

    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("Unknown {kind}: {value}")]
    UnknownOption { kind: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_fetch_error_maps_to_unauthorized() {
        let err: CommerceError = FetchError::Unauthorized { status: 401 }.into();
        assert!(matches!(err, CommerceError::Unauthorized { status: 401 }));
    }

    #[test]
    fn test_transient_classification() {
        let err: CommerceError = FetchError::Timeout.into();
        assert!(err.is_transient());
        let err: CommerceError = FetchError::Http {
            status: 500,
            message: "boom".to_string(),
        }
        .into();
        assert!(!err.is_transient());
    }

    #[test]
    fn test_validation_classification() {
        let err: CommerceError = ValidationError::EmptyCart.into();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Your cart is empty");
        assert!(CommerceError::ComparisonFull { max: 4 }.is_validation());
    }
}
