//! Storefront state for the Mart wholesale marketplace.
//!
//! This crate holds the client-side state a buyer works with:
//!
//! - **Cart**: the server-synchronized [`CartStore`](cart::CartStore), MOQ
//!   quantity arithmetic and the [pricing calculator](cart::PricingPolicy)
//! - **Compare**: the persisted [`ComparisonSelector`](compare::ComparisonSelector)
//! - **Catalog**: normalized products, categories and brands, filtering
//! - **Checkout**: delivery and payment choices, order placement and tracking
//! - **Search**: suggestions and recent searches
//!
//! Stores talk to the backend through the traits in [`api`]; [`api::ApiClient`]
//! implements them over HTTP.
//!
//! # Example
//!
//! ```rust,ignore
//! use mart_commerce::prelude::*;
//! use std::sync::Arc;
//!
//! let api = Arc::new(ApiClient::from_config(&ApiConfig::new(base_url), credentials)?);
//! let cart = CartStore::new(api.clone());
//! cart.fetch_cart().await;
//!
//! let product = CatalogService::new(api.clone()).product(&ProductId::from(7u64)).await?;
//! cart.increment(&product).await?;
//!
//! let pricing = cart.pricing(DeliveryOption::Standard);
//! println!("Total: {}", pricing.rounded().total.display());
//! ```

pub mod api;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod compare;
pub mod error;
pub mod ids;
pub mod money;
pub mod search;

pub use error::{CommerceError, ValidationError};
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{CommerceError, ValidationError};
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Backends
    pub use crate::api::{
        AddressBackend, ApiClient, ApiConfig, CartBackend, CatalogBackend, OrderBackend,
    };

    // Catalog
    pub use crate::catalog::{
        Brand, CatalogService, Category, Page, Product, ProductFilter, ProductQuery, SortOrder,
        StockStatus,
    };

    // Cart
    pub use crate::cart::{Cart, CartStore, LineItem, PricingBreakdown, PricingPolicy};

    // Compare
    pub use crate::compare::{ComparisonSelector, ComparisonSet, MAX_COMPARE};

    // Checkout
    pub use crate::checkout::{
        Address, AddressService, CheckoutDraft, CheckoutStep, DeliveryOption, Order,
        OrderConfirmation, OrderService, OrderStatus, PaymentMethod,
    };

    // Search
    pub use crate::search::{suggest, RecentSearches};
}
