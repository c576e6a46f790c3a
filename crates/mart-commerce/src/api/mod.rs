//! Backend seams.
//!
//! The stores and services talk to the storefront API through these traits.
//! [`ApiClient`] implements all of them over HTTP; the [`memory`] backends
//! implement them in-process.

mod client;
pub mod memory;

pub use client::{ApiClient, ApiConfig};

use crate::cart::Cart;
use crate::catalog::{Brand, Category, Page, Product, ProductQuery};
use crate::checkout::{Address, Order, OrderConfirmation, OrderRequest};
use crate::ids::{LineItemId, OrderId, ProductId};
use crate::CommerceError;
use async_trait::async_trait;

/// The server-side cart. Every call returns the cart as the server holds
/// it after the call.
#[async_trait]
pub trait CartBackend: Send + Sync {
    async fn fetch_cart(&self) -> Result<Cart, CommerceError>;

    async fn add_item(&self, product_id: &ProductId, quantity: u32) -> Result<Cart, CommerceError>;

    /// Set a line's quantity (absolute).
    async fn update_item(&self, line_item_id: &LineItemId, quantity: u32) -> Result<Cart, CommerceError>;

    async fn remove_item(&self, line_item_id: &LineItemId) -> Result<Cart, CommerceError>;

    async fn clear(&self) -> Result<Cart, CommerceError>;
}

/// Read-only catalog.
#[async_trait]
pub trait CatalogBackend: Send + Sync {
    async fn products(&self, query: &ProductQuery) -> Result<Page<Product>, CommerceError>;

    async fn product(&self, id: &ProductId) -> Result<Product, CommerceError>;

    async fn categories(&self) -> Result<Vec<Category>, CommerceError>;

    async fn brands(&self) -> Result<Vec<Brand>, CommerceError>;
}

#[async_trait]
pub trait OrderBackend: Send + Sync {
    async fn place_order(&self, request: &OrderRequest) -> Result<OrderConfirmation, CommerceError>;

    async fn orders(&self) -> Result<Vec<Order>, CommerceError>;

    async fn order(&self, id: &OrderId) -> Result<Order, CommerceError>;
}

/// The signed-in buyer's saved addresses.
#[async_trait]
pub trait AddressBackend: Send + Sync {
    async fn addresses(&self) -> Result<Vec<Address>, CommerceError>;

    async fn add_address(&self, address: &Address) -> Result<Address, CommerceError>;
}
