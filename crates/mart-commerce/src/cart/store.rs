//! The cart store: local cart state synchronized with the backend cart.
//!
//! Every operation round-trips to the backend and replaces the local cart
//! with the server's response. Nothing is merged optimistically.
//!
//! Each request takes a sequence token when it is dispatched. A response is
//! applied only if its token is newer than the last applied one, so a slow
//! response can never overwrite the result of a later request.

use super::{pricing, quantity, Cart, PricingBreakdown};
use crate::api::CartBackend;
use crate::catalog::Product;
use crate::checkout::DeliveryOption;
use crate::ids::{LineItemId, ProductId};
use crate::CommerceError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Shared cart state. Construct one per session and share it via `Arc`.
pub struct CartStore {
    backend: Arc<dyn CartBackend>,
    state: watch::Sender<Cart>,
    dispatched: AtomicU64,
    applied: AtomicU64,
}

impl CartStore {
    /// Create a store holding the empty cart. Call [`fetch_cart`](Self::fetch_cart)
    /// to load the server's cart.
    pub fn new(backend: Arc<dyn CartBackend>) -> Self {
        let (state, _) = watch::channel(Cart::empty());
        Self {
            backend,
            state,
            dispatched: AtomicU64::new(0),
            applied: AtomicU64::new(0),
        }
    }

    /// The cart as last applied.
    pub fn snapshot(&self) -> Cart {
        self.state.borrow().clone()
    }

    /// Observe cart changes. The receiver starts at the current cart.
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.state.subscribe()
    }

    /// Price the current cart.
    pub fn pricing(&self, delivery: DeliveryOption) -> PricingBreakdown {
        pricing::calculate(&self.state.borrow(), delivery)
    }

    /// Load the server's cart.
    ///
    /// Never fails: any error (timeout, network, auth) leaves the store
    /// holding the empty cart and is logged.
    pub async fn fetch_cart(&self) -> Cart {
        let token = self.next_token();
        let cart = match self.backend.fetch_cart().await {
            Ok(cart) => cart,
            Err(e) => {
                warn!(error = %e, "failed to fetch cart; using empty cart");
                Cart::empty()
            }
        };
        self.apply(token, cart);
        self.snapshot()
    }

    /// Add `quantity` of a product. The caller normalizes `quantity` to a
    /// multiple of the product's MOQ.
    pub async fn add_to_cart(
        &self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<Cart, CommerceError> {
        let token = self.next_token();
        let cart = self
            .backend
            .add_item(product_id, quantity)
            .await
            .inspect_err(|e| warn!(error = %e, product = %product_id, "add to cart failed"))?;
        self.apply(token, cart);
        Ok(self.snapshot())
    }

    /// Set a line's quantity (absolute, not a delta).
    pub async fn update_quantity(
        &self,
        line_item_id: &LineItemId,
        quantity: u32,
    ) -> Result<Cart, CommerceError> {
        let token = self.next_token();
        let cart = self
            .backend
            .update_item(line_item_id, quantity)
            .await
            .inspect_err(|e| warn!(error = %e, line = %line_item_id, "cart update failed"))?;
        self.apply(token, cart);
        Ok(self.snapshot())
    }

    pub async fn remove_from_cart(&self, line_item_id: &LineItemId) -> Result<Cart, CommerceError> {
        let token = self.next_token();
        let cart = self
            .backend
            .remove_item(line_item_id)
            .await
            .inspect_err(|e| warn!(error = %e, line = %line_item_id, "cart remove failed"))?;
        self.apply(token, cart);
        Ok(self.snapshot())
    }

    pub async fn clear_cart(&self) -> Result<Cart, CommerceError> {
        let token = self.next_token();
        let cart = self
            .backend
            .clear()
            .await
            .inspect_err(|e| warn!(error = %e, "cart clear failed"))?;
        self.apply(token, cart);
        Ok(self.snapshot())
    }

    /// Add one MOQ step of `product`, creating the line if needed.
    pub async fn increment(&self, product: &Product) -> Result<Cart, CommerceError> {
        let line = self
            .snapshot()
            .find_by_product(&product.id)
            .map(|l| (l.id.clone(), l.quantity));
        match line {
            Some((line_id, current)) => {
                self.update_quantity(&line_id, quantity::step_up(current, product.moq))
                    .await
            }
            None => self.add_to_cart(&product.id, product.moq.max(1)).await,
        }
    }

    /// Remove one MOQ step of a product; drops the line when it would go
    /// below the MOQ. A product not in the cart is a no-op.
    pub async fn decrement(&self, product_id: &ProductId) -> Result<Cart, CommerceError> {
        let cart = self.snapshot();
        let Some(line) = cart.find_by_product(product_id) else {
            return Ok(self.snapshot());
        };
        match quantity::step_down(line.quantity, line.product.moq) {
            Some(q) => self.update_quantity(&line.id, q).await,
            None => self.remove_from_cart(&line.id).await,
        }
    }

    /// Put `requested` units of `product` in the cart, rounded up to its
    /// MOQ grid. Updates the existing line if there is one.
    pub async fn set_product_quantity(
        &self,
        product: &Product,
        requested: u32,
    ) -> Result<Cart, CommerceError> {
        let q = quantity::normalize_quantity(requested, product.moq);
        let line_id = self
            .snapshot()
            .find_by_product(&product.id)
            .map(|l| l.id.clone());
        match line_id {
            Some(id) => self.update_quantity(&id, q).await,
            None => self.add_to_cart(&product.id, q).await,
        }
    }

    fn next_token(&self) -> u64 {
        self.dispatched.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Apply `cart` if `token` is newer than the last applied token.
    fn apply(&self, token: u64, cart: Cart) -> bool {
        let applied = &self.applied;
        let fresh = self.state.send_if_modified(|current| {
            // Runs under the channel's write lock, so check-and-set is atomic.
            if token <= applied.load(Ordering::SeqCst) {
                return false;
            }
            applied.store(token, Ordering::SeqCst);
            *current = cart;
            true
        });
        if !fresh {
            debug!(token, "discarding stale cart response");
        }
        fresh
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("items", &self.state.borrow().items.len())
            .field("applied", &self.applied.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}
