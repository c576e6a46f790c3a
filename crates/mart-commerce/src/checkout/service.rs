//! Placing and tracking orders.

use super::{Address, CheckoutDraft, Order, OrderConfirmation};
use crate::api::{AddressBackend, OrderBackend};
use crate::cart::{CartStore, PricingPolicy};
use crate::ids::OrderId;
use crate::CommerceError;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{info, warn};

/// Order placement and history.
#[derive(Clone)]
pub struct OrderService {
    backend: Arc<dyn OrderBackend>,
    policy: PricingPolicy,
}

impl OrderService {
    pub fn new(backend: Arc<dyn OrderBackend>) -> Self {
        Self {
            backend,
            policy: PricingPolicy::standard(),
        }
    }

    pub fn with_policy(mut self, policy: PricingPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Place an order for the current cart.
    ///
    /// The draft is validated against the cart snapshot before anything is
    /// sent. After the backend accepts the order the cart is cleared; a
    /// failure to clear is logged only, since the order already exists.
    pub async fn place_order(
        &self,
        draft: &CheckoutDraft,
        cart_store: &CartStore,
        today: NaiveDate,
    ) -> Result<OrderConfirmation, CommerceError> {
        let cart = cart_store.snapshot();
        let checkout = draft.validate(&cart, today)?;
        let (request, pricing) = checkout.order_request(&cart, &self.policy);

        let confirmation = self.backend.place_order(&request).await?;
        info!(
            order = %confirmation.id,
            number = %confirmation.display_number(),
            total = %pricing.rounded().total.display(),
            items = request.items.len(),
            "order placed"
        );

        if let Err(e) = cart_store.clear_cart().await {
            warn!(error = %e, order = %confirmation.id, "order placed but cart could not be cleared");
        }
        Ok(confirmation)
    }

    /// The buyer's orders, newest first.
    pub async fn list_orders(&self) -> Result<Vec<Order>, CommerceError> {
        self.backend.orders().await
    }

    pub async fn get_order(&self, id: &OrderId) -> Result<Order, CommerceError> {
        self.backend.order(id).await
    }
}

/// Saved delivery addresses.
#[derive(Clone)]
pub struct AddressService {
    backend: Arc<dyn AddressBackend>,
}

impl AddressService {
    pub fn new(backend: Arc<dyn AddressBackend>) -> Self {
        Self { backend }
    }

    pub async fn list(&self) -> Result<Vec<Address>, CommerceError> {
        self.backend.addresses().await
    }

    /// The buyer's default address, else the first one.
    pub async fn default_address(&self) -> Result<Option<Address>, CommerceError> {
        let addresses = self.list().await?;
        let default = addresses.iter().position(|a| a.is_default).unwrap_or(0);
        Ok(addresses.into_iter().nth(default))
    }

    /// Save a new address. Incomplete addresses are rejected locally.
    pub async fn add(&self, address: &Address) -> Result<Address, CommerceError> {
        address.validate()?;
        self.backend.add_address(address).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::memory::{MemoryAddressBackend, MemoryCartBackend, MemoryOrderBackend};
    use crate::catalog::Product;
    use crate::checkout::{DeliveryOption, OrderStatus, PaymentMethod};
    use crate::money::Money;
    use crate::ValidationError;
    use rust_decimal::Decimal;

    fn rice() -> Product {
        Product::new("1", "Rice", "RICE", Money::inr(Decimal::from(2_000))).with_moq(6)
    }

    fn address() -> Address {
        Address::new("Main Warehouse", "123 Industrial Area", "Mumbai", "Maharashtra", "400001")
            .with_phone("9800000000")
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn setup() -> (Arc<MemoryCartBackend>, CartStore, Arc<MemoryOrderBackend>, OrderService) {
        let carts = Arc::new(MemoryCartBackend::new(vec![rice()]));
        let orders = Arc::new(MemoryOrderBackend::new());
        let store = CartStore::new(carts.clone());
        let service = OrderService::new(orders.clone());
        (carts, store, orders, service)
    }

    #[tokio::test]
    async fn test_place_order_sends_priced_request_and_clears_cart() {
        let (_, store, orders, service) = setup();
        store.increment(&rice()).await.unwrap();
        let draft = CheckoutDraft::new()
            .with_payment_method(PaymentMethod::CreditTerms)
            .with_address(address());

        let confirmation = service.place_order(&draft, &store, today()).await.unwrap();
        assert_eq!(confirmation.display_number(), "ORD-0001");
        assert!(store.snapshot().is_empty());

        let placed = orders.placed();
        assert_eq!(placed.len(), 1);
        // 6 x 2000 = 12000: 10% off, GST on 10800, free delivery.
        assert_eq!(placed[0].subtotal, Decimal::new(1_200_000, 2));
        assert_eq!(placed[0].total, Decimal::new(1_274_400, 2));
        assert_eq!(placed[0].delivery_charges, Decimal::ZERO);

        let tracked = service.get_order(&confirmation.id).await.unwrap();
        assert_eq!(tracked.status, OrderStatus::Pending);
        assert_eq!(service.list_orders().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_draft_never_reaches_backend() {
        let (_, store, orders, service) = setup();
        store.increment(&rice()).await.unwrap();
        let draft = CheckoutDraft::new()
            .with_address(address())
            .with_delivery(DeliveryOption::Scheduled)
            .with_payment_method(PaymentMethod::Upi);

        let err = service.place_order(&draft, &store, today()).await.unwrap_err();
        assert!(matches!(
            err,
            CommerceError::Validation(ValidationError::MissingScheduledDate)
        ));
        assert_eq!(orders.requests(), 0);
        assert!(!store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_failed_clear_still_returns_confirmation() {
        let (carts, store, orders, service) = setup();
        store.increment(&rice()).await.unwrap();
        carts.set_failing(true);
        let draft = CheckoutDraft::new()
            .with_payment_method(PaymentMethod::Advance)
            .with_address(address());
        assert!(service.place_order(&draft, &store, today()).await.is_ok());
        assert_eq!(orders.placed().len(), 1);
    }

    #[tokio::test]
    async fn test_addresses() {
        let service = AddressService::new(Arc::new(MemoryAddressBackend::new(vec![])));
        assert!(service.default_address().await.unwrap().is_none());

        let incomplete = Address::new("Depot", "", "Pune", "Maharashtra", "411001");
        assert!(service.add(&incomplete).await.unwrap_err().is_validation());

        service.add(&address()).await.unwrap();
        let default = service.default_address().await.unwrap().unwrap();
        assert_eq!(default.name, "Main Warehouse");
    }
}
