//! In-process backends.
//!
//! They follow the server's contract (every cart call answers with the whole
//! cart) and count the requests they receive, so tests can assert that a
//! rejected operation never reached the backend.

use super::{AddressBackend, CartBackend, CatalogBackend, OrderBackend};
use crate::cart::{Cart, LineItem};
use crate::catalog::{sort_products, Brand, Category, Page, Product, ProductFilter, ProductQuery};
use crate::checkout::{Address, Order, OrderConfirmation, OrderRequest};
use crate::ids::{AddressId, LineItemId, OrderId, ProductId};
use crate::CommerceError;
use async_trait::async_trait;
use mart_data::FetchError;
use serde_json::json;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn not_found(what: &str) -> CommerceError {
    FetchError::Http {
        status: 404,
        message: format!("{} not found", what),
    }
    .into()
}

/// Request counting and failure injection shared by the memory backends.
#[derive(Debug, Default)]
struct Gate {
    requests: AtomicUsize,
    failing: AtomicBool,
}

impl Gate {
    fn enter(&self) -> Result<(), CommerceError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(FetchError::Connection("backend unavailable".to_string()).into());
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct CartState {
    lines: Vec<LineItem>,
    next_line: u64,
}

/// A server cart held in memory.
#[derive(Debug)]
pub struct MemoryCartBackend {
    catalog: Vec<Product>,
    state: Mutex<CartState>,
    gate: Gate,
}

impl MemoryCartBackend {
    /// A cart backend that knows `catalog`; adding anything else is a 404.
    pub fn new(catalog: Vec<Product>) -> Self {
        Self {
            catalog,
            state: Mutex::new(CartState::default()),
            gate: Gate::default(),
        }
    }

    /// Number of calls received, failed ones included.
    pub fn requests(&self) -> usize {
        self.gate.requests.load(Ordering::SeqCst)
    }

    /// Make every following call fail with a connection error.
    pub fn set_failing(&self, failing: bool) {
        self.gate.failing.store(failing, Ordering::SeqCst);
    }

    fn cart(state: &CartState) -> Cart {
        Cart::with_items(state.lines.clone())
    }
}

#[async_trait]
impl CartBackend for MemoryCartBackend {
    async fn fetch_cart(&self) -> Result<Cart, CommerceError> {
        self.gate.enter()?;
        Ok(Self::cart(&lock(&self.state)))
    }

    async fn add_item(&self, product_id: &ProductId, quantity: u32) -> Result<Cart, CommerceError> {
        self.gate.enter()?;
        let product = self
            .catalog
            .iter()
            .find(|p| &p.id == product_id)
            .ok_or_else(|| not_found("Product"))?;
        let mut state = lock(&self.state);
        match state.lines.iter().position(|l| &l.product.id == product_id) {
            Some(index) => {
                let line = &state.lines[index];
                let merged = LineItem::new(
                    line.id.clone(),
                    product.clone(),
                    line.quantity.saturating_add(quantity),
                );
                state.lines[index] = merged;
            }
            None => {
                state.next_line += 1;
                let id = LineItemId::from(state.next_line);
                state.lines.push(LineItem::new(id, product.clone(), quantity));
            }
        }
        Ok(Self::cart(&state))
    }

    async fn update_item(&self, line_item_id: &LineItemId, quantity: u32) -> Result<Cart, CommerceError> {
        self.gate.enter()?;
        let mut state = lock(&self.state);
        let index = state
            .lines
            .iter()
            .position(|l| &l.id == line_item_id)
            .ok_or_else(|| not_found("Cart item"))?;
        if quantity == 0 {
            state.lines.remove(index);
        } else {
            let line = &state.lines[index];
            let updated = LineItem::new(line.id.clone(), line.product.clone(), quantity);
            state.lines[index] = updated;
        }
        Ok(Self::cart(&state))
    }

    async fn remove_item(&self, line_item_id: &LineItemId) -> Result<Cart, CommerceError> {
        self.gate.enter()?;
        let mut state = lock(&self.state);
        let before = state.lines.len();
        state.lines.retain(|l| &l.id != line_item_id);
        if state.lines.len() == before {
            return Err(not_found("Cart item"));
        }
        Ok(Self::cart(&state))
    }

    async fn clear(&self) -> Result<Cart, CommerceError> {
        self.gate.enter()?;
        let mut state = lock(&self.state);
        state.lines.clear();
        Ok(Self::cart(&state))
    }
}

/// A fixed catalog.
#[derive(Debug, Default)]
pub struct MemoryCatalogBackend {
    products: Vec<Product>,
    categories: Vec<Category>,
    brands: Vec<Brand>,
    gate: Gate,
}

impl MemoryCatalogBackend {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products,
            ..Self::default()
        }
    }

    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_brands(mut self, brands: Vec<Brand>) -> Self {
        self.brands = brands;
        self
    }

    pub fn requests(&self) -> usize {
        self.gate.requests.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.gate.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl CatalogBackend for MemoryCatalogBackend {
    /// Filters like the server does; every match comes back on one page.
    async fn products(&self, query: &ProductQuery) -> Result<Page<Product>, CommerceError> {
        self.gate.enter()?;
        let mut filter = ProductFilter::new();
        if let Some(c) = &query.category {
            filter = filter.with_category(c.clone());
        }
        if let Some(s) = &query.subcategory {
            filter = filter.with_subcategory(s.clone());
        }
        if let Some(q) = &query.search {
            filter = filter.with_text(q.clone());
        }
        let mut matches: Vec<&Product> = filter
            .apply(&self.products)
            .into_iter()
            .filter(|p| match &query.brand {
                Some(brand) => p
                    .brand
                    .as_ref()
                    .and_then(|b| b.id.as_ref())
                    .is_some_and(|id| id == brand),
                None => true,
            })
            .collect();
        sort_products(&mut matches, query.sort);
        let items: Vec<Product> = matches.into_iter().cloned().collect();
        Ok(Page {
            count: items.len() as u64,
            has_next: false,
            has_previous: false,
            items,
        })
    }

    async fn product(&self, id: &ProductId) -> Result<Product, CommerceError> {
        self.gate.enter()?;
        self.products
            .iter()
            .find(|p| &p.id == id)
            .cloned()
            .ok_or_else(|| CommerceError::ProductNotFound(id.to_string()))
    }

    async fn categories(&self) -> Result<Vec<Category>, CommerceError> {
        self.gate.enter()?;
        Ok(self.categories.clone())
    }

    async fn brands(&self) -> Result<Vec<Brand>, CommerceError> {
        self.gate.enter()?;
        Ok(self.brands.clone())
    }
}

/// Records placed orders and serves them back as pending orders.
#[derive(Debug, Default)]
pub struct MemoryOrderBackend {
    placed: Mutex<Vec<(OrderRequest, Order)>>,
    gate: Gate,
}

impl MemoryOrderBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> usize {
        self.gate.requests.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.gate.failing.store(failing, Ordering::SeqCst);
    }

    /// The requests received, oldest first.
    pub fn placed(&self) -> Vec<OrderRequest> {
        lock(&self.placed).iter().map(|(r, _)| r.clone()).collect()
    }
}

#[async_trait]
impl OrderBackend for MemoryOrderBackend {
    async fn place_order(&self, request: &OrderRequest) -> Result<OrderConfirmation, CommerceError> {
        self.gate.enter()?;
        let mut placed = lock(&self.placed);
        let id = placed.len() as u64 + 1;
        let order_number = format!("ORD-{:04}", id);
        let mut body = serde_json::to_value(request)?;
        body["id"] = json!(id);
        body["order_number"] = json!(order_number);
        body["status"] = json!("pending");
        body["payment_status"] = json!("Pending");
        let order = Order::from_value(&body)?;
        placed.push((request.clone(), order));
        Ok(OrderConfirmation {
            id: OrderId::from(id),
            order_number: Some(order_number),
        })
    }

    async fn orders(&self) -> Result<Vec<Order>, CommerceError> {
        self.gate.enter()?;
        // Newest first, like the server.
        Ok(lock(&self.placed).iter().rev().map(|(_, o)| o.clone()).collect())
    }

    async fn order(&self, id: &OrderId) -> Result<Order, CommerceError> {
        self.gate.enter()?;
        lock(&self.placed)
            .iter()
            .map(|(_, o)| o)
            .find(|o| &o.id == id)
            .cloned()
            .ok_or_else(|| not_found("Order"))
    }
}

/// Saved addresses held in memory.
#[derive(Debug, Default)]
pub struct MemoryAddressBackend {
    addresses: Mutex<Vec<Address>>,
    gate: Gate,
}

impl MemoryAddressBackend {
    pub fn new(addresses: Vec<Address>) -> Self {
        Self {
            addresses: Mutex::new(addresses),
            gate: Gate::default(),
        }
    }

    pub fn requests(&self) -> usize {
        self.gate.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AddressBackend for MemoryAddressBackend {
    async fn addresses(&self) -> Result<Vec<Address>, CommerceError> {
        self.gate.enter()?;
        Ok(lock(&self.addresses).clone())
    }

    async fn add_address(&self, address: &Address) -> Result<Address, CommerceError> {
        self.gate.enter()?;
        let mut addresses = lock(&self.addresses);
        let mut saved = address.clone();
        saved.id = Some(AddressId::from(addresses.len() as u64 + 1));
        if saved.is_default {
            for a in addresses.iter_mut() {
                a.is_default = false;
            }
        }
        addresses.push(saved.clone());
        Ok(saved)
    }
}
