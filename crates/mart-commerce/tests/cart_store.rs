//! Cart store behavior against in-memory and scripted backends.

use async_trait::async_trait;
use mart_commerce::api::memory::MemoryCartBackend;
use mart_commerce::api::CartBackend;
use mart_commerce::prelude::*;
use rust_decimal::Decimal;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

fn rice() -> Product {
    Product::new(1u64, "Basmati Rice", "RICE-01", Money::inr(Decimal::from(100))).with_moq(6)
}

fn cart_with(quantity: u32) -> Cart {
    Cart::with_items(vec![LineItem::new(10u64, rice(), quantity)])
}

/// Answers each call with a scripted cart once its gate is released.
struct Scripted {
    script: Mutex<VecDeque<(oneshot::Receiver<()>, Cart)>>,
    calls: AtomicUsize,
}

impl Scripted {
    fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Queue a response; the returned sender releases it.
    fn push(&self, cart: Cart) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.script.lock().unwrap().push_back((rx, cart));
        tx
    }

    async fn answer(&self) -> Result<Cart, CommerceError> {
        let (gate, cart) = self.script.lock().unwrap().pop_front().expect("unscripted call");
        self.calls.fetch_add(1, Ordering::SeqCst);
        gate.await.ok();
        Ok(cart)
    }

    async fn wait_for_calls(&self, n: usize) {
        while self.calls.load(Ordering::SeqCst) < n {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl CartBackend for Scripted {
    async fn fetch_cart(&self) -> Result<Cart, CommerceError> {
        self.answer().await
    }

    async fn add_item(&self, _: &ProductId, _: u32) -> Result<Cart, CommerceError> {
        self.answer().await
    }

    async fn update_item(&self, _: &LineItemId, _: u32) -> Result<Cart, CommerceError> {
        self.answer().await
    }

    async fn remove_item(&self, _: &LineItemId) -> Result<Cart, CommerceError> {
        self.answer().await
    }

    async fn clear(&self) -> Result<Cart, CommerceError> {
        self.answer().await
    }
}

#[tokio::test]
async fn late_response_never_overwrites_newer_state() {
    let backend = Arc::new(Scripted::new());
    let store = Arc::new(CartStore::new(backend.clone()));

    let release_slow = backend.push(cart_with(6));
    let release_fast = backend.push(cart_with(18));

    let slow = tokio::spawn({
        let store = store.clone();
        async move { store.fetch_cart().await }
    });
    backend.wait_for_calls(1).await;
    let fast = tokio::spawn({
        let store = store.clone();
        async move { store.update_quantity(&LineItemId::from(10u64), 18).await }
    });
    backend.wait_for_calls(2).await;

    // The later request answers first.
    release_fast.send(()).unwrap();
    fast.await.unwrap().unwrap();
    assert_eq!(store.snapshot().total_items, 18);

    release_slow.send(()).unwrap();
    slow.await.unwrap();
    assert_eq!(store.snapshot().total_items, 18);
}

#[tokio::test]
async fn failed_mutation_leaves_cart_untouched() {
    let backend = Arc::new(MemoryCartBackend::new(vec![rice()]));
    let store = CartStore::new(backend.clone());
    store.increment(&rice()).await.unwrap();
    let before = store.snapshot();

    let mut rx = store.subscribe();
    let _ = rx.borrow_and_update();

    backend.set_failing(true);
    let err = store.increment(&rice()).await.unwrap_err();
    assert!(err.is_transient());
    assert_eq!(store.snapshot(), before);
    assert!(!rx.has_changed().unwrap());
}

#[tokio::test]
async fn failed_fetch_falls_back_to_empty_cart() {
    let backend = Arc::new(MemoryCartBackend::new(vec![rice()]));
    let store = CartStore::new(backend.clone());
    store.increment(&rice()).await.unwrap();

    backend.set_failing(true);
    let cart = store.fetch_cart().await;
    assert!(cart.is_empty());
    assert!(store.snapshot().is_empty());
}

#[tokio::test]
async fn every_view_sees_the_same_cart() {
    let backend = Arc::new(MemoryCartBackend::new(vec![rice()]));
    let store = CartStore::new(backend);
    let header = store.subscribe();
    let cart_page = store.subscribe();

    store.set_product_quantity(&rice(), 10).await.unwrap();

    assert_eq!(header.borrow().total_items, 12);
    assert_eq!(*header.borrow(), *cart_page.borrow());

    let pricing = store.pricing(DeliveryOption::Express);
    assert_eq!(pricing.subtotal.amount, Decimal::from(1_200));
    assert_eq!(pricing.delivery_charge.amount, Decimal::from(150));
}

#[tokio::test]
async fn add_then_remove_restores_item_count() {
    let dal = Product::new(2u64, "Toor Dal", "DAL-01", Money::inr(Decimal::from(90))).with_moq(12);
    let backend = Arc::new(MemoryCartBackend::new(vec![rice(), dal.clone()]));
    let store = CartStore::new(backend);

    for prior in [0, 12] {
        if prior > 0 {
            store.add_to_cart(&dal.id, prior).await.unwrap();
        }
        let before = store.snapshot().item_count();
        assert_eq!(before, prior);

        let cart = store.add_to_cart(&rice().id, 6).await.unwrap();
        assert_eq!(cart.item_count(), before + 6);

        let line = cart.find_by_product(&rice().id).unwrap().id.clone();
        let cart = store.remove_from_cart(&line).await.unwrap();
        assert_eq!(cart.item_count(), before);
        assert!(cart.find_by_product(&rice().id).is_none());
    }
}
