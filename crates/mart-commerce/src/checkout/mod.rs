//! Checkout module.
//!
//! Delivery and payment options, addresses, the checkout draft and its
//! validation, order placement and order tracking.

mod address;
mod delivery;
mod draft;
mod order;
mod payment;
mod service;

pub use address::{Address, AddressType};
pub use delivery::DeliveryOption;
pub use draft::{CheckoutDraft, CheckoutStep, ValidatedCheckout};
pub use order::{
    Order, OrderConfirmation, OrderItem, OrderRequest, OrderRequestItem, OrderStatus,
    PaymentStatus, TimelineStage,
};
pub use payment::PaymentMethod;
pub use service::{AddressService, OrderService};
