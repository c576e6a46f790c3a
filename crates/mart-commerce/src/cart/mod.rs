//! Shopping cart module.
//!
//! Contains the cart types, MOQ quantity arithmetic, pricing and the
//! backend-synchronized cart store.

mod cart;
mod pricing;
pub mod quantity;
mod store;

pub use cart::{Cart, LineItem};
pub use pricing::{calculate, PricingBreakdown, PricingPolicy};
pub use store::CartStore;
