//! Cart and line item types.

use crate::catalog::{decimal_from, id_from, normalize_product, u32_from, Product};
use crate::ids::{CartId, LineItemId, ProductId};
use crate::money::{Currency, Money};
use crate::CommerceError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// The server's cart, as last applied.
///
/// Aggregates are the server's figures; they are recomputed from the lines
/// only when the server leaves them out.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    #[serde(default)]
    pub id: Option<CartId>,
    pub items: Vec<LineItem>,
    pub total_items: u32,
    pub total_price: Money,
}

impl Cart {
    /// The empty cart: no items, zero totals.
    pub fn empty() -> Self {
        Self {
            id: None,
            items: Vec::new(),
            total_items: 0,
            total_price: Money::zero(Currency::INR),
        }
    }

    /// Build a cart from line items, deriving the aggregates.
    pub fn with_items(items: Vec<LineItem>) -> Self {
        let total_items = items.iter().map(|l| l.quantity).fold(0u32, u32::saturating_add);
        let total_price = Money::new(
            items.iter().map(|l| l.total_price.amount).sum(),
            Currency::INR,
        );
        Self {
            id: None,
            items,
            total_items,
            total_price,
        }
    }

    /// Parse a cart response body.
    ///
    /// Accepts a cart object, an array of carts (first one wins) and bodies
    /// without any cart at all (`{"message": "Cart cleared"}`, `null`), which
    /// read as the empty cart.
    pub fn from_response(value: Value) -> Result<Self, CommerceError> {
        match value {
            Value::Null => Ok(Cart::empty()),
            Value::Array(carts) => match carts.into_iter().next() {
                Some(first) => Cart::from_response(first),
                None => Ok(Cart::empty()),
            },
            Value::Object(map) => {
                let Some(items) = map.get("items") else {
                    return Ok(Cart::empty());
                };
                let items = items.as_array().ok_or_else(|| {
                    CommerceError::InvalidResponse("cart items is not a list".to_string())
                })?;
                let items: Vec<LineItem> = items
                    .iter()
                    .filter_map(|item| match LineItem::from_value(item) {
                        Ok(line) => Some(line),
                        Err(e) => {
                            warn!(error = %e, "skipping malformed cart line");
                            None
                        }
                    })
                    .collect();
                let mut cart = Cart::with_items(items);
                cart.id = map.get("id").and_then(id_from).map(CartId::new);
                if let Some(n) = map.get("total_items").and_then(u32_from) {
                    cart.total_items = n;
                }
                if let Some(total) = map.get("total_price").and_then(decimal_from) {
                    cart.total_price = Money::new(total, Currency::INR);
                }
                Ok(cart)
            }
            other => Err(CommerceError::InvalidResponse(format!(
                "expected a cart, got {}",
                other
            ))),
        }
    }

    /// Total units across all lines.
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|l| l.quantity).fold(0, u32::saturating_add)
    }

    /// Number of distinct lines.
    pub fn unique_item_count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn find_line(&self, line_item_id: &LineItemId) -> Option<&LineItem> {
        self.items.iter().find(|l| &l.id == line_item_id)
    }

    pub fn find_by_product(&self, product_id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|l| &l.product.id == product_id)
    }

    /// Σ line totals at full precision. This is the pricing subtotal.
    pub fn line_subtotal_sum(&self) -> Money {
        Money::new(
            self.items.iter().map(|l| l.total_price.amount).sum(),
            self.total_price.currency,
        )
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::empty()
    }
}

/// One product-quantity pairing within a cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    pub id: LineItemId,
    pub product: Product,
    /// A positive multiple of the product's MOQ.
    pub quantity: u32,
    pub total_price: Money,
}

impl LineItem {
    /// Create a line with `total_price = quantity × base_price`.
    pub fn new(id: impl Into<LineItemId>, product: Product, quantity: u32) -> Self {
        let total_price = product.line_total(quantity);
        Self {
            id: id.into(),
            product,
            quantity,
            total_price,
        }
    }

    fn from_value(value: &Value) -> Result<Self, CommerceError> {
        let id = value
            .get("id")
            .and_then(id_from)
            .ok_or_else(|| CommerceError::InvalidResponse("cart line without an id".to_string()))?;
        let product = value
            .get("product")
            .filter(|p| p.is_object())
            .cloned()
            .ok_or_else(|| {
                CommerceError::InvalidResponse(format!("cart line {} has no product", id))
            })
            .and_then(normalize_product)?;
        let quantity = value.get("quantity").and_then(u32_from).ok_or_else(|| {
            CommerceError::InvalidResponse(format!("cart line {} has no quantity", id))
        })?;

        let mut line = LineItem::new(id, product, quantity);
        if let Some(total) = value.get("total_price").and_then(decimal_from) {
            line.total_price = Money::new(total, Currency::INR);
        }
        Ok(line)
    }

    /// Unit price implied by the line total.
    pub fn unit_price(&self) -> Money {
        self.product.base_price
    }
}
