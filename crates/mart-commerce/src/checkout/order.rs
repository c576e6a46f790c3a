//! Order types: the placement request, the confirmation and tracked orders.

use super::{DeliveryOption, PaymentMethod};
use crate::cart::{Cart, PricingBreakdown};
use crate::catalog::{decimal_from, id_from, reference_id, text_from, u32_from};
use crate::ids::{OrderId, ProductId};
use crate::money::{Currency, Money};
use crate::CommerceError;
use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;
use tracing::warn;

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Placed, awaiting confirmation.
    #[default]
    Pending,
    Confirmed,
    Packed,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// The tracking stages, in order. `Cancelled` is not a stage.
    pub const STAGES: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Packed,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Packed => "packed",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Order Placed",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Packed => "Packed",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Check if order is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

impl FromStr for OrderStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "packed" => Ok(OrderStatus::Packed),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" | "canceled" => Ok(OrderStatus::Cancelled),
            _ => Err(()),
        }
    }
}

/// Payment status as recorded by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Failed => "Failed",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(PaymentStatus::Pending),
            "paid" => Some(PaymentStatus::Paid),
            "failed" => Some(PaymentStatus::Failed),
            _ => None,
        }
    }
}

/// One item of a placement request.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OrderRequestItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub price: Decimal,
    pub total: Decimal,
}

/// Body of `POST /orders/`. Amounts are rounded to 2 places.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OrderRequest {
    pub items: Vec<OrderRequestItem>,
    pub payment_method: PaymentMethod,
    /// Display name of the delivery option ("Standard Delivery").
    pub delivery_option: String,
    pub delivery_address: String,
    pub scheduled_date: Option<NaiveDate>,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub cgst: Decimal,
    pub sgst: Decimal,
    pub delivery_charges: Decimal,
    pub total: Decimal,
}

impl OrderRequest {
    /// Build the request from a cart snapshot and its pricing.
    pub fn new(
        cart: &Cart,
        pricing: &PricingBreakdown,
        payment_method: PaymentMethod,
        delivery: DeliveryOption,
        delivery_address: impl Into<String>,
        scheduled_date: Option<NaiveDate>,
    ) -> Self {
        let items = cart
            .items
            .iter()
            .map(|line| OrderRequestItem {
                product_id: line.product.id.clone(),
                quantity: line.quantity,
                price: wire_amount(line.product.base_price),
                total: wire_amount(line.total_price),
            })
            .collect();
        Self {
            items,
            payment_method,
            delivery_option: delivery.display_name().to_string(),
            delivery_address: delivery_address.into(),
            scheduled_date: scheduled_date.filter(|_| delivery.requires_date()),
            subtotal: wire_amount(pricing.subtotal),
            discount: wire_amount(pricing.discount),
            cgst: wire_amount(pricing.cgst),
            sgst: wire_amount(pricing.sgst),
            delivery_charges: wire_amount(pricing.delivery_charge),
            total: wire_amount(pricing.total),
        }
    }
}

fn wire_amount(money: Money) -> Decimal {
    let mut amount = money.rounded().amount;
    amount.rescale(2);
    amount
}

/// What the backend returns for a placed order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderConfirmation {
    pub id: OrderId,
    #[serde(default)]
    pub order_number: Option<String>,
}

impl OrderConfirmation {
    pub fn from_response(value: &Value) -> Result<Self, CommerceError> {
        let id = value.get("id").and_then(id_from).ok_or_else(|| {
            CommerceError::InvalidResponse("order response without an id".to_string())
        })?;
        Ok(Self {
            id: OrderId::new(id),
            order_number: value.get("order_number").and_then(text_from),
        })
    }

    /// The order number, or the id when the backend sent none.
    pub fn display_number(&self) -> String {
        match &self.order_number {
            Some(n) => n.clone(),
            None => format!("#{}", self.id),
        }
    }
}

/// A line on a placed order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub product_id: Option<ProductId>,
    pub name: Option<String>,
    pub variant: Option<String>,
    pub quantity: u32,
    pub price: Money,
    pub total: Money,
}

/// A placed order as tracked by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: OrderId,
    pub order_number: String,
    pub status: OrderStatus,
    pub subtotal: Money,
    pub discount: Money,
    pub cgst: Money,
    pub sgst: Money,
    pub delivery_charges: Money,
    pub total: Money,
    pub delivery_address: String,
    pub delivery_option: String,
    pub scheduled_date: Option<NaiveDate>,
    pub payment_method: Option<PaymentMethod>,
    pub payment_status: PaymentStatus,
    pub tracking_number: Option<String>,
    pub courier_partner: Option<String>,
    pub created_at: Option<DateTime<FixedOffset>>,
    pub confirmed_at: Option<DateTime<FixedOffset>>,
    pub packed_at: Option<DateTime<FixedOffset>>,
    pub shipped_at: Option<DateTime<FixedOffset>>,
    pub delivered_at: Option<DateTime<FixedOffset>>,
    pub items: Vec<OrderItem>,
}

/// One step of the tracking timeline.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TimelineStage {
    pub status: OrderStatus,
    pub label: &'static str,
    pub completed: bool,
    pub current: bool,
    pub at: Option<DateTime<FixedOffset>>,
}

impl Order {
    /// Parse an order body. Only `id` is required.
    pub fn from_value(value: &Value) -> Result<Self, CommerceError> {
        let id = value
            .get("id")
            .and_then(id_from)
            .ok_or_else(|| CommerceError::InvalidResponse("order without an id".to_string()))?;
        let text = |key: &str| value.get(key).and_then(text_from);
        let money = |key: &str| {
            Money::new(
                value.get(key).and_then(decimal_from).unwrap_or(Decimal::ZERO),
                Currency::INR,
            )
        };
        let time = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        };

        let status = match text("status") {
            Some(s) => OrderStatus::from_str(&s).unwrap_or_else(|_| {
                warn!(order = %id, status = %s, "unknown order status; showing as pending");
                OrderStatus::Pending
            }),
            None => OrderStatus::Pending,
        };

        let items = value
            .get("items")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(order_item).collect())
            .unwrap_or_default();

        Ok(Order {
            order_number: text("order_number").unwrap_or_else(|| format!("#{}", id)),
            status,
            subtotal: money("subtotal"),
            discount: money("discount"),
            cgst: money("cgst"),
            sgst: money("sgst"),
            delivery_charges: money("delivery_charges"),
            total: money("total"),
            delivery_address: text("delivery_address").unwrap_or_default(),
            delivery_option: text("delivery_option").unwrap_or_default(),
            scheduled_date: text("scheduled_date").and_then(|s| s.parse().ok()),
            payment_method: text("payment_method").and_then(|s| s.parse().ok()),
            payment_status: text("payment_status")
                .and_then(|s| PaymentStatus::parse(&s))
                .unwrap_or_default(),
            tracking_number: text("tracking_number"),
            courier_partner: text("courier_partner"),
            created_at: time("created_at"),
            confirmed_at: time("confirmed_at"),
            packed_at: time("packed_at"),
            shipped_at: time("shipped_at"),
            delivered_at: time("delivered_at"),
            items,
            id: OrderId::new(id),
        })
    }

    /// When the order reached `status`, if recorded.
    pub fn stage_time(&self, status: OrderStatus) -> Option<DateTime<FixedOffset>> {
        match status {
            OrderStatus::Pending => self.created_at,
            OrderStatus::Confirmed => self.confirmed_at,
            OrderStatus::Packed => self.packed_at,
            OrderStatus::Shipped => self.shipped_at,
            OrderStatus::Delivered => self.delivered_at,
            OrderStatus::Cancelled => None,
        }
    }

    /// The five tracking stages. Stages up to the current status are
    /// completed; a cancelled order has no current stage.
    pub fn timeline(&self) -> Vec<TimelineStage> {
        let current = OrderStatus::STAGES.iter().position(|s| *s == self.status);
        OrderStatus::STAGES
            .iter()
            .enumerate()
            .map(|(i, status)| TimelineStage {
                status: *status,
                label: status.display_name(),
                completed: current.is_some_and(|c| i <= c),
                current: current == Some(i),
                at: self.stage_time(*status),
            })
            .collect()
    }

    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

fn order_item(value: &Value) -> Option<OrderItem> {
    let product = value.get("product");
    let quantity = value.get("quantity").and_then(u32_from)?;
    let price = value.get("price").and_then(decimal_from).unwrap_or(Decimal::ZERO);
    let total = value
        .get("total")
        .and_then(decimal_from)
        .unwrap_or(price * Decimal::from(quantity));
    Some(OrderItem {
        product_id: product
            .and_then(reference_id)
            .or_else(|| value.get("product_id").and_then(id_from))
            .map(ProductId::new),
        name: product
            .and_then(|p| p.get("name"))
            .and_then(text_from)
            .or_else(|| value.get("product_name").and_then(text_from)),
        variant: value.get("variant").and_then(text_from),
        quantity,
        price: Money::new(price, Currency::INR),
        total: Money::new(total, Currency::INR),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{calculate, LineItem};
    use crate::catalog::Product;
    use serde_json::json;

    fn wire_order(status: &str) -> Value {
        json!({
            "id": 31,
            "order_number": "ORD-20240601-0031",
            "status": status,
            "subtotal": "12000.00",
            "discount": "1200.00",
            "cgst": "972.00",
            "sgst": "972.00",
            "delivery_charges": "0.00",
            "total": "12744.00",
            "delivery_address": "Main Warehouse, Mumbai",
            "delivery_option": "Standard Delivery",
            "scheduled_date": null,
            "payment_method": "credit-terms",
            "payment_status": "Pending",
            "tracking_number": "",
            "courier_partner": "BlueDart",
            "created_at": "2024-06-01T10:00:00+05:30",
            "confirmed_at": "2024-06-01T12:00:00+05:30",
            "packed_at": null,
            "items": [
                {"id": 1, "product": {"id": 7, "name": "Rice"}, "variant": null,
                 "quantity": 12, "price": "1000.00", "total": "12000.00"}
            ]
        })
    }

    #[test]
    fn test_parse_order() {
        let order = Order::from_value(&wire_order("confirmed")).unwrap();
        assert_eq!(order.id, OrderId::new("31"));
        assert_eq!(order.status, OrderStatus::Confirmed);
        assert_eq!(order.total.amount, Decimal::from(12744));
        assert_eq!(order.payment_method, Some(PaymentMethod::CreditTerms));
        assert_eq!(order.tracking_number, None);
        assert_eq!(order.courier_partner.as_deref(), Some("BlueDart"));
        assert_eq!(order.items[0].product_id, Some(ProductId::new("7")));
        assert_eq!(order.items[0].name.as_deref(), Some("Rice"));
        assert_eq!(order.item_count(), 12);
    }

    #[test]
    fn test_timeline() {
        let order = Order::from_value(&wire_order("confirmed")).unwrap();
        let timeline = order.timeline();
        assert_eq!(timeline.len(), 5);
        assert!(timeline[0].completed && !timeline[0].current);
        assert!(timeline[1].completed && timeline[1].current);
        assert!(!timeline[2].completed);
        assert!(timeline[1].at.is_some());
        assert!(timeline[2].at.is_none());
    }

    #[test]
    fn test_cancelled_timeline_has_no_current_stage() {
        let order = Order::from_value(&wire_order("cancelled")).unwrap();
        assert!(order.timeline().iter().all(|s| !s.current && !s.completed));
    }

    #[test]
    fn test_unknown_status_reads_as_pending() {
        let order = Order::from_value(&wire_order("on-hold")).unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[test]
    fn test_confirmation() {
        let c = OrderConfirmation::from_response(&json!({"id": 5, "order_number": "ORD-5"})).unwrap();
        assert_eq!(c.display_number(), "ORD-5");
        let c = OrderConfirmation::from_response(&json!({"id": 5})).unwrap();
        assert_eq!(c.display_number(), "#5");
        assert!(OrderConfirmation::from_response(&json!({"detail": "x"})).is_err());
    }

    #[test]
    fn test_request_amounts_rounded() {
        let product = Product::new("7", "Oil", "OIL", Money::inr(Decimal::new(3333, 2)));
        let cart = Cart::with_items(vec![LineItem::new("1", product, 1)]);
        let pricing = calculate(&cart, DeliveryOption::Standard);
        let req = OrderRequest::new(
            &cart,
            &pricing,
            PaymentMethod::Upi,
            DeliveryOption::Standard,
            "Main Warehouse, Mumbai",
            NaiveDate::from_ymd_opt(2030, 1, 1),
        );
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["cgst"], "3.00");
        assert_eq!(json["delivery_charges"], "50.00");
        assert_eq!(json["total"], "89.33");
        assert_eq!(json["payment_method"], "upi");
        assert_eq!(json["delivery_option"], "Standard Delivery");
        // Not a scheduled delivery, so no date goes out.
        assert!(json["scheduled_date"].is_null());
        assert_eq!(json["items"][0]["product_id"], 7);
        assert_eq!(json["items"][0]["price"], "33.33");
    }
}
