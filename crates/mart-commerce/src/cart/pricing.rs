//! Order pricing: discount, GST and delivery.
//!
//! A pure derivation from a cart snapshot and a delivery option. Amounts are
//! carried at full precision; call [`PricingBreakdown::rounded`] for display
//! or the wire.

use super::Cart;
use crate::checkout::DeliveryOption;
use crate::money::Money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Thresholds and rates. Thresholds are strict: a subtotal exactly at a
/// threshold does not qualify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingPolicy {
    /// Bulk discount applies when the subtotal is above this.
    pub discount_threshold: Decimal,
    pub discount_rate: Decimal,
    /// Central GST, on the discounted subtotal.
    pub cgst_rate: Decimal,
    /// State GST, on the discounted subtotal.
    pub sgst_rate: Decimal,
    /// Delivery is free when the subtotal is above this.
    pub free_delivery_threshold: Decimal,
}

impl PricingPolicy {
    /// 10% off above ₹10,000; CGST and SGST at 9% each; free delivery above ₹5,000.
    pub fn standard() -> Self {
        Self {
            discount_threshold: Decimal::from(10_000),
            discount_rate: Decimal::new(10, 2),
            cgst_rate: Decimal::new(9, 2),
            sgst_rate: Decimal::new(9, 2),
            free_delivery_threshold: Decimal::from(5_000),
        }
    }

    /// Price the cart.
    ///
    /// An empty cart prices to zero everywhere, delivery included.
    pub fn calculate(&self, cart: &Cart, delivery: DeliveryOption) -> PricingBreakdown {
        let subtotal = cart.line_subtotal_sum();
        if cart.is_empty() {
            let zero = Money::zero(subtotal.currency);
            return PricingBreakdown {
                subtotal: zero,
                discount: zero,
                taxable_amount: zero,
                cgst: zero,
                sgst: zero,
                delivery_charge: zero,
                total: zero,
                delivery_option: delivery,
                free_delivery_applied: false,
            };
        }
        self.calculate_subtotal(subtotal, delivery)
    }

    /// Price a bare subtotal.
    pub fn calculate_subtotal(&self, subtotal: Money, delivery: DeliveryOption) -> PricingBreakdown {
        let currency = subtotal.currency;
        let discount = if subtotal.amount > self.discount_threshold {
            subtotal.apply_rate(self.discount_rate)
        } else {
            Money::zero(currency)
        };
        let taxable = Money::new(subtotal.amount - discount.amount, currency);
        let cgst = taxable.apply_rate(self.cgst_rate);
        let sgst = taxable.apply_rate(self.sgst_rate);

        let free_delivery_applied = subtotal.amount > self.free_delivery_threshold;
        let delivery_charge = if free_delivery_applied {
            Money::zero(currency)
        } else {
            delivery.cost(currency)
        };

        let total = Money::new(
            taxable.amount + cgst.amount + sgst.amount + delivery_charge.amount,
            currency,
        );

        PricingBreakdown {
            subtotal,
            discount,
            taxable_amount: taxable,
            cgst,
            sgst,
            delivery_charge,
            total,
            delivery_option: delivery,
            free_delivery_applied,
        }
    }
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

/// Price a cart under the standard policy.
pub fn calculate(cart: &Cart, delivery: DeliveryOption) -> PricingBreakdown {
    PricingPolicy::standard().calculate(cart, delivery)
}

/// Derived order totals. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingBreakdown {
    pub subtotal: Money,
    pub discount: Money,
    /// `subtotal - discount`; the GST base.
    pub taxable_amount: Money,
    pub cgst: Money,
    pub sgst: Money,
    pub delivery_charge: Money,
    pub total: Money,
    pub delivery_option: DeliveryOption,
    /// The delivery charge was waived.
    pub free_delivery_applied: bool,
}

impl PricingBreakdown {
    pub fn total_tax(&self) -> Money {
        Money::new(self.cgst.amount + self.sgst.amount, self.cgst.currency)
    }

    pub fn has_discount(&self) -> bool {
        self.discount.is_positive()
    }

    /// What the buyer saved by qualifying for free delivery.
    pub fn delivery_savings(&self) -> Money {
        if self.free_delivery_applied {
            self.delivery_option.cost(self.subtotal.currency)
        } else {
            Money::zero(self.subtotal.currency)
        }
    }

    /// Every amount rounded to the currency's minor unit.
    pub fn rounded(&self) -> PricingBreakdown {
        PricingBreakdown {
            subtotal: self.subtotal.rounded(),
            discount: self.discount.rounded(),
            taxable_amount: self.taxable_amount.rounded(),
            cgst: self.cgst.rounded(),
            sgst: self.sgst.rounded(),
            delivery_charge: self.delivery_charge.rounded(),
            total: self.total.rounded(),
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::LineItem;
    use crate::catalog::Product;
    use crate::money::Currency;
    use proptest::prelude::*;

    fn cart_of(lines: &[(i64, u32)]) -> Cart {
        Cart::with_items(
            lines
                .iter()
                .enumerate()
                .map(|(i, (price, qty))| {
                    let product = Product::new(
                        format!("{}", i + 1),
                        format!("P{}", i + 1),
                        format!("SKU{}", i + 1),
                        Money::from_minor(*price, Currency::INR),
                    );
                    LineItem::new(format!("{}", i + 100), product, *qty)
                })
                .collect(),
        )
    }

    fn d(n: i64) -> Decimal {
        Decimal::from(n)
    }

    #[test]
    fn test_small_order_standard_delivery() {
        // 3 units at ₹100
        let p = calculate(&cart_of(&[(10_000, 3)]), DeliveryOption::Standard);
        assert_eq!(p.subtotal.amount, d(300));
        assert!(p.discount.is_zero());
        assert_eq!(p.cgst.amount, d(27));
        assert_eq!(p.sgst.amount, d(27));
        assert_eq!(p.delivery_charge.amount, d(50));
        assert_eq!(p.total.amount, d(404));
        assert!(!p.free_delivery_applied);
    }

    #[test]
    fn test_large_order_gets_discount_and_free_delivery() {
        let p = calculate(&cart_of(&[(1_200_000, 1)]), DeliveryOption::Express);
        assert_eq!(p.subtotal.amount, d(12_000));
        assert_eq!(p.discount.amount, d(1_200));
        assert_eq!(p.taxable_amount.amount, d(10_800));
        assert_eq!(p.cgst.amount, d(972));
        assert_eq!(p.sgst.amount, d(972));
        assert!(p.delivery_charge.is_zero());
        assert_eq!(p.total.amount, d(12_744));
        assert_eq!(p.delivery_savings().amount, d(150));
        assert_eq!(p.total_tax().amount, d(1_944));
    }

    #[test]
    fn test_thresholds_are_strict() {
        let p = calculate(&cart_of(&[(1_000_000, 1)]), DeliveryOption::Standard);
        assert!(p.discount.is_zero());
        assert!(p.delivery_charge.is_zero());

        let p = calculate(&cart_of(&[(500_000, 1)]), DeliveryOption::Express);
        assert_eq!(p.delivery_charge.amount, d(150));

        let p = calculate(&cart_of(&[(500_001, 1)]), DeliveryOption::Express);
        assert!(p.delivery_charge.is_zero());
    }

    #[test]
    fn test_empty_cart_is_all_zero() {
        let p = calculate(&Cart::empty(), DeliveryOption::Express);
        for m in [p.subtotal, p.discount, p.cgst, p.sgst, p.delivery_charge, p.total] {
            assert!(m.is_zero());
        }
    }

    #[test]
    fn test_scheduled_delivery_is_free() {
        let p = calculate(&cart_of(&[(10_000, 1)]), DeliveryOption::Scheduled);
        assert!(p.delivery_charge.is_zero());
        assert!(!p.free_delivery_applied);
    }

    #[test]
    fn test_rounding_only_on_request() {
        // ₹33.33 → GST 2.9997 each
        let p = calculate(&cart_of(&[(3_333, 1)]), DeliveryOption::Scheduled);
        assert_eq!(p.cgst.amount, Decimal::new(29997, 4));
        let r = p.rounded();
        assert_eq!(r.cgst.amount, Decimal::new(300, 2));
        assert_eq!(r.total.display_amount(), "39.33");
    }

    #[test]
    fn test_custom_policy() {
        let policy = PricingPolicy {
            free_delivery_threshold: d(100_000),
            ..PricingPolicy::standard()
        };
        let p = policy.calculate(&cart_of(&[(1_200_000, 1)]), DeliveryOption::Standard);
        assert_eq!(p.delivery_charge.amount, d(50));
        assert_eq!(p.total.amount, d(12_794));
    }

    proptest! {
        #[test]
        fn breakdown_identities(minor in 0i64..5_000_000, qty in 1u32..50) {
            let p = calculate(&cart_of(&[(minor, qty)]), DeliveryOption::Standard);
            let s = p.subtotal.amount;

            let expected_discount = if s > d(10_000) { s * Decimal::new(10, 2) } else { Decimal::ZERO };
            prop_assert_eq!(p.discount.amount, expected_discount);
            prop_assert_eq!(p.cgst.amount, (s - p.discount.amount) * Decimal::new(9, 2));
            prop_assert_eq!(p.cgst, p.sgst);

            let expected_delivery = if s > d(5_000) { Decimal::ZERO } else { d(50) };
            prop_assert_eq!(p.delivery_charge.amount, expected_delivery);

            prop_assert_eq!(
                p.total.amount,
                s - p.discount.amount + p.cgst.amount + p.sgst.amount + p.delivery_charge.amount
            );
        }

        #[test]
        fn pricing_is_deterministic(minor in 0i64..5_000_000, qty in 1u32..50) {
            let cart = cart_of(&[(minor, qty)]);
            prop_assert_eq!(
                calculate(&cart, DeliveryOption::Express),
                calculate(&cart, DeliveryOption::Express)
            );
        }
    }
}
