//! Checkout draft: the buyer's choices collected before an order is placed.

use super::{Address, DeliveryOption, OrderRequest, PaymentMethod};
use crate::cart::{Cart, PricingBreakdown, PricingPolicy};
use crate::ValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Steps in the checkout flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutStep {
    /// Delivery option and address.
    #[default]
    Delivery,
    /// Payment method.
    Payment,
    /// Order review before submission.
    Review,
}

impl CheckoutStep {
    pub fn display_name(&self) -> &'static str {
        match self {
            CheckoutStep::Delivery => "Delivery",
            CheckoutStep::Payment => "Payment",
            CheckoutStep::Review => "Review",
        }
    }

    /// Get the step number (1-indexed).
    pub fn number(&self) -> u8 {
        match self {
            CheckoutStep::Delivery => 1,
            CheckoutStep::Payment => 2,
            CheckoutStep::Review => 3,
        }
    }

    pub fn next(&self) -> Option<CheckoutStep> {
        match self {
            CheckoutStep::Delivery => Some(CheckoutStep::Payment),
            CheckoutStep::Payment => Some(CheckoutStep::Review),
            CheckoutStep::Review => None,
        }
    }
}

/// A validated draft, ready to become an [`OrderRequest`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedCheckout {
    pub delivery: DeliveryOption,
    pub scheduled_date: Option<NaiveDate>,
    pub payment_method: PaymentMethod,
    pub address: Address,
}

impl ValidatedCheckout {
    /// Build the order request for `cart` priced under `policy`.
    pub fn order_request(&self, cart: &Cart, policy: &PricingPolicy) -> (OrderRequest, PricingBreakdown) {
        let pricing = policy.calculate(cart, self.delivery);
        let request = OrderRequest::new(
            cart,
            &pricing,
            self.payment_method,
            self.delivery,
            self.address.one_line(),
            self.scheduled_date,
        );
        (request, pricing)
    }
}

/// Checkout state as the buyer fills it in.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CheckoutDraft {
    pub step: CheckoutStep,
    pub delivery: DeliveryOption,
    pub scheduled_date: Option<NaiveDate>,
    pub payment_method: Option<PaymentMethod>,
    pub address: Option<Address>,
}

impl CheckoutDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delivery(mut self, delivery: DeliveryOption) -> Self {
        self.delivery = delivery;
        self
    }

    pub fn with_scheduled_date(mut self, date: NaiveDate) -> Self {
        self.scheduled_date = Some(date);
        self
    }

    pub fn with_payment_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = Some(method);
        self
    }

    pub fn with_address(mut self, address: Address) -> Self {
        self.address = Some(address);
        self
    }

    /// Advance to the next step once the current one is complete. Stays on
    /// the last step.
    pub fn advance(&mut self) -> Result<CheckoutStep, ValidationError> {
        let Some(next) = self.step.next() else {
            return Ok(self.step);
        };
        if let Some(missing) = self.missing_for_step(next) {
            return Err(missing);
        }
        self.step = next;
        Ok(next)
    }

    fn missing_for_step(&self, step: CheckoutStep) -> Option<ValidationError> {
        let delivery_ok = || {
            if self.address.is_none() {
                return Some(ValidationError::MissingAddress);
            }
            if self.delivery.requires_date() && self.scheduled_date.is_none() {
                return Some(ValidationError::MissingScheduledDate);
            }
            None
        };
        match step {
            CheckoutStep::Delivery => None,
            CheckoutStep::Payment => delivery_ok(),
            CheckoutStep::Review => delivery_ok().or_else(|| {
                self.payment_method
                    .is_none()
                    .then_some(ValidationError::MissingPaymentMethod)
            }),
        }
    }

    /// Everything an order needs. Runs without I/O; `today` is the
    /// earliest acceptable scheduled date.
    pub fn validate(&self, cart: &Cart, today: NaiveDate) -> Result<ValidatedCheckout, ValidationError> {
        if cart.is_empty() {
            return Err(ValidationError::EmptyCart);
        }
        let payment_method = self
            .payment_method
            .ok_or(ValidationError::MissingPaymentMethod)?;
        let address = self.address.clone().ok_or(ValidationError::MissingAddress)?;
        let scheduled_date = if self.delivery.requires_date() {
            let date = self.scheduled_date.ok_or(ValidationError::MissingScheduledDate)?;
            if date < today {
                return Err(ValidationError::ScheduledDateInPast(date));
            }
            Some(date)
        } else {
            None
        };
        Ok(ValidatedCheckout {
            delivery: self.delivery,
            scheduled_date,
            payment_method,
            address,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::LineItem;
    use crate::catalog::Product;
    use crate::money::Money;
    use rust_decimal::Decimal;

    fn cart() -> Cart {
        let product = Product::new("1", "Rice", "RICE", Money::inr(Decimal::from(100)));
        Cart::with_items(vec![LineItem::new("10", product, 3)])
    }

    fn address() -> Address {
        Address::new("Main Warehouse", "123 Industrial Area", "Mumbai", "Maharashtra", "400001")
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn complete() -> CheckoutDraft {
        CheckoutDraft::new()
            .with_payment_method(PaymentMethod::CreditTerms)
            .with_address(address())
    }

    #[test]
    fn test_validate_complete_draft() {
        let checkout = complete().validate(&cart(), today()).unwrap();
        assert_eq!(checkout.delivery, DeliveryOption::Standard);
        assert_eq!(checkout.scheduled_date, None);
    }

    #[test]
    fn test_validate_rejections() {
        assert_eq!(
            complete().validate(&Cart::empty(), today()),
            Err(ValidationError::EmptyCart)
        );
        assert_eq!(
            CheckoutDraft::new().with_address(address()).validate(&cart(), today()),
            Err(ValidationError::MissingPaymentMethod)
        );
        assert_eq!(
            CheckoutDraft::new()
                .with_payment_method(PaymentMethod::Upi)
                .validate(&cart(), today()),
            Err(ValidationError::MissingAddress)
        );
    }

    #[test]
    fn test_scheduled_delivery_needs_future_date() {
        let draft = complete().with_delivery(DeliveryOption::Scheduled);
        assert_eq!(
            draft.validate(&cart(), today()),
            Err(ValidationError::MissingScheduledDate)
        );

        let yesterday = NaiveDate::from_ymd_opt(2024, 5, 31).unwrap();
        assert_eq!(
            draft.clone().with_scheduled_date(yesterday).validate(&cart(), today()),
            Err(ValidationError::ScheduledDateInPast(yesterday))
        );

        let ok = draft.with_scheduled_date(today()).validate(&cart(), today()).unwrap();
        assert_eq!(ok.scheduled_date, Some(today()));
    }

    #[test]
    fn test_date_ignored_unless_scheduled() {
        let past = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let checkout = complete().with_scheduled_date(past).validate(&cart(), today()).unwrap();
        assert_eq!(checkout.scheduled_date, None);
    }

    #[test]
    fn test_steps() {
        let mut draft = CheckoutDraft::new();
        assert_eq!(draft.advance(), Err(ValidationError::MissingAddress));
        draft.address = Some(address());
        assert_eq!(draft.advance(), Ok(CheckoutStep::Payment));
        assert_eq!(draft.advance(), Err(ValidationError::MissingPaymentMethod));
        draft.payment_method = Some(PaymentMethod::Card);
        assert_eq!(draft.advance(), Ok(CheckoutStep::Review));
        assert_eq!(draft.advance(), Ok(CheckoutStep::Review));
        assert_eq!(draft.step.number(), 3);
    }

    #[test]
    fn test_order_request_uses_one_line_address() {
        let checkout = complete().validate(&cart(), today()).unwrap();
        let (request, pricing) = checkout.order_request(&cart(), &PricingPolicy::standard());
        assert_eq!(
            request.delivery_address,
            "Main Warehouse, 123 Industrial Area, Mumbai, Maharashtra - 400001"
        );
        assert_eq!(pricing.total.amount, Decimal::from(404));
        assert_eq!(request.items.len(), 1);
        assert_eq!(request.items[0].quantity, 3);
    }
}
