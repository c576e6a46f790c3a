//! Delivery options.

use crate::money::{Currency, Money};
use crate::ValidationError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How an order is delivered. Each option has a flat charge, waived when the
/// subtotal clears the free-delivery threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryOption {
    Express,
    #[default]
    Standard,
    /// Delivered on a date the buyer picks.
    Scheduled,
}

impl DeliveryOption {
    pub const ALL: [DeliveryOption; 3] = [
        DeliveryOption::Express,
        DeliveryOption::Standard,
        DeliveryOption::Scheduled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryOption::Express => "express",
            DeliveryOption::Standard => "standard",
            DeliveryOption::Scheduled => "scheduled",
        }
    }

    /// Name sent to the backend and printed on orders.
    pub fn display_name(&self) -> &'static str {
        match self {
            DeliveryOption::Express => "Express Delivery",
            DeliveryOption::Standard => "Standard Delivery",
            DeliveryOption::Scheduled => "Scheduled Delivery",
        }
    }

    pub fn duration(&self) -> &'static str {
        match self {
            DeliveryOption::Express => "1-2 days",
            DeliveryOption::Standard => "3-5 days",
            DeliveryOption::Scheduled => "Choose date",
        }
    }

    /// Flat charge before any free-delivery waiver.
    pub fn cost(&self, currency: Currency) -> Money {
        let amount = match self {
            DeliveryOption::Express => 150,
            DeliveryOption::Standard => 50,
            DeliveryOption::Scheduled => 0,
        };
        Money::new(Decimal::from(amount), currency)
    }

    pub fn requires_date(&self) -> bool {
        matches!(self, DeliveryOption::Scheduled)
    }
}

impl fmt::Display for DeliveryOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for DeliveryOption {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        DeliveryOption::ALL
            .into_iter()
            .find(|o| o.as_str() == key || o.display_name().eq_ignore_ascii_case(&key))
            .ok_or(ValidationError::UnknownOption {
                kind: "delivery option",
                value: s.to_string(),
            })
    }
}
