//! Payment methods offered at checkout.

use crate::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Payment method. Gateway invocation happens elsewhere; the order only
/// records the choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    /// Net 30/60/90 terms.
    CreditTerms,
    Upi,
    Card,
    Netbanking,
    /// Letter of credit.
    Lc,
    Advance,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 6] = [
        PaymentMethod::CreditTerms,
        PaymentMethod::Upi,
        PaymentMethod::Card,
        PaymentMethod::Netbanking,
        PaymentMethod::Lc,
        PaymentMethod::Advance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CreditTerms => "credit-terms",
            PaymentMethod::Upi => "upi",
            PaymentMethod::Card => "card",
            PaymentMethod::Netbanking => "netbanking",
            PaymentMethod::Lc => "lc",
            PaymentMethod::Advance => "advance",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentMethod::CreditTerms => "Credit Terms (Pay Later)",
            PaymentMethod::Upi => "UPI Payment",
            PaymentMethod::Card => "Credit/Debit Card",
            PaymentMethod::Netbanking => "Net Banking",
            PaymentMethod::Lc => "Letter of Credit (LC)",
            PaymentMethod::Advance => "Advance Payment",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PaymentMethod::CreditTerms => "Net 30/60/90 days payment terms",
            PaymentMethod::Upi => "GPay, PhonePe, Paytm",
            PaymentMethod::Card => "Visa, Mastercard, RuPay",
            PaymentMethod::Netbanking => "All major banks",
            PaymentMethod::Lc => "For high-value orders",
            PaymentMethod::Advance => "Full payment in advance",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('_', "-");
        PaymentMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == key)
            .ok_or(ValidationError::UnknownOption {
                kind: "payment method",
                value: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_ids() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::CreditTerms).unwrap(),
            "\"credit-terms\""
        );
        for method in PaymentMethod::ALL {
            let json = serde_json::to_string(&method).unwrap();
            assert_eq!(json, format!("\"{}\"", method.as_str()));
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!("credit_terms".parse(), Ok(PaymentMethod::CreditTerms));
        assert_eq!(" UPI ".parse(), Ok(PaymentMethod::Upi));
        assert!("cheque".parse::<PaymentMethod>().is_err());
    }
}
