//! Delivery address types.

use crate::ids::AddressId;
use crate::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What kind of premises an address is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AddressType {
    Home,
    Office,
    #[default]
    Warehouse,
    #[serde(other)]
    Other,
}

impl AddressType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AddressType::Home => "home",
            AddressType::Office => "office",
            AddressType::Warehouse => "warehouse",
            AddressType::Other => "other",
        }
    }
}

impl fmt::Display for AddressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AddressType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "home" => Ok(AddressType::Home),
            "office" => Ok(AddressType::Office),
            "warehouse" => Ok(AddressType::Warehouse),
            "other" => Ok(AddressType::Other),
            _ => Err(ValidationError::UnknownOption {
                kind: "address type",
                value: s.to_string(),
            }),
        }
    }
}

/// A saved delivery address.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Address {
    /// None for addresses not yet saved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AddressId>,
    /// Label, e.g. "Main Warehouse".
    pub name: String,
    #[serde(default)]
    pub phone_number: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default)]
    pub address_type: AddressType,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

fn default_country() -> String {
    "India".to_string()
}

impl Address {
    pub fn new(
        name: impl Into<String>,
        street_address: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        pincode: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            phone_number: String::new(),
            street_address: street_address.into(),
            city: city.into(),
            state: state.into(),
            pincode: pincode.into(),
            country: default_country(),
            address_type: AddressType::default(),
            is_default: false,
            latitude: None,
            longitude: None,
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone_number = phone.into();
        self
    }

    pub fn with_type(mut self, address_type: AddressType) -> Self {
        self.address_type = address_type;
        self
    }

    /// The delivery address string recorded on orders:
    /// `Main Warehouse, 123 Industrial Area, Mumbai, Maharashtra - 400001`.
    pub fn one_line(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        for part in [&self.name, &self.street_address, &self.city] {
            let part = part.trim();
            if !part.is_empty() {
                parts.push(part);
            }
        }
        let mut line = parts.join(", ");
        let state = self.state.trim();
        if !state.is_empty() {
            if !line.is_empty() {
                line.push_str(", ");
            }
            line.push_str(state);
        }
        let pincode = self.pincode.trim();
        if !pincode.is_empty() {
            line.push_str(" - ");
            line.push_str(pincode);
        }
        line
    }

    /// Fields required before the backend will accept the address.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let required: [(&'static str, &str); 6] = [
            ("name", &self.name),
            ("phone number", &self.phone_number),
            ("street address", &self.street_address),
            ("city", &self.city),
            ("state", &self.state),
            ("pincode", &self.pincode),
        ];
        match required.iter().find(|(_, v)| v.trim().is_empty()) {
            Some((field, _)) => Err(ValidationError::MissingField { field: *field }),
            None => Ok(()),
        }
    }
}
