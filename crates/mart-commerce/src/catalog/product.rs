//! Product types.

use super::Brand;
use crate::ids::{BrandId, CategoryId, ProductId, SubcategoryId};
use crate::money::Money;
use chrono::{DateTime, FixedOffset};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Stock availability as shown on the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum StockStatus {
    #[default]
    InStock,
    LowStock,
    OutOfStock,
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::InStock => "in-stock",
            StockStatus::LowStock => "low-stock",
            StockStatus::OutOfStock => "out-of-stock",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            StockStatus::InStock => "In stock",
            StockStatus::LowStock => "Low stock",
            StockStatus::OutOfStock => "Out of stock",
        }
    }

    /// Derive a status from a raw stock count.
    pub fn from_stock(stock: u32) -> Self {
        if stock == 0 {
            StockStatus::OutOfStock
        } else {
            StockStatus::InStock
        }
    }
}

impl FromStr for StockStatus {
    type Err = ();

    /// Accepts `in-stock`, `in_stock`, `In Stock` and friends.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        match key.as_str() {
            "instock" => Ok(StockStatus::InStock),
            "lowstock" => Ok(StockStatus::LowStock),
            "outofstock" => Ok(StockStatus::OutOfStock),
            _ => Err(()),
        }
    }
}

/// The category a product belongs to. Either half may be missing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CategoryRef {
    pub id: Option<CategoryId>,
    pub name: Option<String>,
}

/// A product's brand. Either half may be missing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct BrandRef {
    pub id: Option<BrandId>,
    pub name: Option<String>,
}

impl BrandRef {
    /// Same brand by id, or by case-insensitive name.
    pub fn matches(&self, brand: &Brand) -> bool {
        if self.id.as_ref() == Some(&brand.id) {
            return true;
        }
        self.name
            .as_deref()
            .is_some_and(|name| name.eq_ignore_ascii_case(&brand.name))
    }
}

/// A catalog product in its canonical shape.
///
/// Built only by [`normalize_product`](super::normalize_product); views never
/// see the loosely typed wire format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub sku: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Wholesale unit price.
    pub base_price: Money,
    /// List price, if the backend has one.
    #[serde(default)]
    pub mrp: Option<Money>,
    /// Minimum order quantity; cart quantities are multiples of this. Always ≥ 1.
    pub moq: u32,
    /// Units per case. Always ≥ 1.
    pub case_size: u32,
    #[serde(default)]
    pub stock: Option<u32>,
    pub stock_status: StockStatus,
    #[serde(default)]
    pub category: CategoryRef,
    #[serde(default)]
    pub subcategory_id: Option<SubcategoryId>,
    #[serde(default)]
    pub brand: Option<BrandRef>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub weight: Option<String>,
    #[serde(default)]
    pub key_features: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub gallery: Vec<String>,
    /// Colour or pack variants offered for this product.
    #[serde(default)]
    pub variants: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<FixedOffset>>,
}

fn default_true() -> bool {
    true
}

impl Product {
    /// Create a product with the required fields; everything else defaults.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        sku: impl Into<String>,
        base_price: Money,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            sku: sku.into(),
            description: None,
            base_price,
            mrp: None,
            moq: 1,
            case_size: 1,
            stock: None,
            stock_status: StockStatus::InStock,
            category: CategoryRef::default(),
            subcategory_id: None,
            brand: None,
            unit: None,
            weight: None,
            key_features: Vec::new(),
            image_url: None,
            gallery: Vec::new(),
            variants: Vec::new(),
            is_active: true,
            created_at: None,
        }
    }

    /// Set the minimum order quantity (clamped to at least 1).
    pub fn with_moq(mut self, moq: u32) -> Self {
        self.moq = moq.max(1);
        self
    }

    /// Set the case size (clamped to at least 1).
    pub fn with_case_size(mut self, case_size: u32) -> Self {
        self.case_size = case_size.max(1);
        self
    }

    pub fn with_mrp(mut self, mrp: Money) -> Self {
        self.mrp = Some(mrp);
        self
    }

    pub fn with_brand(mut self, name: impl Into<String>) -> Self {
        self.brand = Some(BrandRef {
            id: None,
            name: Some(name.into()),
        });
        self
    }

    pub fn with_category(mut self, id: Option<CategoryId>, name: Option<String>) -> Self {
        self.category = CategoryRef { id, name };
        self
    }

    pub fn with_stock_status(mut self, status: StockStatus) -> Self {
        self.stock_status = status;
        self
    }

    pub fn brand_name(&self) -> Option<&str> {
        self.brand.as_ref().and_then(|b| b.name.as_deref())
    }

    pub fn category_name(&self) -> Option<&str> {
        self.category.name.as_deref()
    }

    /// Active and not out of stock.
    pub fn is_purchasable(&self) -> bool {
        self.is_active && self.stock_status != StockStatus::OutOfStock
    }

    /// Percentage saved against MRP, rounded to a whole percent.
    ///
    /// `None` when there is no MRP or it is not above the base price.
    pub fn discount_percent(&self) -> Option<Decimal> {
        let mrp = self.mrp?;
        if mrp.currency != self.base_price.currency || mrp.amount <= self.base_price.amount {
            return None;
        }
        let saved = (mrp.amount - self.base_price.amount) / mrp.amount * Decimal::ONE_HUNDRED;
        Some(saved.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
    }

    /// Whole cases and loose units in `quantity`.
    pub fn case_count(&self, quantity: u32) -> (u32, u32) {
        let size = self.case_size.max(1);
        (quantity / size, quantity % size)
    }

    /// Price of `quantity` units at the base price.
    pub fn line_total(&self, quantity: u32) -> Money {
        self.base_price.multiply(quantity)
    }
}
