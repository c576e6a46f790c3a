//! The comparison set value type.

use super::MAX_COMPARE;
use crate::catalog::Product;
use crate::ids::ProductId;
use crate::CommerceError;
use serde::{Deserialize, Serialize};

/// Up to [`MAX_COMPARE`] distinct products, in the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComparisonSet {
    products: Vec<Product>,
}

impl ComparisonSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from any list: later duplicates are dropped and the
    /// result is cut to [`MAX_COMPARE`]. Returns the set and whether
    /// anything was dropped.
    pub fn from_products(products: Vec<Product>) -> (Self, bool) {
        let total = products.len();
        let mut set = Self::new();
        for product in products {
            if set.is_full() {
                break;
            }
            if !set.contains(&product.id) {
                set.products.push(product);
            }
        }
        let dropped = set.len() != total;
        (set, dropped)
    }

    /// Add `product`. `Ok(false)` when it is already present; an error when
    /// the set is full. The set is unchanged unless `Ok(true)` is returned.
    pub fn try_add(&mut self, product: Product) -> Result<bool, CommerceError> {
        if self.contains(&product.id) {
            return Ok(false);
        }
        if self.is_full() {
            return Err(CommerceError::ComparisonFull { max: MAX_COMPARE });
        }
        self.products.push(product);
        Ok(true)
    }

    /// Remove a product; `false` if it was not present.
    pub fn remove(&mut self, id: &ProductId) -> bool {
        let before = self.products.len();
        self.products.retain(|p| &p.id != id);
        self.products.len() != before
    }

    pub fn clear(&mut self) {
        self.products.clear();
    }

    pub fn contains(&self, id: &ProductId) -> bool {
        self.products.iter().any(|p| &p.id == id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.products.len() >= MAX_COMPARE
    }

    pub fn remaining_slots(&self) -> usize {
        MAX_COMPARE.saturating_sub(self.products.len())
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn ids(&self) -> impl Iterator<Item = &ProductId> + '_ {
        self.products.iter().map(|p| &p.id)
    }

    /// The comparison table, one row per attribute and one column per
    /// product. Missing values show as "-".
    pub fn attribute_rows(&self) -> Vec<ComparisonRow> {
        let p = &self.products;
        vec![
            row(p, "Price", |p| Some(p.base_price.display())),
            row(p, "MRP", |p| p.mrp.map(|m| m.display())),
            row(p, "Discount", |p| p.discount_percent().map(|d| format!("{}%", d))),
            row(p, "Brand", |p| p.brand_name().map(str::to_string)),
            row(p, "Category", |p| p.category_name().map(str::to_string)),
            row(p, "SKU", |p| Some(p.sku.clone())),
            row(p, "MOQ", |p| Some(p.moq.to_string())),
            row(p, "Case size", |p| Some(p.case_size.to_string())),
            row(p, "Stock", |p| Some(p.stock_status.display_name().to_string())),
            row(p, "Unit", |p| p.unit.clone()),
            row(p, "Weight", |p| p.weight.clone()),
        ]
    }
}

fn row(
    products: &[Product],
    label: &'static str,
    value: impl Fn(&Product) -> Option<String>,
) -> ComparisonRow {
    ComparisonRow {
        label,
        values: products
            .iter()
            .map(|p| value(p).unwrap_or_else(|| "-".to_string()))
            .collect(),
    }
}

/// One attribute across the compared products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonRow {
    pub label: &'static str,
    pub values: Vec<String>,
}
