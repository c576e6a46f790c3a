//! Client-side filtering and sorting of a loaded catalog.

use super::{Brand, Product, SortOrder, StockStatus};
use crate::ids::{CategoryId, SubcategoryId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Filters applied to products already in memory.
///
/// Every set criterion must match; unset criteria match everything.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ProductFilter {
    pub category: Option<CategoryId>,
    pub subcategory: Option<SubcategoryId>,
    /// Brand names, compared case-insensitively. Empty means any brand.
    pub brands: Vec<String>,
    /// Case-insensitive substring of name or SKU.
    pub text: Option<String>,
    pub in_stock_only: bool,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

impl ProductFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, id: impl Into<CategoryId>) -> Self {
        self.category = Some(id.into());
        self
    }

    pub fn with_subcategory(mut self, id: impl Into<SubcategoryId>) -> Self {
        self.subcategory = Some(id.into());
        self
    }

    pub fn with_brand(mut self, name: impl Into<String>) -> Self {
        self.brands.push(name.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        let text = text.trim();
        self.text = (!text.is_empty()).then(|| text.to_lowercase());
        self
    }

    pub fn in_stock_only(mut self) -> Self {
        self.in_stock_only = true;
        self
    }

    pub fn with_price_range(mut self, min: Option<Decimal>, max: Option<Decimal>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = &self.category {
            if product.category.id.as_ref() != Some(category) {
                return false;
            }
        }
        if let Some(sub) = &self.subcategory {
            if product.subcategory_id.as_ref() != Some(sub) {
                return false;
            }
        }
        if !self.brands.is_empty() {
            let Some(brand) = product.brand_name() else {
                return false;
            };
            if !self.brands.iter().any(|b| b.eq_ignore_ascii_case(brand)) {
                return false;
            }
        }
        if let Some(text) = &self.text {
            let text = text.to_lowercase();
            if !product.name.to_lowercase().contains(&text)
                && !product.sku.to_lowercase().contains(&text)
            {
                return false;
            }
        }
        if self.in_stock_only && product.stock_status == StockStatus::OutOfStock {
            return false;
        }
        let price = product.base_price.amount;
        if self.min_price.is_some_and(|min| price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| price > max) {
            return false;
        }
        true
    }

    /// Matching products, in their original order.
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products.iter().filter(|p| self.matches(p)).collect()
    }
}

/// Sort products in place. `Featured` keeps the existing order.
pub fn sort_products(products: &mut [&Product], order: SortOrder) {
    match order {
        SortOrder::Featured => {}
        SortOrder::PriceAsc => products.sort_by(|a, b| a.base_price.amount.cmp(&b.base_price.amount)),
        SortOrder::PriceDesc => products.sort_by(|a, b| b.base_price.amount.cmp(&a.base_price.amount)),
        SortOrder::NameAsc => products.sort_by_key(|p| p.name.to_lowercase()),
        // Undated products sink to the end.
        SortOrder::Newest => products.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }
}

/// A brand with the number of products carrying it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BrandFacet {
    pub name: String,
    pub count: usize,
}

/// Brand names with product counts, sorted by name.
pub fn brand_facets<'a>(products: impl IntoIterator<Item = &'a Product>) -> Vec<BrandFacet> {
    let mut counts: BTreeMap<String, (String, usize)> = BTreeMap::new();
    for name in products.into_iter().filter_map(Product::brand_name) {
        let entry = counts
            .entry(name.to_lowercase())
            .or_insert_with(|| (name.to_string(), 0));
        entry.1 += 1;
    }
    counts
        .into_values()
        .map(|(name, count)| BrandFacet { name, count })
        .collect()
}

/// Brands with at least one product in `category` (all brands when `None`).
pub fn visible_brands<'a>(
    brands: &'a [Brand],
    products: &[Product],
    category: Option<&CategoryId>,
) -> Vec<&'a Brand> {
    let Some(category) = category else {
        return brands.iter().collect();
    };
    brands
        .iter()
        .filter(|brand| {
            products.iter().any(|p| {
                p.category.id.as_ref() == Some(category)
                    && p.brand.as_ref().is_some_and(|b| b.matches(brand))
            })
        })
        .collect()
}
