//! Product list query builder.

use crate::ids::{BrandId, CategoryId, SubcategoryId};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Sort order for product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Backend order.
    #[default]
    Featured,
    PriceAsc,
    PriceDesc,
    NameAsc,
    Newest,
}

impl SortOrder {
    /// The backend's `ordering` parameter for this sort, if any.
    pub fn to_ordering(&self) -> Option<&'static str> {
        match self {
            SortOrder::Featured => None,
            SortOrder::PriceAsc => Some("base_price"),
            SortOrder::PriceDesc => Some("-base_price"),
            SortOrder::NameAsc => Some("name"),
            SortOrder::Newest => Some("-created_at"),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortOrder::Featured => "Featured",
            SortOrder::PriceAsc => "Price: Low to High",
            SortOrder::PriceDesc => "Price: High to Low",
            SortOrder::NameAsc => "Name: A-Z",
            SortOrder::Newest => "Newest",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Featured => "featured",
            SortOrder::PriceAsc => "price-asc",
            SortOrder::PriceDesc => "price-desc",
            SortOrder::NameAsc => "name-asc",
            SortOrder::Newest => "newest",
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "featured" | "" => Ok(SortOrder::Featured),
            "price-asc" | "price" => Ok(SortOrder::PriceAsc),
            "price-desc" => Ok(SortOrder::PriceDesc),
            "name-asc" | "name" => Ok(SortOrder::NameAsc),
            "newest" => Ok(SortOrder::Newest),
            other => Err(format!("unknown sort order: {}", other)),
        }
    }
}

/// Server-side filters for `GET /products/`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ProductQuery {
    pub category: Option<CategoryId>,
    pub subcategory: Option<SubcategoryId>,
    pub brand: Option<BrandId>,
    pub search: Option<String>,
    pub sort: SortOrder,
    /// 1-indexed page; `None` lets the backend decide.
    pub page: Option<u32>,
}

impl ProductQuery {
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

    pub fn with_brand(mut self, id: impl Into<BrandId>) -> Self {
        self.brand = Some(id.into());
        self
    }

    /// Blank searches are ignored.
    pub fn with_search(mut self, q: impl Into<String>) -> Self {
        let q = q.into();
        let q = q.trim();
        if !q.is_empty() {
            self.search = Some(q.to_string());
        }
        self
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page.max(1));
        self
    }

    /// Query-string pairs, in a stable order.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(c) = &self.category {
            params.push(("category", c.to_string()));
        }
        if let Some(s) = &self.subcategory {
            params.push(("subcategory", s.to_string()));
        }
        if let Some(b) = &self.brand {
            params.push(("brand", b.to_string()));
        }
        if let Some(q) = &self.search {
            params.push(("search", q.clone()));
        }
        if let Some(ordering) = self.sort.to_ordering() {
            params.push(("ordering", ordering.to_string()));
        }
        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_has_no_params() {
        assert!(ProductQuery::new().to_params().is_empty());
    }

    #[test]
    fn test_params_order() {
        let q = ProductQuery::new()
            .with_search("  basmati ")
            .with_category("3")
            .with_sort(SortOrder::PriceDesc)
            .with_page(0);
        assert_eq!(
            q.to_params(),
            vec![
                ("category", "3".to_string()),
                ("search", "basmati".to_string()),
                ("ordering", "-base_price".to_string()),
                ("page", "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_blank_search_ignored() {
        assert_eq!(ProductQuery::new().with_search("   ").search, None);
    }

    #[test]
    fn test_sort_parse() {
        assert_eq!("price-desc".parse(), Ok(SortOrder::PriceDesc));
        assert_eq!("Newest".parse(), Ok(SortOrder::Newest));
        assert!("rating".parse::<SortOrder>().is_err());
    }
}
