//! Product catalog module.
//!
//! Canonical product, category and brand types, the normalization that
//! produces them from backend payloads, and client-side filtering.

mod category;
mod filter;
mod listing;
mod normalize;
mod product;
mod query;
mod service;

pub use category::{Brand, Category, Subcategory};
pub use filter::{brand_facets, sort_products, visible_brands, BrandFacet, ProductFilter};
pub use listing::{Listing, Page};
pub use normalize::{normalize_brands, normalize_categories, normalize_product, normalize_products, RawProduct};
pub(crate) use normalize::{decimal_from, id_from, reference_id, text_from, u32_from};
pub use product::{BrandRef, CategoryRef, Product, StockStatus};
pub use query::{ProductQuery, SortOrder};
pub use service::{CatalogService, CatalogSnapshot};
