//! Wire-shape normalization for catalog data.
//!
//! The backend's product payload is loosely typed: ids arrive as numbers or
//! strings, prices as decimal strings or numbers, the image may live in one
//! of three fields and the brand in one of four. Everything is folded into
//! the canonical [`Product`] here, so nothing past the fetch boundary ever
//! branches on the wire shape.

use super::{Brand, BrandRef, Category, CategoryRef, Listing, Page, Product, StockStatus, Subcategory};
use crate::ids::{BrandId, CategoryId, ProductId, SubcategoryId};
use crate::money::{Currency, Money};
use crate::CommerceError;
use chrono::DateTime;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;
use tracing::warn;

/// A product exactly as the backend sends it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawProduct {
    pub id: Option<Value>,
    pub name: Option<Value>,
    pub sku: Option<Value>,
    pub description: Option<Value>,
    pub base_price: Option<Value>,
    pub price: Option<Value>,
    pub mrp: Option<Value>,
    pub moq: Option<Value>,
    pub case_size: Option<Value>,
    pub stock: Option<Value>,
    pub stock_status: Option<Value>,
    pub category: Option<Value>,
    pub category_id: Option<Value>,
    pub category_obj: Option<Value>,
    pub category_name: Option<Value>,
    pub subcategory: Option<Value>,
    pub subcategory_id: Option<Value>,
    pub brand: Option<Value>,
    pub brand_id: Option<Value>,
    pub brand_name: Option<Value>,
    pub brand_ref: Option<Value>,
    pub unit: Option<Value>,
    pub weight: Option<Value>,
    pub key_features: Option<Value>,
    pub key_features_list: Option<Value>,
    pub image_url: Option<Value>,
    pub image: Option<Value>,
    pub images: Option<Value>,
    pub colors: Option<Value>,
    pub variants: Option<Value>,
    pub is_active: Option<Value>,
    pub created_at: Option<Value>,
}

impl RawProduct {
    /// Fold the wire shape into a canonical [`Product`].
    ///
    /// Fails only when the product has no usable id, name or price.
    pub fn normalize(self) -> Result<Product, CommerceError> {
        let id = self
            .id
            .as_ref()
            .and_then(id_from)
            .map(ProductId::new)
            .ok_or_else(|| CommerceError::InvalidResponse("product without an id".to_string()))?;

        let name = self.name.as_ref().and_then(text_from).ok_or_else(|| {
            CommerceError::InvalidResponse(format!("product {} has no name", id))
        })?;

        let base_price = self
            .base_price
            .as_ref()
            .and_then(decimal_from)
            .or_else(|| self.price.as_ref().and_then(decimal_from))
            .filter(|p| !p.is_sign_negative())
            .ok_or_else(|| {
                CommerceError::InvalidResponse(format!("product {} has no valid price", id))
            })?;

        let stock = self.stock.as_ref().and_then(u32_from);
        let stock_status = match self.stock_status.as_ref().and_then(text_from) {
            Some(status) => StockStatus::from_str(&status).unwrap_or_default(),
            None => stock.map(StockStatus::from_stock).unwrap_or_default(),
        };

        let (image_url, gallery) = images_from(&self);

        Ok(Product {
            sku: self.sku.as_ref().and_then(text_from).unwrap_or_default(),
            description: self.description.as_ref().and_then(text_from),
            base_price: Money::new(base_price, Currency::INR),
            mrp: self
                .mrp
                .as_ref()
                .and_then(decimal_from)
                .map(|m| Money::new(m, Currency::INR)),
            moq: positive_or_one(self.moq.as_ref()),
            case_size: positive_or_one(self.case_size.as_ref()),
            stock,
            stock_status,
            category: category_from(&self),
            subcategory_id: self
                .subcategory
                .as_ref()
                .or(self.subcategory_id.as_ref())
                .and_then(reference_id)
                .map(SubcategoryId::new),
            brand: brand_from(&self),
            unit: self.unit.as_ref().and_then(text_from),
            weight: self.weight.as_ref().and_then(text_from),
            key_features: features_from(&self),
            image_url,
            gallery,
            variants: self
                .colors
                .as_ref()
                .or(self.variants.as_ref())
                .map(variants_from)
                .unwrap_or_default(),
            is_active: self.is_active.as_ref().and_then(Value::as_bool).unwrap_or(true),
            created_at: self
                .created_at
                .as_ref()
                .and_then(Value::as_str)
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok()),
            id,
            name,
        })
    }
}

/// Normalize a single product body.
pub fn normalize_product(value: Value) -> Result<Product, CommerceError> {
    RawProduct::deserialize(value)
        .map_err(|e| CommerceError::InvalidResponse(format!("product: {}", e)))?
        .normalize()
}

/// Normalize a product list (bare array or page). Malformed entries are
/// skipped with a warning rather than failing the whole list.
pub fn normalize_products(value: Value) -> Result<Page<Product>, CommerceError> {
    let listing: Listing<Value> = Listing::deserialize(value)
        .map_err(|e| CommerceError::InvalidResponse(format!("product list: {}", e)))?;
    Ok(listing.into_page(|item| match normalize_product(item) {
        Ok(product) => Some(product),
        Err(e) => {
            warn!(error = %e, "skipping malformed product");
            None
        }
    }))
}

/// Normalize a category list.
pub fn normalize_categories(value: Value) -> Result<Vec<Category>, CommerceError> {
    let listing: Listing<Value> = Listing::deserialize(value)
        .map_err(|e| CommerceError::InvalidResponse(format!("category list: {}", e)))?;
    Ok(listing
        .into_page(|item| {
            let category = category_entry(&item);
            if category.is_none() {
                warn!("skipping malformed category");
            }
            category
        })
        .into_items())
}

/// Normalize a brand list.
pub fn normalize_brands(value: Value) -> Result<Vec<Brand>, CommerceError> {
    let listing: Listing<Value> = Listing::deserialize(value)
        .map_err(|e| CommerceError::InvalidResponse(format!("brand list: {}", e)))?;
    Ok(listing
        .into_page(|item| {
            let id = item.get("id").and_then(id_from)?;
            let name = item.get("name").and_then(text_from)?;
            Some(Brand {
                id: BrandId::new(id),
                name,
                slug: item.get("slug").and_then(text_from),
                logo_url: item.get("logo_url").or(item.get("logo")).and_then(text_from),
                description: item.get("description").and_then(text_from),
            })
        })
        .into_items())
}

fn category_entry(item: &Value) -> Option<Category> {
    let id = item.get("id").and_then(id_from)?;
    let name = item.get("name").and_then(text_from)?;
    let subcategories = item
        .get("subcategories")
        .and_then(Value::as_array)
        .map(|subs| {
            subs.iter()
                .filter_map(|s| {
                    Some(Subcategory {
                        id: SubcategoryId::new(s.get("id").and_then(id_from)?),
                        name: s.get("name").and_then(text_from)?,
                        category_id: Some(CategoryId::new(id.clone())),
                        image_url: s.get("image_url").or(s.get("image")).and_then(text_from),
                    })
                })
                .collect()
        })
        .unwrap_or_default();
    Some(Category {
        id: CategoryId::new(id),
        name,
        description: item.get("description").and_then(text_from),
        icon: item.get("icon").and_then(text_from),
        image_url: item.get("image_url").or(item.get("image")).and_then(text_from),
        subcategories,
        is_active: item.get("is_active").and_then(Value::as_bool).unwrap_or(true),
    })
}

fn category_from(raw: &RawProduct) -> CategoryRef {
    let mut category = CategoryRef::default();
    for value in [raw.category.as_ref(), raw.category_obj.as_ref()].into_iter().flatten() {
        match value {
            Value::Object(map) => {
                category.id = category.id.or_else(|| map.get("id").and_then(id_from).map(CategoryId::new));
                category.name = category.name.or_else(|| map.get("name").and_then(text_from));
            }
            Value::Number(_) => {
                category.id = category.id.or_else(|| id_from(value).map(CategoryId::new));
            }
            Value::String(s) if is_numeric(s) => {
                category.id = category.id.or_else(|| id_from(value).map(CategoryId::new));
            }
            Value::String(_) => {
                category.name = category.name.or_else(|| text_from(value));
            }
            _ => {}
        }
    }
    if category.id.is_none() {
        category.id = raw.category_id.as_ref().and_then(id_from).map(CategoryId::new);
    }
    if let Some(name) = raw.category_name.as_ref().and_then(text_from) {
        category.name = Some(name);
    }
    category
}

fn brand_from(raw: &RawProduct) -> Option<BrandRef> {
    let mut brand = BrandRef::default();
    if let Some(name) = raw.brand_name.as_ref().and_then(text_from) {
        brand.name = Some(name);
    }
    for value in [raw.brand_ref.as_ref(), raw.brand.as_ref()].into_iter().flatten() {
        match value {
            Value::Object(map) => {
                brand.id = brand.id.or_else(|| map.get("id").and_then(id_from).map(BrandId::new));
                brand.name = brand.name.or_else(|| map.get("name").and_then(text_from));
            }
            Value::Number(_) => {
                brand.id = brand.id.or_else(|| id_from(value).map(BrandId::new));
            }
            Value::String(_) => {
                brand.name = brand.name.or_else(|| text_from(value));
            }
            _ => {}
        }
    }
    if brand.id.is_none() {
        brand.id = raw.brand_id.as_ref().and_then(id_from).map(BrandId::new);
    }
    (brand.id.is_some() || brand.name.is_some()).then_some(brand)
}

/// Primary image plus the ordered gallery.
fn images_from(raw: &RawProduct) -> (Option<String>, Vec<String>) {
    let mut entries: Vec<(bool, u64, String)> = raw
        .images
        .as_ref()
        .and_then(Value::as_array)
        .map(|images| {
            images
                .iter()
                .filter_map(|img| {
                    let url = match img {
                        Value::String(_) => text_from(img),
                        _ => img.get("image_url").and_then(text_from).or_else(|| img.get("image").and_then(text_from)),
                    }?;
                    let primary = img.get("is_primary").and_then(Value::as_bool).unwrap_or(false);
                    let order = img.get("order").and_then(Value::as_u64).unwrap_or(u64::MAX);
                    Some((primary, order, url))
                })
                .collect()
        })
        .unwrap_or_default();
    // Primary first, then display order; the sort is stable for ties.
    entries.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    let gallery: Vec<String> = entries.into_iter().map(|(_, _, url)| url).collect();

    let primary = raw
        .image_url
        .as_ref()
        .and_then(text_from)
        .or_else(|| raw.image.as_ref().and_then(text_from))
        .or_else(|| gallery.first().cloned());
    (primary, gallery)
}

fn features_from(raw: &RawProduct) -> Vec<String> {
    if let Some(list) = raw.key_features_list.as_ref().and_then(Value::as_array) {
        return list.iter().filter_map(text_from).collect();
    }
    raw.key_features
        .as_ref()
        .and_then(Value::as_str)
        .map(|text| {
            text.lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn variants_from(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| match item {
                    Value::Object(map) => ["name", "color", "value"]
                        .iter()
                        .find_map(|k| map.get(*k).and_then(text_from)),
                    _ => text_from(item),
                })
                .collect()
        })
        .unwrap_or_default()
}

fn positive_or_one(value: Option<&Value>) -> u32 {
    value.and_then(u32_from).unwrap_or(1).max(1)
}

fn is_numeric(s: &str) -> bool {
    let s = s.trim();
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// An id from a number or a non-empty string.
pub(crate) fn id_from(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

/// The id inside a reference that may be a bare id or an `{id, ...}` object.
pub(crate) fn reference_id(value: &Value) -> Option<String> {
    match value {
        Value::Object(map) => map.get("id").and_then(id_from),
        other => id_from(other),
    }
}

/// Non-empty trimmed text; numbers are rendered as text.
pub(crate) fn text_from(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A decimal from a JSON number or a decimal string.
pub(crate) fn decimal_from(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        // Go through the textual form so 12.5 stays exactly 12.5.
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .ok(),
        _ => None,
    }
}

/// A non-negative integer from a number or numeric string.
pub(crate) fn u32_from(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal() -> Value {
        json!({"id": 7, "name": "Toor Dal 1kg", "sku": "DAL-1", "base_price": "120.50"})
    }

    #[test]
    fn test_minimal_product_defaults() {
        let p = normalize_product(minimal()).unwrap();
        assert_eq!(p.id, ProductId::new("7"));
        assert_eq!(p.base_price.amount, Decimal::new(12050, 2));
        assert_eq!(p.moq, 1);
        assert_eq!(p.case_size, 1);
        assert_eq!(p.stock_status, StockStatus::InStock);
        assert!(p.is_active);
        assert!(p.brand.is_none());
    }

    #[test]
    fn test_id_and_price_variants() {
        let a = normalize_product(json!({"id": "7", "name": "x", "base_price": 120.5})).unwrap();
        let b = normalize_product(json!({"id": 7, "name": "x", "base_price": "120.5"})).unwrap();
        assert_eq!(a.id, b.id);
        assert_eq!(a.base_price, b.base_price);

        let c = normalize_product(json!({"id": 7, "name": "x", "price": 99})).unwrap();
        assert_eq!(c.base_price.amount, Decimal::from(99));
    }

    #[test]
    fn test_missing_id_or_price_rejected() {
        assert!(normalize_product(json!({"name": "x", "base_price": 1})).is_err());
        assert!(normalize_product(json!({"id": 1, "name": "x"})).is_err());
        assert!(normalize_product(json!({"id": 1, "name": "x", "base_price": "abc"})).is_err());
        assert!(normalize_product(json!({"id": 1, "name": "x", "base_price": -5})).is_err());
    }

    #[test]
    fn test_moq_and_case_size_clamped() {
        let mut v = minimal();
        v["moq"] = json!(0);
        v["case_size"] = json!("12");
        let p = normalize_product(v).unwrap();
        assert_eq!(p.moq, 1);
        assert_eq!(p.case_size, 12);
    }

    #[test]
    fn test_stock_status_derivation() {
        let mut v = minimal();
        v["stock"] = json!(0);
        assert_eq!(normalize_product(v.clone()).unwrap().stock_status, StockStatus::OutOfStock);

        v["stock_status"] = json!("low-stock");
        assert_eq!(normalize_product(v.clone()).unwrap().stock_status, StockStatus::LowStock);

        v["stock_status"] = json!("backordered");
        assert_eq!(normalize_product(v).unwrap().stock_status, StockStatus::InStock);
    }

    #[test]
    fn test_image_sources() {
        let mut v = minimal();
        v["images"] = json!([
            {"image_url": "https://cdn/b.jpg", "order": 2, "is_primary": false},
            {"image": "https://cdn/a.jpg", "order": 5, "is_primary": true},
            {"image_url": null, "image": null}
        ]);
        let p = normalize_product(v.clone()).unwrap();
        assert_eq!(p.image_url.as_deref(), Some("https://cdn/a.jpg"));
        assert_eq!(p.gallery, vec!["https://cdn/a.jpg", "https://cdn/b.jpg"]);

        v["image"] = json!("https://cdn/main.jpg");
        let p = normalize_product(v.clone()).unwrap();
        assert_eq!(p.image_url.as_deref(), Some("https://cdn/main.jpg"));

        v["image_url"] = json!("https://cdn/explicit.jpg");
        let p = normalize_product(v).unwrap();
        assert_eq!(p.image_url.as_deref(), Some("https://cdn/explicit.jpg"));
    }

    #[test]
    fn test_brand_sources() {
        let mut v = minimal();
        v["brand"] = json!("Tata");
        assert_eq!(normalize_product(v.clone()).unwrap().brand_name(), Some("Tata"));

        let mut v = minimal();
        v["brand"] = json!({"id": 3, "name": "Aashirvaad"});
        let b = normalize_product(v).unwrap().brand.unwrap();
        assert_eq!(b.id, Some(BrandId::new("3")));
        assert_eq!(b.name.as_deref(), Some("Aashirvaad"));

        let mut v = minimal();
        v["brand_ref"] = json!(9);
        v["brand_name"] = json!("Fortune");
        let b = normalize_product(v).unwrap().brand.unwrap();
        assert_eq!(b.id, Some(BrandId::new("9")));
        assert_eq!(b.name.as_deref(), Some("Fortune"));

        let mut v = minimal();
        v["brand"] = json!("");
        assert!(normalize_product(v).unwrap().brand.is_none());
    }

    #[test]
    fn test_category_sources() {
        let mut v = minimal();
        v["category"] = json!(4);
        v["category_name"] = json!("Grains & Pulses");
        let p = normalize_product(v).unwrap();
        assert_eq!(p.category.id, Some(CategoryId::new("4")));
        assert_eq!(p.category_name(), Some("Grains & Pulses"));

        let mut v = minimal();
        v["category"] = json!({"id": 2, "name": "Cleaning"});
        let p = normalize_product(v).unwrap();
        assert_eq!(p.category.id, Some(CategoryId::new("2")));
        assert_eq!(p.category_name(), Some("Cleaning"));

        let mut v = minimal();
        v["category_id"] = json!("5");
        assert_eq!(
            normalize_product(v).unwrap().category.id,
            Some(CategoryId::new("5"))
        );
    }

    #[test]
    fn test_features_and_variants() {
        let mut v = minimal();
        v["key_features"] = json!("High protein\n\n  Unpolished  \n");
        v["colors"] = json!(["Red", {"name": "Blue"}]);
        let p = normalize_product(v).unwrap();
        assert_eq!(p.key_features, vec!["High protein", "Unpolished"]);
        assert_eq!(p.variants, vec!["Red", "Blue"]);
    }

    #[test]
    fn test_product_list_shapes() {
        let page = normalize_products(json!([minimal(), {"id": 8, "name": "y", "base_price": 1}])).unwrap();
        assert_eq!(page.len(), 2);

        let page = normalize_products(json!({
            "count": 30, "next": "page=2", "previous": null,
            "results": [minimal(), {"name": "no id"}]
        }))
        .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page.count, 30);
        assert!(page.has_next);
    }

    #[test]
    fn test_categories_and_brands() {
        let cats = normalize_categories(json!([
            {"id": 1, "name": "Food", "icon": "coffee",
             "subcategories": [{"id": 10, "name": "Spices"}]},
            {"name": "missing id"}
        ]))
        .unwrap();
        assert_eq!(cats.len(), 1);
        assert_eq!(cats[0].subcategories[0].name, "Spices");
        assert_eq!(cats[0].subcategories[0].category_id, Some(CategoryId::new("1")));

        let brands = normalize_brands(json!({"results": [{"id": 2, "name": "Amul", "logo": "l.png"}]})).unwrap();
        assert_eq!(brands[0].logo_url.as_deref(), Some("l.png"));
    }
}
