//! Type-ahead product suggestions.

use crate::catalog::Product;

/// Suggestions shown under the search box.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 6;

/// Products whose name, brand, SKU or category name contains `query`,
/// ignoring case, in catalog order. A blank query suggests nothing.
pub fn suggest<'a>(
    products: impl IntoIterator<Item = &'a Product>,
    query: &str,
    limit: usize,
) -> Vec<&'a Product> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    products
        .into_iter()
        .filter(|p| matches_query(p, &needle))
        .take(limit)
        .collect()
}

fn matches_query(product: &Product, needle: &str) -> bool {
    let contains = |s: &str| s.to_lowercase().contains(needle);
    contains(&product.name)
        || contains(&product.sku)
        || product.brand_name().is_some_and(contains)
        || product.category_name().is_some_and(contains)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use rust_decimal::Decimal;

    fn catalog() -> Vec<Product> {
        let price = Money::inr(Decimal::from(50));
        vec![
            Product::new("1", "Basmati Rice", "RICE-01", price).with_brand("India Gate"),
            Product::new("2", "Sunflower Oil", "OIL-01", price)
                .with_brand("Fortune")
                .with_category(None, Some("Edible Oils".to_string())),
            Product::new("3", "Iodised Salt", "SALT-01", price).with_brand("Tata"),
        ]
    }

    #[test]
    fn test_matches_each_field() {
        let products = catalog();
        let names = |q: &str| {
            suggest(&products, q, DEFAULT_SUGGESTION_LIMIT)
                .into_iter()
                .map(|p| p.name.as_str())
                .collect::<Vec<_>>()
        };
        assert_eq!(names("rice"), vec!["Basmati Rice"]);
        assert_eq!(names("FORTUNE"), vec!["Sunflower Oil"]);
        assert_eq!(names("salt-01"), vec!["Iodised Salt"]);
        assert_eq!(names("edible"), vec!["Sunflower Oil"]);
    }

    #[test]
    fn test_blank_query_and_limit() {
        let products = catalog();
        assert!(suggest(&products, "   ", 6).is_empty());
        assert_eq!(suggest(&products, "-01", 2).len(), 2);
    }
}
