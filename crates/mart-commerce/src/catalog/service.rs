//! Read-only catalog access.

use super::{Brand, Category, Page, Product, ProductQuery};
use crate::api::CatalogBackend;
use crate::ids::ProductId;
use crate::CommerceError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

/// Everything a catalog page needs, loaded together.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CatalogSnapshot {
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
    pub brands: Vec<Brand>,
}

impl CatalogSnapshot {
    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }
}

/// Catalog reads over a [`CatalogBackend`].
#[derive(Clone)]
pub struct CatalogService {
    backend: Arc<dyn CatalogBackend>,
}

impl CatalogService {
    pub fn new(backend: Arc<dyn CatalogBackend>) -> Self {
        Self { backend }
    }

    pub async fn products(&self, query: &ProductQuery) -> Result<Page<Product>, CommerceError> {
        self.backend.products(query).await
    }

    pub async fn product(&self, id: &ProductId) -> Result<Product, CommerceError> {
        self.backend.product(id).await
    }

    pub async fn categories(&self) -> Result<Vec<Category>, CommerceError> {
        self.backend.categories().await
    }

    pub async fn brands(&self) -> Result<Vec<Brand>, CommerceError> {
        self.backend.brands().await
    }

    /// Load products, categories and brands concurrently.
    ///
    /// A failed part degrades to empty and is logged; the rest still loads.
    pub async fn load(&self, query: &ProductQuery) -> CatalogSnapshot {
        let (products, categories, brands) = futures::join!(
            self.backend.products(query),
            self.backend.categories(),
            self.backend.brands(),
        );
        CatalogSnapshot {
            products: or_empty("products", products.map(Page::into_items)),
            categories: or_empty("categories", categories),
            brands: or_empty("brands", brands),
        }
    }
}

fn or_empty<T>(what: &'static str, result: Result<Vec<T>, CommerceError>) -> Vec<T> {
    result.unwrap_or_else(|e| {
        warn!(error = %e, what, "catalog read failed; showing none");
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use async_trait::async_trait;
    use mart_data::FetchError;
    use rust_decimal::Decimal;

    struct HalfBroken;

    #[async_trait]
    impl CatalogBackend for HalfBroken {
        async fn products(&self, _query: &ProductQuery) -> Result<Page<Product>, CommerceError> {
            Ok(Page {
                items: vec![Product::new("1", "Salt", "SALT", Money::inr(Decimal::from(20)))],
                count: 1,
                has_next: false,
                has_previous: false,
            })
        }

        async fn product(&self, id: &ProductId) -> Result<Product, CommerceError> {
            Err(CommerceError::ProductNotFound(id.to_string()))
        }

        async fn categories(&self) -> Result<Vec<Category>, CommerceError> {
            Err(FetchError::Timeout.into())
        }

        async fn brands(&self) -> Result<Vec<Brand>, CommerceError> {
            Ok(vec![Brand::new("1", "Tata")])
        }
    }

    #[tokio::test]
    async fn test_load_degrades_per_part() {
        let service = CatalogService::new(Arc::new(HalfBroken));
        let snapshot = service.load(&ProductQuery::new()).await;
        assert_eq!(snapshot.products.len(), 1);
        assert!(snapshot.categories.is_empty());
        assert_eq!(snapshot.brands.len(), 1);
        assert!(snapshot.product(&ProductId::new("1")).is_some());
    }

    #[tokio::test]
    async fn test_single_reads_propagate_errors() {
        let service = CatalogService::new(Arc::new(HalfBroken));
        assert!(service.categories().await.unwrap_err().is_transient());
        assert!(matches!(
            service.product(&ProductId::new("9")).await,
            Err(CommerceError::ProductNotFound(_))
        ));
    }
}
