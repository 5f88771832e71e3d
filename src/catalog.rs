//! Catalog collaborator seam.
//!
//! The engine asks the catalog for a product snapshot only when an item is
//! created; existing items are never re-read against it.

use crate::error::CatalogError;
use crate::model::{Money, ProductSnapshot};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

#[async_trait]
pub trait Catalog: Send + Sync {
    async fn snapshot(&self, product_ref: &str) -> Result<ProductSnapshot, CatalogError>;
}

#[derive(Debug, Clone)]
struct CatalogEntry {
    name: String,
    price: Money,
    cost: Money,
}

/// In-memory catalog with mutable prices.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    products: Arc<RwLock<HashMap<String, CatalogEntry>>>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_product(self, product_ref: &str, name: &str, price: Money, cost: Money) -> Self {
        self.upsert(product_ref, name, price, cost);
        self
    }

    /// Adds or replaces a product.
    pub fn upsert(&self, product_ref: &str, name: &str, price: Money, cost: Money) {
        let entry = CatalogEntry {
            name: name.to_string(),
            price,
            cost,
        };
        let mut products = self.products.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        products.insert(product_ref.to_string(), entry);
    }

    pub fn price_of(&self, product_ref: &str) -> Option<Money> {
        let products = self.products.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        products.get(product_ref).map(|entry| entry.price)
    }
}

#[async_trait]
impl Catalog for StaticCatalog {
    async fn snapshot(&self, product_ref: &str) -> Result<ProductSnapshot, CatalogError> {
        let products = self.products.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        products
            .get(product_ref)
            .map(|entry| ProductSnapshot::capture(product_ref, &entry.name, entry.price, entry.cost))
            .ok_or_else(|| CatalogError::UnknownProduct(product_ref.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_snapshot_and_unknown_product() {
        let catalog = StaticCatalog::new().with_product("taco", "Taco", 8000, 3000);
        let snapshot = catalog.snapshot("taco").await.unwrap();
        assert_eq!(snapshot.name(), "Taco");
        assert_eq!(snapshot.unit_price(), 8000);

        catalog.upsert("taco", "Taco", 9000, 3000);
        assert_eq!(snapshot.unit_price(), 8000);
        assert_eq!(catalog.price_of("taco"), Some(9000));

        assert_eq!(
            catalog.snapshot("burrito").await,
            Err(CatalogError::UnknownProduct("burrito".to_string()))
        );
    }
}
