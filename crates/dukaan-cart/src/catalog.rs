//! # Catalog Lookup Boundary
//!
//! The cart treats the product catalog as an external collaborator behind
//! one async seam: fetch the current record for a product id, or fail.
//! Everything the validator and checked mutations know about live prices,
//! stock and availability flows through this trait.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use thiserror::Error;

use dukaan_core::CatalogProduct;

/// Catalog lookup failures.
///
/// The two variants are handled very differently: a `NotFound` marks one
/// item unavailable, while a `Backend` failure rejects a whole validation
/// pass without touching the cart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The product id is unknown or deleted.
    #[error("product not found: {0}")]
    NotFound(String),

    /// The catalog service itself failed (network, timeout, 5xx).
    #[error("catalog lookup failed: {0}")]
    Backend(String),
}

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Async access to the live product catalog.
#[async_trait]
pub trait CatalogLookup: Send + Sync {
    /// Fetches the current catalog record for a product id.
    async fn get_by_id(&self, id: &str) -> CatalogResult<CatalogProduct>;
}

// =============================================================================
// In-Memory Catalog
// =============================================================================

/// In-memory [`CatalogLookup`] implementation.
///
/// ## Usage
/// Backs unit and integration tests, and doubles as a process-local cache
/// adapter for demo deployments. Production wires a real catalog client in
/// through the same trait.
///
/// ```rust,ignore
/// let catalog = InMemoryCatalog::new();
/// catalog.insert(surf_excel_product());
///
/// assert!(catalog.get_by_id("p1").await.is_ok());
/// assert!(catalog.get_by_id("missing").await.is_err());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    products: RwLock<HashMap<String, CatalogProduct>>,
}

impl InMemoryCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a product record.
    pub fn insert(&self, product: CatalogProduct) {
        self.products
            .write()
            .expect("catalog lock poisoned")
            .insert(product.id.clone(), product);
    }

    /// Removes a product; subsequent lookups report `NotFound`.
    pub fn remove(&self, id: &str) {
        self.products
            .write()
            .expect("catalog lock poisoned")
            .remove(id);
    }

    /// Updates a record in place. No-op when the id is unknown.
    pub fn update<F>(&self, id: &str, mutate: F)
    where
        F: FnOnce(&mut CatalogProduct),
    {
        if let Some(product) = self
            .products
            .write()
            .expect("catalog lock poisoned")
            .get_mut(id)
        {
            mutate(product);
        }
    }
}

#[async_trait]
impl CatalogLookup for InMemoryCatalog {
    async fn get_by_id(&self, id: &str) -> CatalogResult<CatalogProduct> {
        self.products
            .read()
            .expect("catalog lock poisoned")
            .get(id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, price: f64) -> CatalogProduct {
        serde_json::from_str(&format!(
            r#"{{"id":"{}","name":"Product {}","price":{},"stock":10}}"#,
            id, id, price
        ))
        .unwrap()
    }

    #[tokio::test]
    async fn test_lookup_roundtrip() {
        let catalog = InMemoryCatalog::new();
        catalog.insert(product("p1", 120.0));

        let found = catalog.get_by_id("p1").await.unwrap();
        assert_eq!(found.price, 120.0);
    }

    #[tokio::test]
    async fn test_missing_id_is_not_found() {
        let catalog = InMemoryCatalog::new();
        let err = catalog.get_by_id("ghost").await.unwrap_err();
        assert_eq!(err, CatalogError::NotFound("ghost".to_string()));
    }

    #[tokio::test]
    async fn test_update_mutates_in_place() {
        let catalog = InMemoryCatalog::new();
        catalog.insert(product("p1", 120.0));
        catalog.update("p1", |p| p.price = 99.0);

        assert_eq!(catalog.get_by_id("p1").await.unwrap().price, 99.0);
    }

    #[tokio::test]
    async fn test_remove_then_lookup_fails() {
        let catalog = InMemoryCatalog::new();
        catalog.insert(product("p1", 120.0));
        catalog.remove("p1");

        assert!(catalog.get_by_id("p1").await.is_err());
    }
}
