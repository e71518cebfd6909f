//! Product catalog seam
//!
//! Product data is owned by an external catalog service; reporting only
//! needs display names.

use dashmap::DashMap;
use shared::error::AppResult;

/// Read-only product name lookup
#[async_trait::async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Display name of a product, `None` when the product is gone
    async fn product_name(&self, product_id: i64) -> AppResult<Option<String>>;
}

/// In-process catalog backed by a concurrent map
#[derive(Default)]
pub struct InMemoryCatalog {
    names: DashMap<i64, String>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, product_id: i64, name: impl Into<String>) {
        self.names.insert(product_id, name.into());
    }
}

#[async_trait::async_trait]
impl ProductCatalog for InMemoryCatalog {
    async fn product_name(&self, product_id: i64) -> AppResult<Option<String>> {
        Ok(self.names.get(&product_id).map(|n| n.value().clone()))
    }
}
