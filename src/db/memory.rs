use async_trait::async_trait;
use tokio::sync::RwLock;

use super::ProductStore;
use crate::error::{AppError, AppResult};
use crate::models::Product;

/// Process-local store, used by the test suites.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    rows: RwLock<Vec<Product>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn fetch_all(&self) -> AppResult<Vec<Product>> {
        Ok(self.rows.read().await.clone())
    }

    async fn insert(&self, product: &Product) -> AppResult<Product> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|row| row.id == product.id) {
            return Err(AppError::Conflict(product.id));
        }
        rows.push(product.clone());
        Ok(product.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn new_store_is_empty() {
        let store = InMemoryProductStore::new();
        assert!(store.is_empty().await);
        assert!(store.fetch_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn insert_returns_the_stored_row() {
        let store = InMemoryProductStore::new();
        let product = Product::new("Widget", Decimal::TEN);
        assert_eq!(store.insert(&product).await.unwrap(), product);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn duplicate_id_is_rejected_as_conflict() {
        let store = InMemoryProductStore::new();
        let product = Product::new("Widget", Decimal::TEN);
        store.insert(&product).await.unwrap();

        let err = store.insert(&product).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(id) if id == product.id));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn repeated_reads_are_identical() {
        let store = InMemoryProductStore::new();
        store.insert(&Product::new("A", Decimal::ONE)).await.unwrap();
        store.insert(&Product::new("B", Decimal::TWO)).await.unwrap();

        let first = store.fetch_all().await.unwrap();
        let second = store.fetch_all().await.unwrap();
        assert_eq!(first, second);
    }
}
