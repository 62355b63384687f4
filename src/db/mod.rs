use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::AppResult;
use crate::models::*;

pub mod memory;

pub use memory::InMemoryProductStore;

/// Storage behind the product routes.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Every stored product, in whatever order the backend yields them.
    async fn fetch_all(&self) -> AppResult<Vec<Product>>;

    /// Writes one new row and returns it as stored.
    async fn insert(&self, product: &Product) -> AppResult<Product>;
}

// ── Operations ────────────────────────────────────────────────────────────────

pub async fn list_products(store: &dyn ProductStore) -> AppResult<Vec<Product>> {
    store.fetch_all().await
}

/// Validates the candidate, gives it a fresh id and persists it. The store is
/// never touched when validation fails.
pub async fn create_product(
    store: &dyn ProductStore,
    candidate: CreateProduct,
) -> AppResult<Product> {
    candidate.check()?;
    let product = candidate.into_product();
    store.insert(&product).await
}

// ── Postgres ──────────────────────────────────────────────────────────────────

/// Products table over a shared pool. Each statement checks a connection out
/// of the pool and hands it back when the statement finishes or fails.
#[derive(Clone)]
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn fetch_all(&self) -> AppResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>("SELECT id, name, price FROM products")
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    async fn insert(&self, product: &Product) -> AppResult<Product> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (id, name, price)
            VALUES ($1, $2, $3)
            RETURNING id, name, price
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(product.price)
        .fetch_one(&self.pool)
        .await?;

        Ok(product)
    }
}
