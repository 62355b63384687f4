use std::sync::Arc;

use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod config;
pub mod db;
pub mod docs;
pub mod error;
pub mod handlers;
pub mod models;

use crate::config::Environment;
use crate::db::ProductStore;

/// Shared application state. Cloning only bumps the store's refcount.
#[derive(Clone)]
pub struct AppState {
    pub products: Arc<dyn ProductStore>,
}

impl AppState {
    pub fn new(products: impl ProductStore + 'static) -> Self {
        Self {
            products: Arc::new(products),
        }
    }
}

pub fn build_router(state: AppState, environment: Environment) -> Router {
    let mut router: Router = Router::new()
        // ── Health ──────────────────────────────────────────────────────────
        .route("/", get(handlers::root))

        // ── Products ────────────────────────────────────────────────────────
        .route(
            "/products",
            get(handlers::products::list_products).post(handlers::products::create_product),
        )
        .with_state(state);

    // ── API docs (development only) ─────────────────────────────────────────
    if environment.is_development() {
        router = router.merge(docs::routes());
    }

    // ── Middleware ──────────────────────────────────────────────────────────
    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    )
}
