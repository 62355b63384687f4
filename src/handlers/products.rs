use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderName, StatusCode},
    Json,
};
use tracing::info;

use crate::{
    db,
    error::{AppResult, ErrorBody},
    models::{CreateProduct, Product},
    AppState,
};

// ── List ──────────────────────────────────────────────────────────────────────

#[utoipa::path(
    get,
    path = "/products",
    tag = "products",
    responses(
        (status = 200, description = "Every stored product, unordered", body = [Product]),
        (status = 503, description = "Database unreachable", body = ErrorBody),
        (status = 500, description = "Query failed", body = ErrorBody),
    )
)]
pub async fn list_products(State(state): State<AppState>) -> AppResult<Json<Vec<Product>>> {
    let start = Instant::now();
    let products = db::list_products(state.products.as_ref()).await?;

    info!(
        count = products.len(),
        elapsed_ms = start.elapsed().as_millis(),
        "Listed products"
    );

    Ok(Json(products))
}

// ── Create ────────────────────────────────────────────────────────────────────

#[utoipa::path(
    post,
    path = "/products",
    tag = "products",
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created", body = Product,
            headers(("Location" = String, description = "Path of the new product"))),
        (status = 400, description = "Field constraint violated", body = ErrorBody),
        (status = 415, description = "Body is not JSON", body = ErrorBody),
        (status = 422, description = "Body does not match the product shape", body = ErrorBody),
        (status = 503, description = "Database unreachable", body = ErrorBody),
        (status = 500, description = "Insert failed", body = ErrorBody),
    )
)]
pub async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<CreateProduct>, JsonRejection>,
) -> AppResult<(StatusCode, [(HeaderName, String); 1], Json<Product>)> {
    // decode, then validate + persist
    let Json(candidate) = payload?;

    let start = Instant::now();
    let product = db::create_product(state.products.as_ref(), candidate).await?;

    info!(
        id = %product.id,
        name = %product.name,
        elapsed_ms = start.elapsed().as_millis(),
        "Created product"
    );

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, product.location())],
        Json(product),
    ))
}
