pub mod products;

/// Body of `GET /`.
pub const LIVENESS_TEXT: &str = "MyMicroservice API is running";

#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses((status = 200, description = "Service is up", body = String, content_type = "text/plain"))
)]
pub async fn root() -> &'static str {
    LIVENESS_TEXT
}
