//! Generated OpenAPI description plus a Swagger UI page that renders it.
//! Mounted only in development.

use axum::{response::Html, routing::get, Json, Router};
use utoipa::OpenApi;

use crate::error::{ErrorBody, FieldViolation};
use crate::handlers;
use crate::models::{CreateProduct, Product};

pub const OPENAPI_PATH: &str = "/swagger/v1/swagger.json";
pub const UI_PATH: &str = "/swagger";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Product Service API",
        version = "v1",
        description = "List and create products."
    ),
    paths(
        handlers::root,
        handlers::products::list_products,
        handlers::products::create_product,
    ),
    components(schemas(Product, CreateProduct, ErrorBody, FieldViolation)),
    tags(
        (name = "health", description = "Liveness"),
        (name = "products", description = "Product catalogue"),
    )
)]
pub struct ApiDoc;

pub fn routes() -> Router {
    Router::new()
        .route(OPENAPI_PATH, get(openapi_json))
        .route(UI_PATH, get(swagger_ui))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

async fn swagger_ui() -> Html<String> {
    Html(SWAGGER_UI_TEMPLATE.replace("{{OPENAPI_PATH}}", OPENAPI_PATH))
}

const SWAGGER_UI_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>Product Service API v1</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js" crossorigin></script>
  <script>
    window.onload = () => {
      window.ui = SwaggerUIBundle({ url: "{{OPENAPI_PATH}}", dom_id: "#swagger-ui" });
    };
  </script>
</body>
</html>
"##;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let paths = doc["paths"].as_object().unwrap();

        assert!(paths.contains_key("/"));
        assert!(paths["/products"].get("get").is_some());
        assert!(paths["/products"].get("post").is_some());
        assert!(paths["/products"].get("put").is_none());
    }

    #[test]
    fn product_schema_uses_wire_names() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let props = &doc["components"]["schemas"]["Product"]["properties"];

        for key in ["Id", "Name", "Price"] {
            assert!(props.get(key).is_some(), "missing {key}");
        }
    }

    #[tokio::test]
    async fn ui_points_at_the_document() {
        let Html(page) = swagger_ui().await;
        assert!(page.contains(&format!(r#"url: "{OPENAPI_PATH}""#)));
        assert!(page.contains(r##"dom_id: "#swagger-ui""##));
        assert!(page.trim_end().ends_with("</html>"));
    }
}
