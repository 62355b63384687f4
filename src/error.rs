use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};
use utoipa::ToSchema;

pub type AppResult<T> = Result<T, AppError>;

/// One failed field constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldViolation {
    pub field: String,
    pub code: String,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The request decoded but broke one or more field constraints.
    #[error("validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldViolation>),

    /// The body could not be decoded at all.
    #[error(transparent)]
    InvalidBody(#[from] JsonRejection),

    /// A row with this id is already stored.
    #[error("product {0} already exists")]
    Conflict(uuid::Uuid),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// JSON body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<FieldViolation>,
    /// RFC 3339 time the error was produced.
    pub timestamp: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidBody(rejection) => rejection.status(),
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(err) if is_unavailable(err) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Database(err) if is_check_violation(err) => StatusCode::BAD_REQUEST,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_error",
            AppError::InvalidBody(_) => "invalid_body",
            AppError::Conflict(_) => "conflict",
            AppError::Database(err) if is_unavailable(err) => "database_unavailable",
            AppError::Database(err) if is_check_violation(err) => "constraint_violation",
            AppError::Database(_) => "database_error",
        }
    }
}

fn is_unavailable(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
    )
}

fn is_check_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_check_violation())
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        let (message, violations) = match self {
            AppError::Validation(violations) => {
                warn!(violations = violations.len(), "Rejected invalid product");
                let message = violations
                    .iter()
                    .map(|v| v.message.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                (message, violations)
            }
            AppError::InvalidBody(rejection) => {
                warn!(status = %status, "Rejected undecodable request body");
                (rejection.body_text(), Vec::new())
            }
            AppError::Conflict(id) => {
                warn!(id = %id, "Rejected duplicate product id");
                (format!("Product {id} already exists"), Vec::new())
            }
            AppError::Database(err) => {
                // Driver text stays in the log, never in the response.
                error!(error = %err, status = %status, "Database error");
                let message = match status {
                    StatusCode::SERVICE_UNAVAILABLE => "Database is unavailable",
                    StatusCode::BAD_REQUEST => "Record violates a database constraint",
                    _ => "Internal server error",
                };
                (message.to_string(), Vec::new())
            }
        };

        let body = ErrorBody {
            error: code.to_string(),
            message,
            violations,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut violations: Vec<FieldViolation> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| FieldViolation {
                    field: field.to_string(),
                    code: error.code.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|msg| msg.to_string())
                        .unwrap_or_else(|| format!("{field} is invalid")),
                })
            })
            .collect();

        // field_errors() is backed by a HashMap
        violations.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.code.cmp(&b.code)));

        AppError::Validation(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn violation(field: &str) -> FieldViolation {
        FieldViolation {
            field: field.to_string(),
            code: "length".to_string(),
            message: format!("{field} is too long"),
        }
    }

    #[tokio::test]
    async fn validation_is_a_client_error_with_violations() {
        let (status, body) = body_json(AppError::Validation(vec![violation("name")])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
        assert_eq!(body["message"], "name is too long");
        assert_eq!(body["violations"][0]["field"], "name");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn pool_timeout_is_service_unavailable() {
        let (status, body) = body_json(AppError::Database(sqlx::Error::PoolTimedOut)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "database_unavailable");
        assert!(body.get("violations").is_none());
    }

    #[tokio::test]
    async fn other_database_errors_are_internal_and_opaque() {
        let err = AppError::Database(sqlx::Error::Protocol("secret driver detail".into()));
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "database_error");
        assert_eq!(body["message"], "Internal server error");
    }

    #[tokio::test]
    async fn duplicate_id_is_a_conflict() {
        let id = uuid::Uuid::new_v4();
        let (status, body) = body_json(AppError::Conflict(id)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "conflict");
        assert_eq!(body["message"], format!("Product {id} already exists"));
    }

    #[test]
    fn client_and_server_failures_are_distinguishable() {
        let client = AppError::Validation(vec![violation("price")]).status();
        let server = AppError::Database(sqlx::Error::PoolClosed).status();
        assert!(client.is_client_error());
        assert!(server.is_server_error());
    }
}
