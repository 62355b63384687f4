use std::borrow::Cow;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::error::AppResult;

/// Longest accepted product name, in characters.
pub const NAME_MAX_CHARS: usize = 100;

/// Persisted product. Serialized with PascalCase keys (`Id`, `Name`, `Price`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct Product {
    pub id: Uuid,
    #[schema(max_length = 100, example = "Widget")]
    pub name: String,
    /// Exact decimal, rendered as a JSON number with every stored digit.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    #[schema(value_type = f64, minimum = 0.0, example = 9.99)]
    pub price: Decimal,
}

impl Product {
    /// A new record with a freshly generated id.
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            price,
        }
    }

    pub fn location(&self) -> String {
        format!("/products/{}", self.id)
    }
}

// ── Request payloads ─────────────────────────────────────────────────────────

/// Body of `POST /products`. Any `Id` sent by the client is ignored.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct CreateProduct {
    #[serde(default, alias = "name")]
    #[validate(
        custom(function = "not_blank"),
        length(max = 100, message = "Name must be at most 100 characters")
    )]
    #[schema(min_length = 1, max_length = 100, example = "Widget")]
    pub name: String,

    /// Defaults to 0 when omitted.
    #[serde(default, alias = "price")]
    #[validate(custom(function = "non_negative"))]
    #[schema(value_type = f64, minimum = 0.0, example = 9.99)]
    pub price: Decimal,
}

impl CreateProduct {
    /// Runs every field constraint, collecting all violations at once.
    pub fn check(&self) -> AppResult<()> {
        self.validate()?;
        Ok(())
    }

    pub fn into_product(self) -> Product {
        Product::new(self.name, self.price)
    }
}

fn violation(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

fn not_blank(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(violation("required", "Name is required"));
    }
    Ok(())
}

fn non_negative(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(violation("range", "Price must be greater than or equal to 0"));
    }
    Ok(())
}
