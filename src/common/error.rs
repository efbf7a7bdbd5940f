// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::collections::BTreeMap;

use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed")]
    ValidationError(#[from] ValidationErrors),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Already exists: {0}")]
    UniquenessConflict(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Anything unexpected; `anyhow` keeps the context chain.
    #[error("Internal server error: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    pub fn not_found(what: impl Into<String>) -> Self {
        AppError::NotFound(what.into())
    }

    pub fn conflict(what: impl Into<String>) -> Self {
        AppError::UniquenessConflict(what.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::UniquenessConflict(_) => StatusCode::CONFLICT,
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Messages per field, keyed by the camelCase name used in request bodies.
pub fn validation_details(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, field_errors)| {
            let messages = field_errors
                .iter()
                .map(|e| match &e.message {
                    Some(m) => m.to_string(),
                    None => e.code.to_string(),
                })
                .collect();
            (camel_case(&field), messages)
        })
        .collect()
}

// `billable_days` -> `billableDays`
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper_next = false;
    for c in field.chars() {
        if c == '_' {
            upper_next = !out.is_empty();
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            // Every field with its messages, so the form can highlight them.
            AppError::ValidationError(errors) => json!({
                "error": "One or more fields are invalid.",
                "details": validation_details(&errors),
            }),
            AppError::NotFound(what) => json!({ "error": format!("{what} not found.") }),
            AppError::UniquenessConflict(what) => json!({ "error": format!("{what} already exists.") }),
            ref e => {
                tracing::error!("Internal server error: {}", e);
                json!({ "error": "An unexpected error occurred." })
            }
        };

        (status, Json(body)).into_response()
    }
}
