//! API error types with IntoResponse
//!
//! Errors are converted to `{"error": "..."}` JSON bodies with a matching status.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::StoreError;
use crate::models::ValidationError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Request body failed validation (400)
    Validation(ValidationError),

    /// Malformed path or query parameter (400)
    BadRequest { message: &'static str },

    /// Resource not found (404)
    NotFound { resource: &'static str },

    /// Store failure while performing `action` (500, logged)
    Store {
        action: &'static str,
        source: StoreError,
    },
}

impl ApiError {
    pub fn bad_request(message: &'static str) -> Self {
        Self::BadRequest { message }
    }

    /// Adapter for `map_err` on list service calls.
    ///
    /// ```ignore
    /// state.list.reload().await.map_err(ApiError::store("fetch items"))?;
    /// ```
    pub fn store(action: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| Self::Store { action, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Validation(e) => e.to_string(),
            Self::BadRequest { message } => (*message).to_string(),
            Self::NotFound { resource } => format!("{} not found", resource),
            Self::Store { action, source } => {
                // Log the actual error, return generic message
                tracing::error!(error = %source, action, "Store error");
                format!("Failed to {}", action)
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}
