//! Custom Axum extractors

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

use super::error::ApiError;

/// Extract and validate a numeric item id from the path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidItemId(pub i64);

impl ValidItemId {
    pub fn parse(raw: &str) -> Result<Self, ApiError> {
        raw.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| ApiError::bad_request("Invalid item ID"))
    }
}

impl<S> FromRequestParts<S> for ValidItemId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::bad_request("Invalid item ID"))?;

        Self::parse(&id)
    }
}

/// JSON request body whose rejection is a 400 with a JSON error body
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                tracing::debug!(error = %rejection, "Rejected request body");
                match rejection {
                    JsonRejection::MissingJsonContentType(_) => {
                        ApiError::bad_request("Expected a JSON request body")
                    }
                    _ => ApiError::bad_request("Invalid request body"),
                }
            })?;

        Ok(Self(value))
    }
}
