//! Counter check endpoint for polling clients

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::http::error::ApiError;
use crate::models::UpdateCheck;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CheckParams {
    pub counter: Option<String>,
}

/// GET /api/check?counter=N
///
/// Bumps the list counter when `N` is current; otherwise reports the
/// current value so the client knows to reload.
async fn check(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CheckParams>,
) -> Result<Json<UpdateCheck>, ApiError> {
    let counter = params
        .counter
        .as_deref()
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .ok_or_else(|| ApiError::bad_request("Invalid counter value"))?;

    let outcome = state
        .list
        .check_counter(counter)
        .await
        .map_err(ApiError::store("update check"))?;

    Ok(Json(outcome))
}

/// Check routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/check", get(check))
}
