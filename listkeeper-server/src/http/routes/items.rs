//! Item endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::http::error::ApiError;
use crate::http::extractors::{ValidItemId, ValidJson};
use crate::models::{CheckedUpdate, Item, ItemText};
use crate::state::AppState;

/// Body of POST and PUT on items
#[derive(Debug, Default, Deserialize)]
pub struct ItemRequest {
    #[serde(default)]
    pub text: Option<String>,
    /// Raw value; see [`CheckedUpdate::from_json`]
    #[serde(default)]
    pub checked: Option<JsonValue>,
}

impl ItemRequest {
    fn parts(self) -> Result<(ItemText, CheckedUpdate), ApiError> {
        let text = ItemText::new(self.text.unwrap_or_default())?;
        let checked = CheckedUpdate::from_json(self.checked.as_ref())?;
        Ok((text, checked))
    }
}

/// GET /api/items - every item of the list, oldest first
async fn list_items(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Item>>, ApiError> {
    let items = state
        .list
        .reload()
        .await
        .map_err(ApiError::store("fetch items"))?;
    Ok(Json(items))
}

/// POST /api/items - add an item
async fn add_item(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<ItemRequest>,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    let (text, checked) = req.parts()?;
    let item = state
        .list
        .add_item(&text, checked.or_unchecked())
        .await
        .map_err(ApiError::store("add item"))?;

    Ok((StatusCode::CREATED, Json(item)))
}

/// GET /api/items/{id} - get a single item
async fn get_item(
    State(state): State<Arc<AppState>>,
    ValidItemId(id): ValidItemId,
) -> Result<Json<Item>, ApiError> {
    let item = state
        .list
        .get_item(id)
        .await
        .map_err(ApiError::store("fetch item"))?
        .ok_or(ApiError::NotFound { resource: "Item" })?;

    Ok(Json(item))
}

/// DELETE /api/items/{id} - delete an item (idempotent)
async fn delete_item(
    State(state): State<Arc<AppState>>,
    ValidItemId(id): ValidItemId,
) -> Result<&'static str, ApiError> {
    state
        .list
        .delete_item(id)
        .await
        .map_err(ApiError::store("delete item"))?;
    Ok("Item deleted successfully")
}

/// PUT /api/items/{id} - update text and, optionally, the checked flag
async fn update_item(
    State(state): State<Arc<AppState>>,
    ValidItemId(id): ValidItemId,
    ValidJson(req): ValidJson<ItemRequest>,
) -> Result<&'static str, ApiError> {
    let (text, checked) = req.parts()?;
    state
        .list
        .update_item(id, &text, checked)
        .await
        .map_err(ApiError::store("update item"))?;
    Ok("Item updated successfully")
}

/// Item routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/items", get(list_items).post(add_item))
        .route(
            "/api/items/{id}",
            get(get_item).put(update_item).delete(delete_item),
        )
}
