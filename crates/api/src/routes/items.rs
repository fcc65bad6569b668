//! Reusable line item routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::AppState;
use crate::error::ApiResult;
use crate::middleware::AuthUser;
use invoxa_db::entities::items;
use invoxa_db::repositories::ItemRepository;

/// Creates the item routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route("/items/{item_id}", put(update_item).delete(delete_item))
}

/// Request body for an item.
#[derive(Debug, Deserialize, Validate)]
pub struct ItemRequest {
    /// What is sold.
    #[validate(length(min = 1, max = 500, message = "is required"))]
    pub description: String,
    /// Unit price.
    pub rate: Decimal,
}

/// GET /items
async fn list_items(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<items::Model>>> {
    let items = ItemRepository::new((*state.db).clone())
        .list(auth.user_id())
        .await?;
    Ok(Json(items))
}

/// POST /items
async fn create_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<ItemRequest>,
) -> ApiResult<(StatusCode, Json<items::Model>)> {
    payload.validate()?;
    let item = ItemRepository::new((*state.db).clone())
        .create(auth.user_id(), payload.description, payload.rate)
        .await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /items/{item_id}
async fn update_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(item_id): Path<Uuid>,
    Json(payload): Json<ItemRequest>,
) -> ApiResult<Json<items::Model>> {
    payload.validate()?;
    let item = ItemRepository::new((*state.db).clone())
        .update(auth.user_id(), item_id, payload.description, payload.rate)
        .await?;
    Ok(Json(item))
}

/// DELETE /items/{item_id}
async fn delete_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(item_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    ItemRepository::new((*state.db).clone())
        .delete(auth.user_id(), item_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
