// Admin CRUD for items.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;

use crate::content::{ItemDraft, Page};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::model::Item;
use crate::server::AppState;

use super::parse_id;

/// Raw pagination query. Values stay strings so that junk input can
/// fall back to defaults instead of failing extraction.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl PageQuery {
    pub fn is_empty(&self) -> bool {
        self.limit.is_none() && self.offset.is_none()
    }

    pub fn page(&self) -> Page {
        Page::from_raw(self.limit.as_deref(), self.offset.as_deref())
    }
}

/// GET /admin-api/collections/:id/items. Without pagination params the
/// whole collection comes back, newest first.
pub async fn item_list(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<Item>>, ApiError> {
    let collection_id = parse_id(&id, "collection")?;
    let items = if query.is_empty() {
        state.items.list(collection_id).await?
    } else {
        state.items.list_page(collection_id, None, query.page()).await?
    };
    Ok(Json(items))
}

/// POST /admin-api/collections/:id/items
pub async fn item_create(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(user): Extension<AuthUser>,
    Json(draft): Json<ItemDraft>,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    let collection_id = parse_id(&id, "collection")?;
    let item = state.items.create(collection_id, draft, Some(user.id)).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// GET /admin-api/items/:id
pub async fn item_get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Item>, ApiError> {
    let id = parse_id(&id, "item")?;
    Ok(Json(state.items.get(id).await?))
}

/// PUT /admin-api/items/:id
pub async fn item_update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(draft): Json<ItemDraft>,
) -> Result<Json<Item>, ApiError> {
    let id = parse_id(&id, "item")?;
    Ok(Json(state.items.update(id, draft).await?))
}

/// DELETE /admin-api/items/:id
pub async fn item_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id, "item")?;
    state.items.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
