// The public, key-authenticated content API. Read-only, published
// items only, and responses never include the author.

use axum::extract::{Path, Query, State};
use axum::Json;

use crate::error::ApiError;
use crate::model::{ItemProjection, ItemStatus};
use crate::server::AppState;

use super::items::PageQuery;
use super::parse_id;

/// GET /api/collections/:slug
pub async fn content_list(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<ItemProjection>>, ApiError> {
    let collection = state.registry.get_by_slug(&slug).await?;
    let items = state
        .items
        .list_page(collection.id, Some(ItemStatus::Published), query.page())
        .await?;
    Ok(Json(items.into_iter().map(ItemProjection::from).collect()))
}

/// GET /api/collections/:slug/:id. The item must live in the named
/// collection and be published; anything else reads as absent.
pub async fn content_get(
    State(state): State<AppState>,
    Path((slug, id)): Path<(String, String)>,
) -> Result<Json<ItemProjection>, ApiError> {
    let item_id = parse_id(&id, "item")?;
    let collection = state.registry.get_by_slug(&slug).await?;
    let item = state
        .items
        .find(item_id)
        .await?
        .filter(|item| item.collection_id == collection.id)
        .filter(|item| item.status == ItemStatus::Published)
        .ok_or_else(|| ApiError::not_found("item not found"))?;
    Ok(Json(ItemProjection::from(item)))
}
