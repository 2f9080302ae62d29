// Admin CRUD for collections and their field definitions.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::content::{CollectionDraft, FieldDraft};
use crate::error::ApiError;
use crate::model::{Collection, Field};
use crate::server::AppState;

use super::parse_id;

/// GET /admin-api/collections. Collections come back without their
/// fields; fetch one by id for the full definition.
pub async fn collection_list(
    State(state): State<AppState>,
) -> Result<Json<Vec<Collection>>, ApiError> {
    Ok(Json(state.registry.list().await?))
}

/// POST /admin-api/collections
pub async fn collection_create(
    State(state): State<AppState>,
    Json(draft): Json<CollectionDraft>,
) -> Result<(StatusCode, Json<Collection>), ApiError> {
    let collection = state.registry.create(draft).await?;
    Ok((StatusCode::CREATED, Json(collection)))
}

/// GET /admin-api/collections/:id
pub async fn collection_get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Collection>, ApiError> {
    let id = parse_id(&id, "collection")?;
    Ok(Json(state.registry.get(id).await?))
}

/// PUT /admin-api/collections/:id
pub async fn collection_update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(draft): Json<CollectionDraft>,
) -> Result<Json<Collection>, ApiError> {
    let id = parse_id(&id, "collection")?;
    Ok(Json(state.registry.update(id, draft).await?))
}

/// DELETE /admin-api/collections/:id. Fields and items cascade away
/// with the collection.
pub async fn collection_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id, "collection")?;
    state.registry.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /admin-api/collections/:id/fields
pub async fn field_list(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Field>>, ApiError> {
    let id = parse_id(&id, "collection")?;
    Ok(Json(state.registry.fields(id).await?))
}

/// POST /admin-api/collections/:id/fields
pub async fn field_create(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(draft): Json<FieldDraft>,
) -> Result<(StatusCode, Json<Field>), ApiError> {
    let id = parse_id(&id, "collection")?;
    let field = state.registry.create_field(id, draft).await?;
    Ok((StatusCode::CREATED, Json(field)))
}

/// PUT /admin-api/fields/:id
pub async fn field_update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(draft): Json<FieldDraft>,
) -> Result<Json<Field>, ApiError> {
    let id = parse_id(&id, "field")?;
    Ok(Json(state.registry.update_field(id, draft).await?))
}

/// DELETE /admin-api/fields/:id. Item data keyed by the removed field
/// stays in place as opaque passthrough values.
pub async fn field_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id, "field")?;
    state.registry.delete_field(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
