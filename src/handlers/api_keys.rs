// Admin management of content API keys.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::model::{ApiKey, CreatedApiKey};
use crate::server::AppState;

use super::parse_id;

#[derive(Debug, Deserialize)]
pub struct CreateKeyRequest {
    #[serde(default)]
    pub name: String,
}

/// GET /admin-api/api-keys
pub async fn key_list(State(state): State<AppState>) -> Result<Json<Vec<ApiKey>>, ApiError> {
    Ok(Json(state.keys.list().await?))
}

/// POST /admin-api/api-keys. The response is the only place the
/// plaintext key ever appears.
pub async fn key_create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<CreateKeyRequest>,
) -> Result<(StatusCode, Json<CreatedApiKey>), ApiError> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(ApiError::validation("key name is required"));
    }
    let created = state.keys.create(name, Some(user.id)).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// POST /admin-api/api-keys/:id/revoke
pub async fn key_revoke(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id, "API key")?;
    state.keys.revoke(id).await?;
    Ok(Json(json!({ "message": "API key revoked" })))
}

/// DELETE /admin-api/api-keys/:id
pub async fn key_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id, "API key")?;
    state.keys.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
