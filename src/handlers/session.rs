// Admin session endpoints.

use axum::extract::State;
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::server::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// POST /admin-api/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    let (token, user) = state.sessions.login(&body.username, &body.password).await?;
    info!("Admin login for '{}'", user.username);
    Ok(Json(json!({
        "token": token,
        "user": { "username": user.username, "role": user.role },
    })))
}

/// POST /admin-api/logout. Tokens are stateless, so there is nothing
/// to revoke server-side.
pub async fn logout() -> Json<Value> {
    Json(json!({ "message": "logged out" }))
}

/// GET /admin-api/me
pub async fn me(Extension(user): Extension<AuthUser>) -> Json<Value> {
    Json(json!({ "username": user.username, "role": user.role }))
}
