// Router assembly and shared application state.

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post, put};
use axum::{middleware, Json, Router};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{ApiKeyService, SessionConfig, SessionService};
use crate::config::AppConfig;
use crate::content::{ItemService, SchemaRegistry};
use crate::handlers;
use crate::middleware::{require_api_key, require_session};
use crate::store::Store;
use crate::transfer::{CsvExporter, CsvImporter};

/// Everything the handlers need. Cloned per request; every member is
/// either a pool handle or plain data.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: Store,
    pub registry: SchemaRegistry,
    pub items: ItemService,
    pub keys: ApiKeyService,
    pub sessions: SessionService,
    pub exporter: CsvExporter,
    pub importer: CsvImporter,
}

impl AppState {
    pub fn new(config: AppConfig, store: Store) -> Self {
        let items = ItemService::new(store.clone());
        let sessions = SessionService::new(
            store.clone(),
            SessionConfig {
                jwt_secret: config.security.jwt_secret.clone(),
                ttl_hours: config.security.session_ttl_hours,
            },
        );
        Self {
            registry: SchemaRegistry::new(store.clone()),
            keys: ApiKeyService::new(store.clone()),
            exporter: CsvExporter::new(store.clone()),
            importer: CsvImporter::new(items.clone()),
            items,
            sessions,
            config,
            store,
        }
    }
}

/// Build the full application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(content_routes(&state))
        .merge(admin_routes(&state))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Public content API, key-guarded as a group.
fn content_routes(state: &AppState) -> Router<AppState> {
    use handlers::content;

    Router::new()
        .route("/api/collections/:slug", get(content::content_list))
        .route("/api/collections/:slug/:id", get(content::content_get))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ))
}

/// Admin API. Login is open; everything else sits behind the session
/// guard. The import route carries its own body limit.
fn admin_routes(state: &AppState) -> Router<AppState> {
    use handlers::{api_keys, collections, items, session, stats, transfer};

    let guarded = Router::new()
        .route("/admin-api/logout", post(session::logout))
        .route("/admin-api/me", get(session::me))
        .route("/admin-api/stats", get(stats::overview))
        .route(
            "/admin-api/collections",
            get(collections::collection_list).post(collections::collection_create),
        )
        .route(
            "/admin-api/collections/:id",
            get(collections::collection_get)
                .put(collections::collection_update)
                .delete(collections::collection_delete),
        )
        .route(
            "/admin-api/collections/:id/fields",
            get(collections::field_list).post(collections::field_create),
        )
        .route(
            "/admin-api/fields/:id",
            put(collections::field_update).delete(collections::field_delete),
        )
        .route(
            "/admin-api/collections/:id/items",
            get(items::item_list).post(items::item_create),
        )
        .route(
            "/admin-api/items/:id",
            get(items::item_get)
                .put(items::item_update)
                .delete(items::item_delete),
        )
        .route(
            "/admin-api/api-keys",
            get(api_keys::key_list).post(api_keys::key_create),
        )
        .route("/admin-api/api-keys/:id/revoke", post(api_keys::key_revoke))
        .route("/admin-api/api-keys/:id", delete(api_keys::key_delete))
        .route("/admin-api/export/:id", get(transfer::export_csv))
        .route(
            "/admin-api/import/:id",
            post(transfer::import_csv)
                .layer(DefaultBodyLimit::max(state.config.limits.max_upload_bytes)),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    Router::new()
        .route("/admin-api/login", post(session::login))
        .merge(guarded)
}

/// GET /health
async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "timestamp": now, "database": "ok" })),
        ),
        Err(err) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "degraded", "timestamp": now, "database": err.to_string() })),
        ),
    }
}
