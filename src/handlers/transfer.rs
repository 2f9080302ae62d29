// CSV export and import endpoints.

use axum::body::Bytes;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::Deserialize;
use tracing::info;

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::model::ItemStatus;
use crate::server::AppState;
use crate::transfer::{ImportMode, ImportReport};

use super::parse_id;

#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    pub status: Option<String>,
}

/// GET /admin-api/export/:id?status=
///
/// Streams the collection as a CSV attachment. Rows leave the server
/// as they are encoded, so large collections never sit in memory.
pub async fn export_csv(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ApiError> {
    let collection_id = parse_id(&id, "collection")?;
    let collection = state.registry.get(collection_id).await?;
    let fields = collection.fields.unwrap_or_default();

    let status = match query.status.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(
            raw.parse::<ItemStatus>()
                .map_err(|err| ApiError::validation(err.to_string()))?,
        ),
    };

    info!("CSV export of collection '{}' started", collection.slug);
    let body = state.exporter.stream(collection_id, fields, status);
    let headers = [
        (header::CONTENT_TYPE, "text/csv".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}-export.csv\"", collection.slug),
        ),
    ];
    Ok((headers, body).into_response())
}

/// POST /admin-api/import/:id
///
/// Multipart form: `file` (required CSV) and `mode` (`create_only`
/// default, or `upsert`). Replies with the per-row outcome counters.
pub async fn import_csv(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(user): Extension<AuthUser>,
    mut multipart: Multipart,
) -> Result<Json<ImportReport>, ApiError> {
    let collection_id = parse_id(&id, "collection")?;
    let collection = state.registry.get(collection_id).await?;
    let fields = collection.fields.unwrap_or_default();

    let mut mode = ImportMode::default();
    let mut file: Option<Bytes> = None;
    while let Some(part) = multipart.next_field().await? {
        match part.name().unwrap_or("") {
            "mode" => mode = part.text().await?.parse()?,
            "file" => file = Some(part.bytes().await?),
            _ => {}
        }
    }
    let file = file.ok_or_else(|| ApiError::bad_request("file form field is required"))?;

    let report = state
        .importer
        .import(collection_id, &fields, mode, &file, Some(user.id))
        .await?;
    info!(
        "CSV import into '{}': {} written, {} errors, {} skipped",
        collection.slug, report.success, report.errors, report.skipped
    );
    Ok(Json(report))
}
