use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// A stored API key. Only the SHA-256 hash of the plaintext is persisted
/// and it never leaves the server; `key_prefix` is the display stub shown
/// in the admin panel.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ApiKey {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing)]
    pub key_hash: String,
    pub key_prefix: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<DateTime<Utc>>,
    pub is_active: bool,
}

/// Creation response: the stored record plus the plaintext key, which is
/// shown exactly once.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedApiKey {
    #[serde(flatten)]
    pub record: ApiKey,
    pub key: String,
}
