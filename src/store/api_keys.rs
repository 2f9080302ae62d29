use chrono::Utc;

use crate::model::ApiKey;

use super::{Store, StoreError};

const KEY_COLUMNS: &str = "id, name, key_hash, key_prefix, created_by, created_at, last_used_at, is_active";

impl Store {
    pub async fn insert_api_key(
        &self,
        name: &str,
        key_hash: &str,
        key_prefix: &str,
        created_by: Option<i64>,
    ) -> Result<ApiKey, StoreError> {
        let result = sqlx::query(
            "INSERT INTO api_keys (name, key_hash, key_prefix, created_by, created_at, is_active)
             VALUES (?, ?, ?, ?, ?, 1)",
        )
        .bind(name)
        .bind(key_hash)
        .bind(key_prefix)
        .bind(created_by)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        self.get_api_key(result.last_insert_rowid()).await
    }

    pub async fn get_api_key(&self, id: i64) -> Result<ApiKey, StoreError> {
        sqlx::query_as::<_, ApiKey>(&format!("SELECT {} FROM api_keys WHERE id = ?", KEY_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound("API key".to_string()))
    }

    pub async fn list_api_keys(&self) -> Result<Vec<ApiKey>, StoreError> {
        Ok(sqlx::query_as::<_, ApiKey>(&format!(
            "SELECT {} FROM api_keys ORDER BY created_at DESC, id DESC",
            KEY_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?)
    }

    /// Lookup and liveness in one check: revoked keys never match.
    pub async fn find_active_api_key(&self, key_hash: &str) -> Result<Option<ApiKey>, StoreError> {
        Ok(sqlx::query_as::<_, ApiKey>(&format!(
            "SELECT {} FROM api_keys WHERE key_hash = ? AND is_active = 1",
            KEY_COLUMNS
        ))
        .bind(key_hash)
        .fetch_optional(&self.pool)
        .await?)
    }

    pub async fn touch_api_key(&self, id: i64) -> Result<(), StoreError> {
        sqlx::query("UPDATE api_keys SET last_used_at = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn deactivate_api_key(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE api_keys SET is_active = 0 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("API key".to_string()));
        }
        Ok(())
    }

    pub async fn delete_api_key(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM api_keys WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("API key".to_string()));
        }
        Ok(())
    }
}
