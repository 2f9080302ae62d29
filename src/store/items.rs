use chrono::Utc;
use serde_json::{Map, Value};

use crate::model::{Item, ItemStatus};

use super::{Store, StoreError};

const ITEM_COLUMNS: &str = "id, collection_id, slug, data, status, created_by, created_at, updated_at";

impl Store {
    pub async fn insert_item(
        &self,
        collection_id: i64,
        slug: Option<&str>,
        data: &Map<String, Value>,
        status: ItemStatus,
        created_by: Option<i64>,
    ) -> Result<Item, StoreError> {
        let now = Utc::now();
        let payload = serde_json::to_string(data)?;
        let result = sqlx::query(
            "INSERT INTO items (collection_id, slug, data, status, created_by, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(collection_id)
        .bind(slug)
        .bind(payload)
        .bind(status)
        .bind(created_by)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;
        self.get_item(result.last_insert_rowid()).await
    }

    pub async fn find_item(&self, id: i64) -> Result<Option<Item>, StoreError> {
        Ok(sqlx::query_as::<_, Item>(&format!(
            "SELECT {} FROM items WHERE id = ?",
            ITEM_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    pub async fn get_item(&self, id: i64) -> Result<Item, StoreError> {
        self.find_item(id)
            .await?
            .ok_or_else(|| StoreError::NotFound("item".to_string()))
    }

    /// Everything in the collection, newest first.
    pub async fn list_items(&self, collection_id: i64) -> Result<Vec<Item>, StoreError> {
        Ok(sqlx::query_as::<_, Item>(&format!(
            "SELECT {} FROM items WHERE collection_id = ? ORDER BY created_at DESC, id DESC",
            ITEM_COLUMNS
        ))
        .bind(collection_id)
        .fetch_all(&self.pool)
        .await?)
    }

    /// One page, newest first, optionally narrowed to a status. Also the
    /// batch fetch behind the CSV export stream.
    pub async fn list_items_page(
        &self,
        collection_id: i64,
        status: Option<ItemStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Item>, StoreError> {
        let rows = match status {
            Some(status) => {
                sqlx::query_as::<_, Item>(&format!(
                    "SELECT {} FROM items WHERE collection_id = ? AND status = ?
                     ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
                    ITEM_COLUMNS
                ))
                .bind(collection_id)
                .bind(status)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Item>(&format!(
                    "SELECT {} FROM items WHERE collection_id = ?
                     ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
                    ITEM_COLUMNS
                ))
                .bind(collection_id)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(rows)
    }

    pub async fn update_item(
        &self,
        id: i64,
        slug: Option<&str>,
        data: &Map<String, Value>,
        status: ItemStatus,
    ) -> Result<Item, StoreError> {
        let payload = serde_json::to_string(data)?;
        let result = sqlx::query("UPDATE items SET slug = ?, data = ?, status = ?, updated_at = ? WHERE id = ?")
            .bind(slug)
            .bind(payload)
            .bind(status)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("item".to_string()));
        }
        self.get_item(id).await
    }

    pub async fn delete_item(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM items WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("item".to_string()));
        }
        Ok(())
    }
}
