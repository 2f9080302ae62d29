use chrono::Utc;

use crate::model::{Collection, Field, FieldInput};

use super::{Store, StoreError};

impl Store {
    pub async fn insert_collection(
        &self,
        name: &str,
        slug: &str,
        description: &str,
    ) -> Result<Collection, StoreError> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO collections (name, slug, description, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(name)
        .bind(slug)
        .bind(description)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;
        self.get_collection(result.last_insert_rowid()).await
    }

    pub async fn get_collection(&self, id: i64) -> Result<Collection, StoreError> {
        sqlx::query_as::<_, Collection>(
            "SELECT id, name, slug, description, created_at, updated_at
             FROM collections WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound("collection".to_string()))
    }

    pub async fn get_collection_by_slug(&self, slug: &str) -> Result<Collection, StoreError> {
        sqlx::query_as::<_, Collection>(
            "SELECT id, name, slug, description, created_at, updated_at
             FROM collections WHERE slug = ?",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound("collection".to_string()))
    }

    pub async fn list_collections(&self) -> Result<Vec<Collection>, StoreError> {
        Ok(sqlx::query_as::<_, Collection>(
            "SELECT id, name, slug, description, created_at, updated_at
             FROM collections ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    pub async fn update_collection(
        &self,
        id: i64,
        name: &str,
        slug: &str,
        description: &str,
    ) -> Result<Collection, StoreError> {
        let result = sqlx::query(
            "UPDATE collections SET name = ?, slug = ?, description = ?, updated_at = ? WHERE id = ?",
        )
        .bind(name)
        .bind(slug)
        .bind(description)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("collection".to_string()));
        }
        self.get_collection(id).await
    }

    /// Fields and items go with the collection via foreign key cascade.
    pub async fn delete_collection(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM collections WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("collection".to_string()));
        }
        Ok(())
    }

    pub async fn insert_field(&self, collection_id: i64, field: &FieldInput) -> Result<Field, StoreError> {
        let result = sqlx::query(
            "INSERT INTO collection_fields
             (collection_id, name, label, field_type, required, placeholder, default_value, sort_order, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(collection_id)
        .bind(&field.name)
        .bind(&field.label)
        .bind(field.field_type)
        .bind(field.required)
        .bind(&field.placeholder)
        .bind(&field.default_value)
        .bind(field.sort_order)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        self.get_field(result.last_insert_rowid()).await
    }

    pub async fn get_field(&self, id: i64) -> Result<Field, StoreError> {
        sqlx::query_as::<_, Field>(
            "SELECT id, collection_id, name, label, field_type, required, placeholder, default_value, sort_order, created_at
             FROM collection_fields WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound("field".to_string()))
    }

    /// Display order: explicit sort_order first, insertion order as the
    /// tie-break.
    pub async fn list_fields(&self, collection_id: i64) -> Result<Vec<Field>, StoreError> {
        Ok(sqlx::query_as::<_, Field>(
            "SELECT id, collection_id, name, label, field_type, required, placeholder, default_value, sort_order, created_at
             FROM collection_fields WHERE collection_id = ? ORDER BY sort_order ASC, id ASC",
        )
        .bind(collection_id)
        .fetch_all(&self.pool)
        .await?)
    }

    pub async fn update_field(&self, id: i64, field: &FieldInput) -> Result<Field, StoreError> {
        let result = sqlx::query(
            "UPDATE collection_fields
             SET name = ?, label = ?, field_type = ?, required = ?, placeholder = ?, default_value = ?, sort_order = ?
             WHERE id = ?",
        )
        .bind(&field.name)
        .bind(&field.label)
        .bind(field.field_type)
        .bind(field.required)
        .bind(&field.placeholder)
        .bind(&field.default_value)
        .bind(field.sort_order)
        .bind(id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("field".to_string()));
        }
        self.get_field(id).await
    }

    pub async fn delete_field(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM collection_fields WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("field".to_string()));
        }
        Ok(())
    }
}
