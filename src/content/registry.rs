//! Collection and field management: the schema side of the CMS.

use serde::Deserialize;

use crate::model::{Collection, Field, FieldInput, FieldType, InvalidFieldType};
use crate::store::{Store, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("collection name is required")]
    EmptyName,
    #[error("invalid slug '{0}': use lowercase letters, digits and hyphens")]
    InvalidSlug(String),
    #[error("field name is required")]
    EmptyFieldName,
    #[error("field name '{0}' is reserved")]
    ReservedFieldName(String),
    #[error(transparent)]
    FieldType(#[from] InvalidFieldType),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Incoming collection definition from the admin API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionDraft {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
}

/// Incoming field definition from the admin API. The type arrives as raw
/// text and is validated here.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDraft {
    pub name: String,
    #[serde(default)]
    pub label: String,
    pub field_type: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub placeholder: String,
    #[serde(default)]
    pub default_value: String,
    #[serde(default)]
    pub sort_order: i64,
}

/// Manages collections and their field definitions.
#[derive(Clone)]
pub struct SchemaRegistry {
    store: Store,
}

impl SchemaRegistry {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<Collection>, RegistryError> {
        Ok(self.store.list_collections().await?)
    }

    /// Fetch one collection with its fields populated.
    pub async fn get(&self, id: i64) -> Result<Collection, RegistryError> {
        let mut collection = self.store.get_collection(id).await?;
        collection.fields = Some(self.store.list_fields(id).await?);
        Ok(collection)
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Collection, RegistryError> {
        Ok(self.store.get_collection_by_slug(slug).await?)
    }

    /// Field definitions in display order. A missing collection is a 404,
    /// not an empty list.
    pub async fn fields(&self, collection_id: i64) -> Result<Vec<Field>, RegistryError> {
        self.store.get_collection(collection_id).await?;
        Ok(self.store.list_fields(collection_id).await?)
    }

    pub async fn create(&self, draft: CollectionDraft) -> Result<Collection, RegistryError> {
        validate_collection(&draft)?;
        Ok(self
            .store
            .insert_collection(&draft.name, &draft.slug, &draft.description)
            .await?)
    }

    pub async fn update(&self, id: i64, draft: CollectionDraft) -> Result<Collection, RegistryError> {
        validate_collection(&draft)?;
        Ok(self
            .store
            .update_collection(id, &draft.name, &draft.slug, &draft.description)
            .await?)
    }

    pub async fn delete(&self, id: i64) -> Result<(), RegistryError> {
        Ok(self.store.delete_collection(id).await?)
    }

    pub async fn create_field(&self, collection_id: i64, draft: FieldDraft) -> Result<Field, RegistryError> {
        self.store.get_collection(collection_id).await?;
        let input = validate_field(draft)?;
        Ok(self.store.insert_field(collection_id, &input).await?)
    }

    pub async fn update_field(&self, id: i64, draft: FieldDraft) -> Result<Field, RegistryError> {
        let input = validate_field(draft)?;
        Ok(self.store.update_field(id, &input).await?)
    }

    pub async fn delete_field(&self, id: i64) -> Result<(), RegistryError> {
        Ok(self.store.delete_field(id).await?)
    }
}

fn validate_collection(draft: &CollectionDraft) -> Result<(), RegistryError> {
    if draft.name.trim().is_empty() {
        return Err(RegistryError::EmptyName);
    }
    if !is_valid_slug(&draft.slug) {
        return Err(RegistryError::InvalidSlug(draft.slug.clone()));
    }
    Ok(())
}

fn validate_field(draft: FieldDraft) -> Result<FieldInput, RegistryError> {
    if draft.name.trim().is_empty() {
        return Err(RegistryError::EmptyFieldName);
    }
    // the underscore namespace belongs to the CSV metadata columns
    if draft.name.starts_with('_') {
        return Err(RegistryError::ReservedFieldName(draft.name));
    }
    let field_type: FieldType = draft.field_type.parse()?;
    let label = if draft.label.trim().is_empty() {
        draft.name.clone()
    } else {
        draft.label
    };
    Ok(FieldInput {
        name: draft.name,
        label,
        field_type,
        required: draft.required,
        placeholder: draft.placeholder,
        default_value: draft.default_value,
        sort_order: draft.sort_order,
    })
}

/// URL-safe check for collection slugs: lowercase ASCII letters, digits
/// and hyphens only.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
