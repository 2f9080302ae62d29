//! Item facade: every write is validated and coerced against the owning
//! collection's fields before it reaches storage.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::coerce::{self, ValidationError};
use crate::model::{Field, InvalidStatus, Item, ItemStatus};
use crate::store::{Store, StoreError};

pub const DEFAULT_PAGE_LIMIT: i64 = 50;
pub const MAX_PAGE_LIMIT: i64 = 100;

#[derive(Debug, thiserror::Error)]
pub enum ItemError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Status(#[from] InvalidStatus),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Incoming item payload, from the admin API or the CSV importer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemDraft {
    pub slug: Option<String>,
    #[serde(default)]
    pub data: Map<String, Value>,
    pub status: Option<String>,
}

/// Page window with the clamping rules already applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
        }
    }
}

impl Page {
    /// Lenient parse: anything unusable falls back to the defaults, an
    /// oversized limit clamps to the maximum.
    pub fn from_raw(limit: Option<&str>, offset: Option<&str>) -> Self {
        let limit = match limit.and_then(|v| v.parse::<i64>().ok()) {
            Some(l) if l >= 1 => l.min(MAX_PAGE_LIMIT),
            _ => DEFAULT_PAGE_LIMIT,
        };
        let offset = match offset.and_then(|v| v.parse::<i64>().ok()) {
            Some(o) if o >= 0 => o,
            _ => 0,
        };
        Self { limit, offset }
    }
}

#[derive(Clone)]
pub struct ItemService {
    store: Store,
}

impl ItemService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Validate, coerce and store a new item. Status defaults to draft.
    pub async fn create(
        &self,
        collection_id: i64,
        draft: ItemDraft,
        created_by: Option<i64>,
    ) -> Result<Item, ItemError> {
        self.store.get_collection(collection_id).await?;
        let fields = self.store.list_fields(collection_id).await?;
        let data = validate_data(&fields, &draft.data)?;
        let status = resolve_status(draft.status.as_deref())?;
        let slug = normalize_slug(draft.slug.as_deref());
        Ok(self
            .store
            .insert_item(collection_id, slug, &data, status, created_by)
            .await?)
    }

    /// Wholesale replace of slug, data and status.
    pub async fn update(&self, id: i64, draft: ItemDraft) -> Result<Item, ItemError> {
        let existing = self.store.get_item(id).await?;
        let fields = self.store.list_fields(existing.collection_id).await?;
        let data = validate_data(&fields, &draft.data)?;
        let status = resolve_status(draft.status.as_deref())?;
        let slug = normalize_slug(draft.slug.as_deref());
        Ok(self.store.update_item(id, slug, &data, status).await?)
    }

    pub async fn get(&self, id: i64) -> Result<Item, ItemError> {
        Ok(self.store.get_item(id).await?)
    }

    pub async fn find(&self, id: i64) -> Result<Option<Item>, StoreError> {
        self.store.find_item(id).await
    }

    /// Everything in the collection, newest first.
    pub async fn list(&self, collection_id: i64) -> Result<Vec<Item>, ItemError> {
        self.store.get_collection(collection_id).await?;
        Ok(self.store.list_items(collection_id).await?)
    }

    pub async fn list_page(
        &self,
        collection_id: i64,
        status: Option<ItemStatus>,
        page: Page,
    ) -> Result<Vec<Item>, ItemError> {
        self.store.get_collection(collection_id).await?;
        Ok(self
            .store
            .list_items_page(collection_id, status, page.limit, page.offset)
            .await?)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ItemError> {
        Ok(self.store.delete_item(id).await?)
    }
}

/// Coerce a raw JSON map against the field definitions. Known fields go
/// through coercion; unknown keys pass through untouched.
pub fn validate_data(fields: &[Field], raw: &Map<String, Value>) -> Result<Map<String, Value>, ValidationError> {
    let mut data = Map::new();
    for field in fields {
        let input = raw.get(&field.name).unwrap_or(&Value::Null);
        if let Some(value) = coerce::coerce_json(field, input)? {
            data.insert(field.name.clone(), value.into_json());
        }
    }
    for (key, value) in raw {
        if !fields.iter().any(|f| f.name == *key) {
            data.insert(key.clone(), value.clone());
        }
    }
    Ok(data)
}

fn resolve_status(status: Option<&str>) -> Result<ItemStatus, InvalidStatus> {
    match status {
        None | Some("") => Ok(ItemStatus::default()),
        Some(s) => s.parse(),
    }
}

fn normalize_slug(slug: Option<&str>) -> Option<&str> {
    match slug {
        Some("") | None => None,
        some => some,
    }
}
