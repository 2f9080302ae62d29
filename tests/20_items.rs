// Schema registry and item facade behavior.

use anyhow::Result;
use serde_json::{json, Map, Value};

use cabin::content::{
    CollectionDraft, FieldDraft, ItemDraft, ItemService, Page, SchemaRegistry,
};
use cabin::model::ItemStatus;
use cabin::store::Store;

fn collection_draft(name: &str, slug: &str) -> CollectionDraft {
    CollectionDraft {
        name: name.to_string(),
        slug: slug.to_string(),
        description: String::new(),
    }
}

fn field_draft(name: &str, field_type: &str, required: bool) -> FieldDraft {
    FieldDraft {
        name: name.to_string(),
        label: String::new(),
        field_type: field_type.to_string(),
        required,
        placeholder: String::new(),
        default_value: String::new(),
        sort_order: 0,
    }
}

fn data(pairs: &[(&str, Value)]) -> Map<String, Value> {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}

async fn blog() -> Result<(SchemaRegistry, ItemService, i64)> {
    let store = Store::open_in_memory().await?;
    let registry = SchemaRegistry::new(store.clone());
    let items = ItemService::new(store);

    let posts = registry.create(collection_draft("Posts", "posts")).await?;
    registry
        .create_field(posts.id, field_draft("title", "text", true))
        .await?;
    registry
        .create_field(posts.id, field_draft("views", "number", false))
        .await?;
    registry
        .create_field(posts.id, field_draft("live", "boolean", false))
        .await?;
    Ok((registry, items, posts.id))
}

#[tokio::test]
async fn registry_rejects_bad_definitions() -> Result<()> {
    let (registry, _, posts) = blog().await?;

    let err = registry
        .create(collection_draft("  ", "blank"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "collection name is required");

    let err = registry
        .create(collection_draft("Mixed", "Not A Slug"))
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid slug 'Not A Slug': use lowercase letters, digits and hyphens"
    );

    let err = registry
        .create_field(posts, field_draft("_id", "text", false))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "field name '_id' is reserved");

    let err = registry
        .create_field(posts, field_draft("body", "json", false))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "invalid field type 'json'");
    Ok(())
}

#[tokio::test]
async fn field_label_defaults_to_the_name() -> Result<()> {
    let (registry, _, posts) = blog().await?;
    let field = registry
        .create_field(posts, field_draft("summary", "textarea", false))
        .await?;
    assert_eq!(field.label, "summary");

    let fields = registry.fields(posts).await?;
    assert_eq!(fields.len(), 4);
    Ok(())
}

#[tokio::test]
async fn single_fetch_includes_fields_but_list_does_not() -> Result<()> {
    let (registry, _, posts) = blog().await?;

    let full = registry.get(posts).await?;
    let fields = full.fields.expect("fields populated on single fetch");
    assert_eq!(fields.len(), 3);

    let listed = registry.list().await?;
    assert!(listed[0].fields.is_none());
    Ok(())
}

#[tokio::test]
async fn item_create_applies_defaults_and_coercion() -> Result<()> {
    let (_, items, posts) = blog().await?;

    let created = items
        .create(
            posts,
            ItemDraft {
                slug: Some(String::new()),
                data: data(&[
                    ("title", json!("Hello")),
                    ("views", json!("41")),
                    ("live", json!("yes")),
                    ("legacy", json!({"kept": true})),
                ]),
                status: None,
            },
            None,
        )
        .await?;

    assert_eq!(created.status, ItemStatus::Draft);
    assert_eq!(created.slug, None);
    assert_eq!(created.data["title"], json!("Hello"));
    assert_eq!(created.data["views"], json!(41.0));
    assert_eq!(created.data["live"], json!(true));
    // Keys without a matching field pass through untouched.
    assert_eq!(created.data["legacy"], json!({"kept": true}));
    Ok(())
}

#[tokio::test]
async fn item_create_enforces_validation() -> Result<()> {
    let (_, items, posts) = blog().await?;

    let err = items
        .create(
            posts,
            ItemDraft {
                slug: None,
                data: data(&[("views", json!("12"))]),
                status: None,
            },
            None,
        )
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "required field 'title' is empty");

    let err = items
        .create(
            posts,
            ItemDraft {
                slug: None,
                data: data(&[("title", json!("ok")), ("views", json!("12px"))]),
                status: None,
            },
            None,
        )
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "invalid number for field 'views'");

    let err = items
        .create(
            posts,
            ItemDraft {
                slug: None,
                data: data(&[("title", json!("ok"))]),
                status: Some("live".to_string()),
            },
            None,
        )
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "invalid status 'live'");
    Ok(())
}

#[tokio::test]
async fn update_replaces_data_wholesale() -> Result<()> {
    let (_, items, posts) = blog().await?;
    let created = items
        .create(
            posts,
            ItemDraft {
                slug: Some("first".to_string()),
                data: data(&[("title", json!("One")), ("views", json!(9.0))]),
                status: Some("published".to_string()),
            },
            None,
        )
        .await?;

    let updated = items
        .update(
            created.id,
            ItemDraft {
                slug: None,
                data: data(&[("title", json!("Two"))]),
                status: Some("archived".to_string()),
            },
        )
        .await?;

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.slug, None);
    assert_eq!(updated.status, ItemStatus::Archived);
    assert_eq!(updated.data["title"], json!("Two"));
    // No partial merge: the old views value is gone.
    assert!(!updated.data.contains_key("views"));
    Ok(())
}

#[tokio::test]
async fn listing_without_a_page_returns_everything() -> Result<()> {
    let (_, items, posts) = blog().await?;
    for n in 0..7 {
        items
            .create(
                posts,
                ItemDraft {
                    slug: None,
                    data: data(&[("title", json!(format!("Post {}", n)))]),
                    status: None,
                },
                None,
            )
            .await?;
    }

    assert_eq!(items.list(posts).await?.len(), 7);

    let page = items
        .list_page(posts, None, Page { limit: 3, offset: 3 })
        .await?;
    assert_eq!(page.len(), 3);
    assert_eq!(page[0].data["title"], json!("Post 3"));
    Ok(())
}

#[tokio::test]
async fn page_parsing_is_lenient() {
    assert_eq!(Page::from_raw(None, None), Page { limit: 50, offset: 0 });
    assert_eq!(
        Page::from_raw(Some("10"), Some("20")),
        Page { limit: 10, offset: 20 }
    );
    assert_eq!(
        Page::from_raw(Some("500"), None),
        Page { limit: 100, offset: 0 }
    );
    assert_eq!(
        Page::from_raw(Some("0"), Some("-3")),
        Page { limit: 50, offset: 0 }
    );
    assert_eq!(
        Page::from_raw(Some("abc"), Some("xyz")),
        Page { limit: 50, offset: 0 }
    );
}

#[tokio::test]
async fn operations_on_missing_records_are_not_found() -> Result<()> {
    let (registry, items, _) = blog().await?;

    let err = items.get(999).await.unwrap_err();
    assert_eq!(err.to_string(), "item not found");
    let err = items.list(999).await.unwrap_err();
    assert_eq!(err.to_string(), "collection not found");
    let err = registry.fields(999).await.unwrap_err();
    assert_eq!(err.to_string(), "collection not found");
    Ok(())
}
