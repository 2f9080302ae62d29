// Streaming CSV export.

use std::convert::Infallible;

use axum::body::{Body, Bytes};
use futures::channel::mpsc;
use tracing::warn;

use crate::coerce;
use crate::model::{Field, Item, ItemStatus};
use crate::store::Store;

/// Fixed metadata columns that lead every export and drive upserts on
/// re-import. The underscore prefix keeps them out of the field
/// namespace.
pub const META_COLUMNS: [&str; 5] = ["_id", "_slug", "_status", "_created_at", "_updated_at"];

/// Items fetched per store round trip while streaming.
const BATCH_SIZE: i64 = 200;

/// Streams a collection's items as CSV without buffering the whole
/// result set.
#[derive(Clone)]
pub struct CsvExporter {
    store: Store,
}

impl CsvExporter {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Produce the response body for one collection, newest items
    /// first. Rows are fetched in batches and each encoded batch is
    /// handed to the client as soon as it is ready. An item whose
    /// stored data is unreadable exports with empty field cells rather
    /// than ending the stream.
    pub fn stream(
        &self,
        collection_id: i64,
        fields: Vec<Field>,
        status: Option<ItemStatus>,
    ) -> Body {
        let store = self.store.clone();
        let (sender, receiver) = mpsc::unbounded::<Result<Bytes, Infallible>>();

        tokio::spawn(async move {
            if let Some(chunk) = encode_rows(&[header_row(&fields)]) {
                if sender.unbounded_send(Ok(chunk)).is_err() {
                    return;
                }
            }

            let mut offset = 0;
            loop {
                let batch = match store
                    .list_items_page(collection_id, status, BATCH_SIZE, offset)
                    .await
                {
                    Ok(batch) => batch,
                    Err(err) => {
                        warn!("CSV export of collection {} aborted: {}", collection_id, err);
                        return;
                    }
                };
                let done = (batch.len() as i64) < BATCH_SIZE;

                if !batch.is_empty() {
                    let rows: Vec<Vec<String>> =
                        batch.iter().map(|item| item_row(item, &fields)).collect();
                    match encode_rows(&rows) {
                        Some(chunk) => {
                            if sender.unbounded_send(Ok(chunk)).is_err() {
                                // Client went away; stop fetching.
                                return;
                            }
                        }
                        None => return,
                    }
                }

                if done {
                    return;
                }
                offset += BATCH_SIZE;
            }
        });

        Body::from_stream(receiver)
    }
}

fn header_row(fields: &[Field]) -> Vec<String> {
    META_COLUMNS
        .iter()
        .map(|name| name.to_string())
        .chain(fields.iter().map(|field| field.name.clone()))
        .collect()
}

fn item_row(item: &Item, fields: &[Field]) -> Vec<String> {
    let mut row = vec![
        item.id.to_string(),
        item.slug.clone().unwrap_or_default(),
        item.status.to_string(),
        item.created_at.to_rfc3339(),
        item.updated_at.to_rfc3339(),
    ];
    for field in fields {
        row.push(coerce::render(item.data.get(&field.name)));
    }
    row
}

fn encode_rows(rows: &[Vec<String>]) -> Option<Bytes> {
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
    for row in rows {
        if let Err(err) = writer.write_record(row) {
            warn!("Failed to encode CSV row: {}", err);
            return None;
        }
    }
    match writer.into_inner() {
        Ok(buffer) => Some(Bytes::from(buffer)),
        Err(err) => {
            warn!("Failed to flush CSV buffer: {}", err);
            None
        }
    }
}
