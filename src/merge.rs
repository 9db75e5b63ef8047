//! Cursor-bounded merge of incrementally fetched pages

use serde_json::Value;

use crate::store::ResourceStore;

/// Record field carrying the stable unique identifier.
const ID: &str = "id";

/// Merge a newest-first `page` into `existing`, bounded by `cursor` (the id
/// of the newest record already known).
///
/// With no cursor the page replaces the data wholesale. Otherwise records
/// are taken from the front of the page until one matches the cursor;
/// everything from that point on is already known. Returns the merged data
/// and the id of its new leading record.
///
/// Repeated polls converge to the ordered, deduplicated union of all
/// ever-seen records, assuming newest-first pages and stable unique ids.
pub(crate) fn merge_page(
    existing: &[Value],
    cursor: Option<&Value>,
    page: &[Value],
) -> (Vec<Value>, Option<Value>) {
    let merged: Vec<Value> = match cursor {
        None => page.to_vec(),
        Some(cursor) => {
            let known = page
                .iter()
                .position(|record| record.get(ID) == Some(cursor))
                .unwrap_or(page.len());
            page[..known].iter().chain(existing).cloned().collect()
        }
    };
    let next_cursor = merged.first().and_then(|record| record.get(ID)).cloned();
    (merged, next_cursor)
}

/// Apply a completion page to a store's running data and cursor.
///
/// Non-array pages cannot be merged: with no cursor they are stored
/// wholesale and the cursor stays unset; with a cursor the known data is
/// kept unchanged.
pub(crate) fn apply_page(store: &mut ResourceStore, page: &Value) {
    match page.as_array() {
        Some(page) => {
            let cursor = store.cursor.take();
            let existing = store
                .data
                .as_ref()
                .and_then(Value::as_array)
                .map(|records| records.as_slice())
                .unwrap_or(&[]);
            let (merged, next_cursor) = merge_page(existing, cursor.as_ref(), page);
            store.data = Some(Value::Array(merged));
            store.cursor = next_cursor;
        }
        None if store.cursor.is_none() => {
            store.data = Some(page.clone());
        }
        None => {}
    }
}
