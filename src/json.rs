//! JSON serialization and deserialization of records.
//!
//! A store is represented as a JSON object keyed by record id. Each record is an
//! object with its type, id, field map and optional `category_key` (the raw key value).
//!
//! # Examples
//!
//! ```
//! use bibtoc::{json, EntryType, Record, RecordStore};
//!
//! let store: RecordStore = vec![
//!     Record::builder(EntryType::Book, "taocp").title("TAOCP").build(),
//! ]
//! .into_iter()
//! .collect();
//!
//! let value = json::store_to_json(&store)?;
//! assert_eq!(value["taocp"]["fields"]["title"], "TAOCP");
//!
//! let restored = json::json_to_store(&value)?;
//! assert_eq!(restored, store);
//! # Ok::<(), bibtoc::BibError>(())
//! ```

use crate::error::Result;
use crate::record::Record;
use crate::store::RecordStore;
use serde::Deserialize;
use serde_json::Value;

/// Convert a record to JSON.
///
/// # Errors
///
/// Returns an error if the record cannot be converted to JSON.
pub fn record_to_json(record: &Record) -> Result<Value> {
    Ok(serde_json::to_value(record)?)
}

/// Convert JSON back to a record.
///
/// # Errors
///
/// Returns an error if the JSON does not describe a record.
pub fn json_to_record(json: &Value) -> Result<Record> {
    Ok(Record::deserialize(json)?)
}

/// Convert a whole store to a JSON object keyed by id.
///
/// # Errors
///
/// Returns an error if a record cannot be converted to JSON.
pub fn store_to_json(store: &RecordStore) -> Result<Value> {
    Ok(serde_json::to_value(store)?)
}

/// Convert a JSON object keyed by id back to a store.
///
/// Records are re-keyed by their own `id` field.
///
/// # Errors
///
/// Returns an error if the JSON is not an object of records.
pub fn json_to_store(json: &Value) -> Result<RecordStore> {
    let store = RecordStore::deserialize(json)?;
    Ok(store.iter().cloned().collect())
}
