//! The id-keyed record store.

use crate::catid::CatId;
use crate::error::{BibError, Result};
use crate::record::{FieldName, Record};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Records keyed by id.
///
/// Ids are unique: inserting a record whose id is already present replaces the
/// earlier record in place. Iteration follows first-insertion order, which is the
/// order used when a file is written without an outline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordStore {
    records: IndexMap<String, Record>,
}

impl RecordStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, returning the record it replaced.
    pub fn insert(&mut self, record: Record) -> Option<Record> {
        self.records.insert(record.id.clone(), record)
    }

    /// Get a record by id
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Record> {
        self.records.get(id)
    }

    /// Get a mutable record by id
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Record> {
        self.records.get_mut(id)
    }

    /// Remove a record by id, keeping the order of the others.
    pub fn remove(&mut self, id: &str) -> Option<Record> {
        self.records.shift_remove(id)
    }

    /// Whether a record with this id exists
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    /// Number of records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over records
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    /// File the record `id` under `key`, or unassign it with `None`.
    ///
    /// # Errors
    ///
    /// Returns [`BibError::RecordNotFound`] if no record has this id; the store is not
    /// changed.
    pub fn set_category(&mut self, id: &str, key: Option<CatId>) -> Result<()> {
        let record = self
            .records
            .get_mut(id)
            .ok_or_else(|| BibError::RecordNotFound(id.to_string()))?;
        record.category_key = key;
        Ok(())
    }

    /// Replace every occurrence of `from` with `to` in `field` across all records,
    /// e.g. `"GUI"` to `"{GUI}"` in titles or `"System"` to `"Syst."` in journal names.
    ///
    /// Returns the number of records whose value changed. An empty `from` changes
    /// nothing.
    pub fn replace_in(&mut self, field: FieldName, from: &str, to: &str) -> usize {
        if from.is_empty() {
            return 0;
        }
        let mut changed = 0;
        for record in self.records.values_mut() {
            let Some(value) = record.fields.get_mut(&field) else {
                continue;
            };
            if value.contains(from) {
                *value = value.replace(from, to);
                changed += 1;
            }
        }
        debug!(%field, from, to, changed, "replaced field text");
        changed
    }
}

impl FromIterator<Record> for RecordStore {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        let mut store = RecordStore::new();
        store.extend(iter);
        store
    }
}

impl Extend<Record> for RecordStore {
    fn extend<I: IntoIterator<Item = Record>>(&mut self, iter: I) {
        for record in iter {
            self.insert(record);
        }
    }
}

impl<'a> IntoIterator for &'a RecordStore {
    type Item = &'a Record;
    type IntoIter = indexmap::map::Values<'a, String, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.values()
    }
}
