//! Grouping records by the outline leaf they are filed under.
//!
//! [`categorize`] partitions a [`RecordStore`] against an [`IndexTree`]. Every record
//! lands in exactly one [`Bucket`]: the leaf its `category_key` names, or one of three
//! reserved buckets for records that are unassigned, point at a key the outline does
//! not contain, or point at a section that has subsections. The view borrows from the
//! store and is meant to be recomputed whenever either input changes.

use crate::catid::CatId;
use crate::error::{BibError, Result};
use crate::index_tree::IndexTree;
use crate::record::Record;
use crate::store::RecordStore;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Group header written before unassigned records.
pub const UNASSIGNED_HEADER: &str = "Uncategorized references";
/// Group header written before records filed under a non-leaf section.
pub const NON_LEAF_HEADER: &str = "References categorized not under leaf";
/// Group header written before records with an unknown key.
pub const UNKNOWN_HEADER: &str = "Unrecognized catid";

/// One cell of a [`CategorizedView`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    /// Records filed under this leaf section.
    Leaf(CatId),
    /// Records without a category key.
    Unassigned,
    /// Records whose key is not in the outline.
    Unknown,
    /// Records whose key names a section that has subsections.
    NonLeaf,
}

impl Bucket {
    /// Fixed header for the reserved buckets; `None` for leaf buckets.
    #[must_use]
    pub const fn reserved_header(&self) -> Option<&'static str> {
        match self {
            Bucket::Leaf(_) => None,
            Bucket::Unassigned => Some(UNASSIGNED_HEADER),
            Bucket::Unknown => Some(UNKNOWN_HEADER),
            Bucket::NonLeaf => Some(NON_LEAF_HEADER),
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bucket::Leaf(key) => write!(f, "{key}"),
            reserved => f.write_str(reserved.reserved_header().unwrap_or_default()),
        }
    }
}

/// Records of one bucket, ordered by id.
pub type BucketRecords<'a> = BTreeMap<&'a str, &'a Record>;

/// A partition of a record store by outline leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorizedView<'a> {
    /// One entry per leaf key, present even when empty
    pub leaves: BTreeMap<CatId, BucketRecords<'a>>,
    /// Records with no category key
    pub unassigned: BucketRecords<'a>,
    /// Records whose key is not in the outline
    pub unknown: BucketRecords<'a>,
    /// Records whose key names a non-leaf section
    pub non_leaf: BucketRecords<'a>,
}

impl<'a> CategorizedView<'a> {
    /// Records in a bucket. `None` for a leaf key that is not a leaf of the outline.
    #[must_use]
    pub fn bucket(&self, bucket: Bucket) -> Option<&BucketRecords<'a>> {
        match bucket {
            Bucket::Leaf(key) => self.leaves.get(&key),
            Bucket::Unassigned => Some(&self.unassigned),
            Bucket::Unknown => Some(&self.unknown),
            Bucket::NonLeaf => Some(&self.non_leaf),
        }
    }

    /// Every bucket in output order: leaves by key, then unassigned, non-leaf and
    /// unknown.
    pub fn iter(&self) -> impl Iterator<Item = (Bucket, &BucketRecords<'a>)> {
        self.leaves
            .iter()
            .map(|(key, records)| (Bucket::Leaf(*key), records))
            .chain([
                (Bucket::Unassigned, &self.unassigned),
                (Bucket::NonLeaf, &self.non_leaf),
                (Bucket::Unknown, &self.unknown),
            ])
    }

    /// Total number of records across all buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().map(|(_, records)| records.len()).sum()
    }

    /// Whether no bucket holds a record.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Partition `records` against the leaves of `tree`.
///
/// # Errors
///
/// Returns [`BibError::EmptyOutline`] if the outline has no sections.
pub fn categorize<'a>(records: &'a RecordStore, tree: &IndexTree) -> Result<CategorizedView<'a>> {
    let leaf_keys = tree.leaf_keys();
    if leaf_keys.is_empty() {
        return Err(BibError::EmptyOutline);
    }
    let all_keys: HashSet<CatId> = tree.all_keys().into_iter().collect();

    let mut view = CategorizedView {
        leaves: leaf_keys.into_iter().map(|key| (key, BTreeMap::new())).collect(),
        unassigned: BTreeMap::new(),
        unknown: BTreeMap::new(),
        non_leaf: BTreeMap::new(),
    };

    for record in records {
        let bucket = match record.category_key {
            None => &mut view.unassigned,
            Some(key) if !all_keys.contains(&key) => &mut view.unknown,
            Some(key) => match view.leaves.get_mut(&key) {
                Some(leaf) => leaf,
                None => &mut view.non_leaf,
            },
        };
        bucket.insert(record.id.as_str(), record);
    }

    Ok(view)
}

/// File the record `id` under `key`.
///
/// # Errors
///
/// Returns [`BibError::RecordNotFound`] if no record has this id; nothing is changed.
pub fn set_category(records: &mut RecordStore, id: &str, key: Option<CatId>) -> Result<()> {
    records.set_category(id, key)
}
