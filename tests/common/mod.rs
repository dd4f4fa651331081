//! Common test helpers shared across the test suite.

use bibtoc::{CatId, EntryType, FieldName, IndexTree, OutlineItem, Record, RecordStore};

/// Builds the outline used by most tests:
///
/// ```text
/// 10000000 Power Systems
/// 11000000     Stability
/// 12000000     Protection
/// 20000000 Control
/// 21000000     Model Predictive Control
/// 21100000         Robust MPC
/// 22000000     Reinforcement Learning
/// ```
#[allow(dead_code)]
pub fn create_test_tree() -> IndexTree {
    let mut tree = IndexTree::new();
    tree.build_from_nested(&[
        OutlineItem::section("Power Systems"),
        OutlineItem::nested(vec![
            OutlineItem::section("Stability"),
            OutlineItem::section("Protection"),
        ]),
        OutlineItem::section("Control"),
        OutlineItem::nested(vec![
            OutlineItem::section("Model Predictive Control"),
            OutlineItem::nested(vec![OutlineItem::section("Robust MPC")]),
            OutlineItem::section("Reinforcement Learning"),
        ]),
    ])
    .expect("test outline fits the key space");
    tree
}

/// Creates a record filed under `key`, with a title derived from its id.
#[allow(dead_code)]
pub fn create_test_record(id: &str, key: Option<u32>) -> Record {
    let mut record = Record::builder(EntryType::Article, id)
        .title(format!("On {id}"))
        .author("Doe, Jane and Roe, Richard")
        .field(FieldName::Journal, "IEEE Trans. Power Syst.")
        .field(FieldName::Year, "2021")
        .build();
    record.category_key = key.map(CatId::new);
    record
}

/// A store with one record in each kind of bucket of [`create_test_tree`].
#[allow(dead_code)]
pub fn create_test_store() -> RecordStore {
    vec![
        create_test_record("stab1", Some(0x1100_0000)),
        create_test_record("stab2", Some(0x1100_0000)),
        create_test_record("rmpc", Some(0x2110_0000)),
        create_test_record("control", Some(0x2000_0000)),
        create_test_record("ghost", Some(0x3300_0000)),
        create_test_record("loose", None),
    ]
    .into_iter()
    .collect()
}
