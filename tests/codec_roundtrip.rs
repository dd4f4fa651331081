//! Property tests for record encoding and decoding

mod common;

use bibtoc::codec::{self, RecordDecoder};
use bibtoc::{CatId, EntryType, FieldName, Record, RecoveryMode};
use common::create_test_record;
use proptest::prelude::*;

fn entry_type() -> impl Strategy<Value = EntryType> {
    prop_oneof![
        Just(EntryType::Book),
        Just(EntryType::Article),
        Just(EntryType::InProceedings),
        Just(EntryType::Online),
        "[A-Za-z]{1,12}".prop_map(|token| EntryType::from_token(&token)),
        "[A-Za-z0-9_:+.-]{1,12}".prop_map(EntryType::Other),
    ]
}

fn record() -> impl Strategy<Value = Record> {
    (
        entry_type(),
        "[A-Za-z0-9:_.-]{1,24}",
        prop::collection::btree_map(
            prop::sample::select(FieldName::ALL.to_vec()),
            "[^{}\r\n]{0,40}",
            0..=FieldName::ALL.len(),
        ),
        prop::option::of(any::<u32>()),
    )
        .prop_map(|(entry_type, id, fields, key)| Record {
            entry_type,
            id,
            fields,
            category_key: key.map(CatId::new),
        })
}

proptest! {
    #[test]
    fn prop_encode_decode_round_trip(record in record()) {
        let lines = codec::encode(&record).expect("record has an id");
        let store = codec::decode(&lines);
        prop_assert_eq!(store.len(), 1);
        prop_assert_eq!(store.get(&record.id), Some(&record));
    }

    #[test]
    fn prop_concatenated_blocks_round_trip(records in prop::collection::vec(record(), 0..8)) {
        let mut lines = Vec::new();
        for record in &records {
            lines.extend(codec::encode(record).expect("record has an id"));
            lines.push(String::new());
        }
        let store = RecordDecoder::new()
            .with_recovery_mode(RecoveryMode::Strict)
            .decode(&lines)
            .expect("encoded text decodes strictly");

        for record in &records {
            let last = records.iter().rev().find(|r| r.id == record.id);
            prop_assert_eq!(store.get(&record.id), last);
        }
    }

    #[test]
    fn prop_encode_closing_line(record in record()) {
        let lines = codec::encode(&record).expect("record has an id");
        let closing = lines.last().expect("at least two lines");
        match record.category_key {
            Some(key) => prop_assert_eq!(closing, &format!("}} % catid = 0x{key}")),
            None => prop_assert_eq!(closing.as_str(), "}"),
        }
        let before_closing = &lines[lines.len() - 2];
        prop_assert_eq!(before_closing.ends_with(','), record.fields.is_empty());
    }
}

#[test]
fn test_nested_braces_kept_verbatim() {
    let store = codec::decode([
        "@article{gui,",
        "  title = {A {GUI} for {MPC}},",
        "}",
    ]);
    assert_eq!(store.get("gui").and_then(Record::title), Some("A {GUI} for {MPC}"));
}

#[test]
fn test_value_with_closing_brace_inside_is_cut_at_last_brace() {
    let store = codec::decode(["@book{b,", "title = {left} and {right}", "}"]);
    assert_eq!(store.get("b").and_then(Record::title), Some("left} and {right"));
}

#[test]
fn test_untrimmed_lines_decode() {
    let record = create_test_record("padded", Some(0x1100_0000));
    let lines: Vec<String> = codec::encode(&record)
        .unwrap()
        .into_iter()
        .map(|line| format!("\t  {line}   "))
        .collect();
    assert_eq!(codec::decode(&lines).get("padded"), Some(&record));
}

#[test]
fn test_surrounding_noise_is_ignored() {
    let mut lines = vec![
        "%% - Some group".to_string(),
        "random prose".to_string(),
        String::new(),
    ];
    let record = create_test_record("n1", None);
    lines.extend(codec::encode(&record).unwrap());
    lines.push("trailing = {field outside any block}".to_string());
    let store = codec::decode(&lines);
    assert_eq!(store.len(), 1);
    assert_eq!(store.get("n1"), Some(&record));
}
