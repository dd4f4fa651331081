//! Property and behavior tests for outline key assignment

mod common;

use bibtoc::{BibError, CatId, IndentUnit, IndexTree, OutlineItem};
use common::create_test_tree;
use proptest::prelude::*;

/// Depth sequences of well-formed outlines: start at 1, step down by at most one
/// level, at most 15 entries so no level can overflow.
fn depths() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(0usize..3, 1..=15).prop_map(|steps| {
        let mut depth: usize = 1;
        let mut out = Vec::with_capacity(steps.len());
        for (i, step) in steps.into_iter().enumerate() {
            if i > 0 {
                depth = match step {
                    0 => depth.saturating_sub(1).max(1),
                    1 => depth,
                    _ => (depth + 1).min(8),
                };
            }
            out.push(depth);
        }
        out
    })
}

fn indented(depths: &[usize], unit: IndentUnit) -> Vec<String> {
    depths
        .iter()
        .enumerate()
        .map(|(i, depth)| format!("{}s{i}", unit.render(depth - 1)))
        .collect()
}

proptest! {
    #[test]
    fn prop_keys_follow_document_order(depths in depths()) {
        let mut tree = IndexTree::new();
        tree.build_from_indented_text(indented(&depths, IndentUnit::Tab), IndentUnit::Tab)
            .expect("well-formed outline");

        let names: Vec<String> = tree.iter().map(|(_, name)| name.to_string()).collect();
        let expected: Vec<String> = (0..depths.len()).map(|i| format!("s{i}")).collect();
        prop_assert_eq!(names, expected);

        let keys = tree.all_keys();
        prop_assert!(keys.windows(2).all(|pair| pair[0] < pair[1]));
        for (key, depth) in keys.iter().zip(&depths) {
            prop_assert_eq!(key.depth(), *depth);
        }
    }

    #[test]
    fn prop_leaves_have_no_deeper_successor(depths in depths()) {
        let mut tree = IndexTree::new();
        tree.build_from_indented_text(indented(&depths, IndentUnit::Spaces(2)), IndentUnit::Spaces(2))
            .expect("well-formed outline");

        let keys = tree.all_keys();
        let expected: Vec<CatId> = keys
            .iter()
            .enumerate()
            .filter(|(i, _)| depths.get(i + 1).map_or(true, |next| *next <= depths[*i]))
            .map(|(_, key)| *key)
            .collect();
        prop_assert_eq!(tree.leaf_keys(), expected);
    }

    #[test]
    fn prop_printable_rebuilds_same_tree(depths in depths()) {
        let mut tree = IndexTree::new();
        tree.build_from_indented_text(indented(&depths, IndentUnit::Tab), IndentUnit::Tab)
            .expect("well-formed outline");

        let mut rebuilt = IndexTree::new();
        rebuilt
            .build_from_indented_text(tree.printable(IndentUnit::Spaces(4)), IndentUnit::Spaces(4))
            .expect("printable form is well-formed");
        prop_assert_eq!(rebuilt, tree);
    }
}

#[test]
fn test_spec_example_outline() {
    let mut tree = IndexTree::new();
    tree.build_from_nested(&[
        OutlineItem::section("A"),
        OutlineItem::nested(vec![OutlineItem::section("B"), OutlineItem::section("C")]),
    ])
    .unwrap();

    assert_eq!(
        tree.printable(IndentUnit::Spaces(4)),
        vec!["A", "    B", "    C"]
    );
    assert_eq!(
        tree.all_keys(),
        vec![
            CatId::new(0x1000_0000),
            CatId::new(0x1100_0000),
            CatId::new(0x1200_0000)
        ]
    );
    assert_eq!(
        tree.leaf_keys(),
        vec![CatId::new(0x1100_0000), CatId::new(0x1200_0000)]
    );
}

#[test]
fn test_nested_and_indented_builders_agree() {
    let mut from_text = IndexTree::new();
    from_text
        .build_from_indented_text(
            [
                "Power Systems",
                "  Stability",
                "  Protection",
                "Control",
                "  Model Predictive Control",
                "    Robust MPC",
                "  Reinforcement Learning",
            ],
            IndentUnit::Spaces(2),
        )
        .unwrap();
    assert_eq!(from_text, create_test_tree());
}

#[test]
fn test_rebuild_replaces_previous_outline() {
    let mut tree = create_test_tree();
    tree.build_from_nested(&[OutlineItem::section("Only")]).unwrap();
    assert_eq!(tree.all_keys(), vec![CatId::new(0x1000_0000)]);
    assert_eq!(tree.leaf_keys(), vec![CatId::new(0x1000_0000)]);
}

#[test]
fn test_failed_build_leaves_outline_alone() {
    let mut tree = create_test_tree();
    let lines: Vec<String> = (0..16).map(|i| format!("\tchild {i}")).collect();
    let mut input = vec!["parent".to_string()];
    input.extend(lines);

    let err = tree
        .build_from_indented_text(&input, IndentUnit::Tab)
        .unwrap_err();
    assert!(matches!(err, BibError::SiblingOverflow { depth: 2 }));
    assert_eq!(tree, create_test_tree());
}

#[test]
fn test_indented_jump_skips_levels() {
    let mut tree = IndexTree::new();
    tree.build_from_indented_text(["Top", "\t\tDeep"], IndentUnit::Tab)
        .unwrap();
    assert_eq!(
        tree.all_keys(),
        vec![CatId::new(0x1000_0000), CatId::new(0x1010_0000)]
    );
}
