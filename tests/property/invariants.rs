//! Property-based tests for tree invariants

use proptest::prelude::*;
use wsfs::clock::FixedClock;
use wsfs::{is_permissions_equal, NodeId, NodeType, Permissions, Timestamp, Tree, TreeLimits};

const STAMP: Timestamp = Timestamp {
    year: 2024,
    month: 2,
    day: 29,
    hour: 23,
    minute: 59,
};

fn tree() -> Tree {
    Tree::with_clock(TreeLimits::default(), Box::new(FixedClock(STAMP))).unwrap()
}

/// Build a directory with one file per entry, each holding the given text.
fn populate(tree: &mut Tree, dir: NodeId, files: &[String]) -> Vec<NodeId> {
    files
        .iter()
        .enumerate()
        .map(|(i, content)| {
            let f = tree
                .create(dir, Some(&format!("f{}", i)), NodeType::File, Permissions::ALL)
                .unwrap();
            if !content.is_empty() {
                tree.write_file(f, content).unwrap();
            }
            f
        })
        .collect()
}

/// A directory's size is its own footprint plus the sizes of its children.
#[test]
fn test_size_additivity_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&prop::collection::vec("[a-z]{0,24}", 0..12), |files| {
            let mut tree = tree();
            let root = tree.root();
            let dir = tree
                .create(root, Some("dir"), NodeType::Directory, Permissions::ALL)
                .unwrap();
            let children = populate(&mut tree, dir, &files);

            let own = tree.node(dir).unwrap().footprint();
            let sum: u64 = children.iter().map(|c| tree.get_size(*c)).sum();
            prop_assert_eq!(tree.get_size(dir), own + sum);
            prop_assert_eq!(tree.get_size(root), tree.used_bytes());

            Ok(())
        })
        .unwrap();
}

/// Relocating one child keeps the relative order of the rest on both sides.
#[test]
fn test_relocate_preserves_order_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(1usize..10).prop_flat_map(|n| (Just(n), 0..n)), |(n, pick)| {
            let mut tree = tree();
            let root = tree.root();
            let from = tree
                .create(root, Some("from"), NodeType::Directory, Permissions::ALL)
                .unwrap();
            let to = tree
                .create(root, Some("to"), NodeType::Directory, Permissions::ALL)
                .unwrap();
            let existing = tree
                .create(to, Some("existing"), NodeType::File, Permissions::ALL)
                .unwrap();
            let children = populate(&mut tree, from, &vec![String::new(); n]);

            tree.relocate(children[pick], to).unwrap();

            let mut expected = children.clone();
            expected.remove(pick);
            prop_assert_eq!(tree.children(from).unwrap(), expected);
            prop_assert_eq!(tree.children(to).unwrap(), vec![existing, children[pick]]);
            prop_assert_eq!(tree.node(children[pick]).unwrap().parent(), to);

            Ok(())
        })
        .unwrap();
}

/// A copy has the same shape and content but shares no node with its source.
#[test]
fn test_copy_is_deep_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&prop::collection::vec("[ -~]{0,16}", 0..8), |files| {
            let mut tree = tree();
            let root = tree.root();
            let src = tree
                .create(root, Some("src"), NodeType::Directory, Permissions::ALL)
                .unwrap();
            let dest = tree
                .create(root, Some("dest"), NodeType::Directory, Permissions::ALL)
                .unwrap();
            let originals = populate(&mut tree, src, &files);
            let before = tree.live_nodes();

            let copy = tree.copy(dest, src).unwrap();

            prop_assert_eq!(tree.live_nodes(), before + originals.len() + 1);
            prop_assert_eq!(tree.get_size(copy), tree.get_size(src));
            let copies = tree.children(copy).unwrap();
            prop_assert_eq!(copies.len(), originals.len());
            for (original, duplicate) in originals.iter().zip(&copies) {
                prop_assert_ne!(original, duplicate);
                prop_assert_eq!(
                    tree.read_file(*original).unwrap(),
                    tree.read_file(*duplicate).unwrap()
                );
            }

            Ok(())
        })
        .unwrap();
}

/// Every mask grants itself, and any superset of the required bits is sufficient.
#[test]
fn test_permissions_equal_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(0u8..8, 0u8..8), |(a, b)| {
            let actual = Permissions::from_bits(a);
            let required = Permissions::from_bits(b);

            prop_assert!(is_permissions_equal(actual, actual));
            prop_assert!(is_permissions_equal(actual | required, required));
            prop_assert_eq!(
                is_permissions_equal(actual, required),
                a & b == b
            );

            Ok(())
        })
        .unwrap();
}

/// The path of a node names each ancestor from the root down.
#[test]
fn test_path_round_trip_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&prop::collection::vec("[a-z][a-z0-9]{0,7}", 1..8), |names| {
            let mut tree = tree();
            let mut dir = tree.root();
            for name in &names {
                dir = tree
                    .create(dir, Some(name), NodeType::Directory, Permissions::ALL)
                    .unwrap();
            }

            let path = tree.path_of(dir).unwrap();
            prop_assert_eq!(path, format!("/{}", names.join("/")));

            let mut walk = tree.root();
            for name in &names {
                walk = tree.find_in_dir(walk, name).unwrap();
            }
            prop_assert_eq!(walk, dir);

            Ok(())
        })
        .unwrap();
}
