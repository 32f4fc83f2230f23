//! Integration tests for tree creation, node lifecycle and teardown.

use wsfs::tree::{NODE_OVERHEAD, PLACEHOLDER_NAME, ROOT_MARKER};
use wsfs::{NodeType, Permissions, TreeError, TreeLimits};

use crate::integration::test_utils::{
    fixed_tree, fixed_tree_with_limits, mkdir, touch, FIXED_TIME, RW,
};

#[test]
fn test_new_tree_has_single_self_parented_root() {
    let tree = fixed_tree();
    let root = tree.root();
    let node = tree.node(root).unwrap();

    assert_eq!(node.name(), ROOT_MARKER);
    assert_eq!(node.parent(), root);
    assert_eq!(node.node_type(), NodeType::Directory);
    assert_eq!(node.permissions(), Permissions::ALL);
    assert!(node.children().is_empty());
    assert_eq!(tree.live_nodes(), 1);
}

#[test]
fn test_creation_identity() {
    let mut tree = fixed_tree();
    let root = tree.root();
    let dir = mkdir(&mut tree, root, "dir");

    let detached = tree
        .create_node(Some(dir), Some("later"), NodeType::File, RW)
        .unwrap();
    assert_eq!(tree.node(detached).unwrap().parent(), dir);
    assert!(!tree.node(dir).unwrap().children().contains(&detached));

    let first = touch(&mut tree, dir, "first");
    tree.add_to_dir(dir, detached).unwrap();
    assert_eq!(tree.node(dir).unwrap().children(), &[first, detached]);
    assert_eq!(
        tree.node(dir)
            .unwrap()
            .children()
            .iter()
            .filter(|c| **c == detached)
            .count(),
        1
    );
}

#[test]
fn test_created_nodes_are_stamped_and_empty() {
    let mut tree = fixed_tree();
    let root = tree.root();
    let file = touch(&mut tree, root, "file");
    let link = tree
        .create(root, Some("link"), NodeType::Symlink, RW)
        .unwrap();

    let node = tree.node(file).unwrap();
    assert_eq!(node.created_at(), FIXED_TIME);
    assert_eq!(node.file_content(), None);
    assert_eq!(tree.node(link).unwrap().symlink_target(), None);
}

#[test]
fn test_missing_name_becomes_placeholder() {
    let mut tree = fixed_tree();
    let root = tree.root();
    let unnamed = tree.create(root, Some(""), NodeType::File, RW).unwrap();
    assert_eq!(tree.node(unnamed).unwrap().name(), PLACEHOLDER_NAME);
}

#[test]
fn test_names_are_truncated_to_limit() {
    let mut tree = fixed_tree_with_limits(TreeLimits {
        max_name_len: 4,
        ..TreeLimits::default()
    });
    let root = tree.root();
    let f = touch(&mut tree, root, "longname");
    assert_eq!(tree.node(f).unwrap().name(), "long");
    assert_eq!(tree.find_in_dir(root, "longname"), Some(f));
}

#[test]
fn test_size_scenario() {
    let mut tree = fixed_tree();
    let root = tree.root();
    let dir = mkdir(&mut tree, root, "dir");
    let file = touch(&mut tree, dir, "file");
    tree.write_file(file, "Hello").unwrap();

    let expected = (NODE_OVERHEAD + 3 + 1) + (NODE_OVERHEAD + 4 + 1 + 5 + 1);
    assert_eq!(tree.get_size(dir), expected);

    tree.delete(dir, file).unwrap();
    assert!(tree.node(dir).unwrap().children().is_empty());
}

#[test]
fn test_quota_accounting_tracks_frees() {
    let mut tree = fixed_tree_with_limits(TreeLimits {
        max_nodes: 3,
        ..TreeLimits::default()
    });
    let root = tree.root();
    let dir = mkdir(&mut tree, root, "dir");
    touch(&mut tree, dir, "a");
    assert!(matches!(
        tree.create(root, Some("b"), NodeType::File, RW),
        Err(TreeError::AllocationFailed(_))
    ));

    tree.delete(root, dir).unwrap();
    assert_eq!(tree.live_nodes(), 1);
    touch(&mut tree, root, "b");
    touch(&mut tree, root, "c");
}

#[test]
fn test_teardown_frees_everything_reachable() {
    let mut tree = fixed_tree();
    let root = tree.root();
    let a = mkdir(&mut tree, root, "a");
    let b = mkdir(&mut tree, a, "b");
    touch(&mut tree, b, "c");
    touch(&mut tree, root, "d");

    assert_eq!(tree.teardown(), 5);
}

#[test]
fn test_deep_chain_operations_use_explicit_stacks() {
    const DEPTH: usize = 10_000;
    let mut tree = fixed_tree_with_limits(TreeLimits {
        max_nodes: 3 * DEPTH,
        max_memory_bytes: u64::MAX,
        ..TreeLimits::default()
    });
    let root = tree.root();
    let backup = mkdir(&mut tree, root, "backup");
    let top = mkdir(&mut tree, root, "d");
    let mut current = top;
    for _ in 1..DEPTH {
        current = mkdir(&mut tree, current, "d");
    }
    let leaf = touch(&mut tree, current, "leaf");
    tree.write_file(leaf, "bottom").unwrap();

    assert_eq!(tree.get_size(root), tree.used_bytes());
    assert_eq!(tree.find_in_tree(root, "leaf"), Some(leaf));

    let path = tree.path_of(leaf).unwrap();
    assert_eq!(path.len(), DEPTH * 2 + "/leaf".len());
    assert!(path.ends_with("/d/d/leaf"));

    let before = tree.live_nodes();
    let copy = tree.copy(backup, top).unwrap();
    assert_eq!(tree.live_nodes(), before + DEPTH + 1);
    assert_eq!(tree.get_size(copy), tree.get_size(top));
    let copied_leaf = tree.find_in_tree(copy, "leaf").unwrap();
    assert_ne!(copied_leaf, leaf);
    assert_eq!(tree.read_file(copied_leaf).unwrap(), Some("bottom"));
    assert!(tree.path_of(copied_leaf).unwrap().starts_with("/backup/d/d/"));

    assert_eq!(tree.delete(root, top).unwrap(), DEPTH + 1);
    assert_eq!(tree.teardown(), 1 + 1 + DEPTH + 1);
}
