//! Integration tests for lookup, symlink resolution and paths.

use wsfs::{NodeType, Permissions, TreeError};

use crate::integration::test_utils::{fixed_tree, mkdir, touch, RW};

#[test]
fn test_find_in_dir_is_gated_but_find_in_tree_is_not() {
    let mut tree = fixed_tree();
    let root = tree.root();
    let vault = mkdir(&mut tree, root, "vault");
    let secret = touch(&mut tree, vault, "secret");

    tree.change_permissions(vault, Permissions::WRITE).unwrap();

    assert_eq!(tree.find_in_dir(vault, "secret"), None);
    assert_eq!(tree.find_in_tree(root, "secret"), Some(secret));
}

#[test]
fn test_round_trip_path() {
    let mut tree = fixed_tree();
    let root = tree.root();
    let a = mkdir(&mut tree, root, "a");
    let b = mkdir(&mut tree, a, "b");
    let leaf = touch(&mut tree, b, "leaf");

    let path = tree.path_of(leaf).unwrap();
    assert_eq!(path, "/a/b/leaf");

    let last = path.rsplit('/').next().unwrap();
    let found = tree.find_in_tree(root, last).unwrap();
    assert_eq!(tree.node(found).unwrap().name(), "leaf");
}

#[test]
fn test_symlink_scenario() {
    let mut tree = fixed_tree();
    let root = tree.root();
    let file = touch(&mut tree, root, "file");
    let link = tree
        .create(root, Some("link"), NodeType::Symlink, RW)
        .unwrap();

    tree.set_symlink_target(link, Some(file)).unwrap();
    assert_eq!(tree.resolve_symlink(link), Some(file));

    tree.change_permissions(link, Permissions::NONE).unwrap();
    assert_eq!(tree.resolve_symlink(link), None);
}

#[test]
fn test_symlink_chain_and_loop() {
    let mut tree = fixed_tree();
    let root = tree.root();
    let dir = mkdir(&mut tree, root, "dir");
    let first = tree
        .create(root, Some("first"), NodeType::Symlink, RW)
        .unwrap();
    let second = tree
        .create(root, Some("second"), NodeType::Symlink, RW)
        .unwrap();

    tree.set_symlink_target(first, Some(second)).unwrap();
    tree.set_symlink_target(second, Some(dir)).unwrap();
    assert_eq!(tree.resolve_symlink(first), Some(dir));

    let mut cwd = root;
    tree.change_current_dir(&mut cwd, first).unwrap();
    assert_eq!(cwd, dir);

    tree.set_symlink_target(second, Some(first)).unwrap();
    assert!(matches!(
        tree.try_resolve_symlink(first),
        Err(TreeError::SymlinkLoop { .. })
    ));
}

#[test]
fn test_change_current_dir_failures_leave_cwd() {
    let mut tree = fixed_tree();
    let root = tree.root();
    let closed = mkdir(&mut tree, root, "closed");
    let file = touch(&mut tree, root, "file");
    tree.change_permissions(closed, Permissions::READ).unwrap();

    let mut cwd = root;
    assert!(tree.change_current_dir(&mut cwd, closed).is_err());
    assert!(tree.change_current_dir(&mut cwd, file).is_err());
    assert_eq!(cwd, root);
}
