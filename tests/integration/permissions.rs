//! Integration tests for the permission model.

use wsfs::{is_permissions_equal, NodeType, Permissions, TreeError};

use crate::integration::test_utils::{fixed_tree, mkdir, touch, RW};

#[test]
fn test_permission_gating_idempotence() {
    for bits in 0..=7u8 {
        let p = Permissions::from_bits(bits);
        assert!(is_permissions_equal(p, p));
    }
    assert!(is_permissions_equal(
        Permissions::READ | Permissions::WRITE,
        Permissions::WRITE
    ));
    assert!(!is_permissions_equal(Permissions::READ, Permissions::WRITE));
}

#[test]
fn test_permissions_are_not_inherited() {
    let mut tree = fixed_tree();
    let root = tree.root();
    let locked = mkdir(&mut tree, root, "locked");
    let inner = mkdir(&mut tree, locked, "inner");
    tree.change_permissions(locked, Permissions::NONE).unwrap();

    let f = tree
        .create(inner, Some("f"), NodeType::File, RW)
        .unwrap();
    tree.write_file(f, "still writable").unwrap();
    assert_eq!(tree.read_file(f).unwrap(), Some("still writable"));
}

#[test]
fn test_size_ignores_unreadable_subtrees() {
    let mut tree = fixed_tree();
    let root = tree.root();
    let dir = mkdir(&mut tree, root, "dir");
    let visible = touch(&mut tree, dir, "visible");
    let hidden = touch(&mut tree, dir, "hidden");
    tree.write_file(hidden, "lots of content").unwrap();

    let full = tree.get_size(dir);
    tree.change_permissions(hidden, Permissions::WRITE).unwrap();

    assert_eq!(tree.get_size(hidden), 0);
    assert_eq!(
        tree.get_size(dir),
        full - tree.node(hidden).unwrap().footprint()
    );
    assert!(tree.get_size(visible) > 0);
}

#[test]
fn test_write_requires_write_bit_on_resolved_file() {
    let mut tree = fixed_tree();
    let root = tree.root();
    let file = touch(&mut tree, root, "file");
    let link = tree
        .create(root, Some("link"), NodeType::Symlink, RW)
        .unwrap();
    tree.set_symlink_target(link, Some(file)).unwrap();

    tree.change_permissions(file, Permissions::READ).unwrap();
    assert!(matches!(
        tree.write_file(link, "x"),
        Err(TreeError::PermissionDenied { .. })
    ));

    tree.change_permissions(file, RW).unwrap();
    tree.write_file(link, "x").unwrap();
    assert_eq!(tree.read_file(file).unwrap(), Some("x"));
}
