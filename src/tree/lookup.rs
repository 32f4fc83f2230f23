//! Lookup and path resolution
//!
//! Directory scans honour the Read+Execute gate of the directory being
//! scanned. The whole-tree search is a privileged walk and ignores
//! permissions.

use super::{name, NodeContent, Tree, PATH_SEPARATOR};
use crate::error::TreeError;
use crate::types::{NodeId, Permissions};
use tracing::{debug, trace};

/// Read and Execute, the bits needed to list or enter a directory.
pub const TRAVERSE: Permissions = Permissions::from_bits(Permissions::READ.bits() | Permissions::EXECUTE.bits());

impl Tree {
    /// Child of `dir` named `name`, if `dir` may be traversed.
    ///
    /// The query is normalised the same way stored names are.
    pub fn find_in_dir(&self, dir: NodeId, name: &str) -> Option<NodeId> {
        let dir_node = self.require(dir, TRAVERSE).ok()?;
        let wanted = name::canonical_name(name, self.limits().max_name_len);
        dir_node
            .children()
            .iter()
            .copied()
            .find(|child| self.node(*child).map_or(false, |n| n.name == wanted))
    }

    /// First node named `name` in a depth-first preorder walk from `start`,
    /// `start` itself included. Children are visited in order.
    pub fn find_in_tree(&self, start: NodeId, name: &str) -> Option<NodeId> {
        let wanted = name::canonical_name(name, self.limits().max_name_len);
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            let Some(node) = self.node(current) else {
                continue;
            };
            if node.name == wanted {
                return Some(current);
            }
            // reversed so the first child is popped first
            stack.extend(node.children().iter().rev().copied());
        }
        None
    }

    /// Children of `dir` in order. Requires Read+Execute on `dir`.
    pub fn children(&self, dir: NodeId) -> Result<Vec<NodeId>, TreeError> {
        let node = self.get(dir)?;
        if !node.is_dir() {
            return Err(TreeError::NotADirectory(node.name.clone()));
        }
        Ok(self.require(dir, TRAVERSE)?.children().to_vec())
    }

    /// Follow symlinks from `id` until a non-symlink node is reached.
    ///
    /// Non-symlinks resolve to themselves. Read is required on every link
    /// traversed, and chains longer than `max_symlink_hops` are reported as
    /// loops.
    pub fn try_resolve_symlink(&self, id: NodeId) -> Result<NodeId, TreeError> {
        let limit = self.limits().max_symlink_hops;
        let mut current = id;
        for _ in 0..=limit {
            let node = self.get(current)?;
            let NodeContent::Symlink(target) = node.content else {
                return Ok(current);
            };
            self.require(current, Permissions::READ)?;
            current = match target {
                Some(t) if self.contains(t) => t,
                _ => return Err(TreeError::DanglingSymlink(node.name.clone())),
            };
            trace!(link = %id, hop = %current, "Followed symlink");
        }
        Err(TreeError::SymlinkLoop {
            name: self.display_name(id),
            limit,
        })
    }

    /// [`Tree::try_resolve_symlink`] with every failure reported as `None`.
    pub fn resolve_symlink(&self, id: NodeId) -> Option<NodeId> {
        match self.try_resolve_symlink(id) {
            Ok(resolved) => Some(resolved),
            Err(e) => {
                debug!(node = %id, error = %e, "Symlink did not resolve");
                None
            }
        }
    }

    /// Immediate target of a symlink, without following further.
    pub fn symlink_target(&self, link: NodeId) -> Result<Option<NodeId>, TreeError> {
        let node = self.get(link)?;
        let NodeContent::Symlink(target) = node.content else {
            return Err(TreeError::NotASymlink(node.name.clone()));
        };
        self.require(link, Permissions::READ)?;
        Ok(target.filter(|t| self.contains(*t)))
    }

    /// Absolute path of `id`, e.g. `/dir/file`. A root renders as `/`.
    pub fn path_of(&self, id: NodeId) -> Option<String> {
        let mut names = Vec::new();
        let mut current = id;
        loop {
            let node = self.node(current)?;
            // the tree root, or a root made from the root marker
            if node.parent == current {
                break;
            }
            names.push(node.name.as_str());
            if names.len() > self.live_nodes() {
                return None;
            }
            current = node.parent;
        }
        if names.is_empty() {
            return Some(PATH_SEPARATOR.to_string());
        }
        let mut path = String::new();
        for name in names.iter().rev() {
            path.push(PATH_SEPARATOR);
            path.push_str(name);
        }
        Some(path)
    }

    /// Move the caller's current directory to `target`.
    ///
    /// `target` is resolved through symlinks and must be a directory carrying
    /// Read+Execute. On error `current` is left untouched.
    pub fn change_current_dir(&self, current: &mut NodeId, target: NodeId) -> Result<(), TreeError> {
        let resolved = self.try_resolve_symlink(target)?;
        let node = self.get(resolved)?;
        if !node.is_dir() {
            return Err(TreeError::NotADirectory(node.name.clone()));
        }
        self.require(resolved, TRAVERSE)?;
        debug!(from = %current, to = %resolved, "Changed directory");
        *current = resolved;
        Ok(())
    }
}
