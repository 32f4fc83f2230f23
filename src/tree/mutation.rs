//! Structural and content mutations
//!
//! Every operation validates all of its preconditions before touching the
//! arena, so an `Err` always leaves the tree exactly as it was.

use super::node::footprint_of;
use super::{name, Node, NodeContent, Tree};
use crate::error::TreeError;
use crate::types::{NodeId, Permissions};
use tracing::{debug, trace, warn};

impl Tree {
    /// Append `child` to the end of `parent`'s children.
    ///
    /// Requires Write on `parent`. `child` must not currently be linked
    /// anywhere, must not be an ancestor of `parent`, and its name must be
    /// free among `parent`'s children.
    pub fn add_to_dir(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.attach(parent, child, true)
    }

    /// [`Tree::add_to_dir`], with the ancestor walk skipped when `check_cycle`
    /// is false. Only callers holding a node with no descendants may skip it.
    pub(crate) fn attach(&mut self, parent: NodeId, child: NodeId, check_cycle: bool) -> Result<(), TreeError> {
        let parent_node = self.get(parent)?;
        if !parent_node.is_dir() {
            return Err(TreeError::NotADirectory(parent_node.name.clone()));
        }
        self.require(parent, Permissions::WRITE)?;
        if child == self.root() {
            return Err(TreeError::RootImmutable);
        }
        let child_name = self.get(child)?.name.clone();
        name::validate_entry_name(&child_name)?;
        if self.is_linked(child) {
            return Err(TreeError::AlreadyLinked(child_name));
        }
        if check_cycle && self.is_ancestor(child, parent) {
            return Err(self.cycle_error(child, parent));
        }
        self.ensure_name_free(parent, &child_name, None)?;

        self.link(parent, child);
        trace!(parent = %parent, child = %child, "Linked node");
        Ok(())
    }

    /// Move `id` to the end of `new_parent`'s children.
    ///
    /// Requires Write on both `id` and `new_parent`. The remaining siblings at
    /// the old location keep their relative order. Moving a node to the
    /// directory it is already in does nothing.
    pub fn relocate(&mut self, id: NodeId, new_parent: NodeId) -> Result<(), TreeError> {
        if id == self.root() {
            return Err(TreeError::RootImmutable);
        }
        let node = self.get(id)?;
        let (old_parent, node_name) = (node.parent, node.name.clone());
        let dest = self.get(new_parent)?;
        if !dest.is_dir() {
            return Err(TreeError::NotADirectory(dest.name.clone()));
        }
        self.require(id, Permissions::WRITE)?;
        self.require(new_parent, Permissions::WRITE)?;

        let linked = self.is_linked(id);
        if linked && old_parent == new_parent {
            trace!(node = %id, "Already in destination");
            return Ok(());
        }
        if self.is_ancestor(id, new_parent) {
            return Err(self.cycle_error(id, new_parent));
        }
        self.ensure_name_free(new_parent, &node_name, None)?;

        if linked {
            self.unlink(old_parent, id);
        }
        self.link(new_parent, id);
        debug!(node = %id, from = %old_parent, to = %new_parent, "Relocated node");
        Ok(())
    }

    /// Deep-copy `source` into `dest` and return the copy's handle.
    ///
    /// Requires `dest` to be a directory with Write. Directory copies keep the
    /// child order of the original. File content is duplicated, symlink copies
    /// point at the same target, and every copied node gets a fresh creation
    /// time.
    pub fn copy(&mut self, dest: NodeId, source: NodeId) -> Result<NodeId, TreeError> {
        let dest_node = self.get(dest)?;
        if !dest_node.is_dir() {
            return Err(TreeError::NotADirectory(dest_node.name.clone()));
        }
        self.require(dest, Permissions::WRITE)?;
        if source == self.root() {
            return Err(TreeError::RootImmutable);
        }
        let source_name = self.get(source)?.name.clone();
        self.ensure_name_free(dest, &source_name, None)?;

        // Snapshot first so copying a directory into itself terminates.
        let plan = self.copy_plan(source);
        let bytes: u64 = plan
            .iter()
            .filter_map(|(id, _)| self.node(*id))
            .map(Node::footprint)
            .sum();
        self.ensure_capacity(plan.len(), bytes)?;

        let created_at = self.now();
        let mut copies: Vec<NodeId> = Vec::with_capacity(plan.len());
        for (original, parent_slot) in &plan {
            let Some(template) = self.node(*original) else {
                continue;
            };
            let content = match &template.content {
                NodeContent::Directory(_) => NodeContent::Directory(Vec::new()),
                other => other.clone(),
            };
            let name = template.name.clone();
            let permissions = template.permissions;
            let parent = parent_slot.map_or(dest, |slot| copies[slot]);

            let copied = match self.allocate(|_| Node {
                name,
                permissions,
                created_at,
                content,
                parent,
            }) {
                Ok(id) => id,
                Err(e) => {
                    if let Some(&top) = copies.first() {
                        self.release_subtree(top);
                    }
                    warn!(source = %source, error = %e, "Copy aborted");
                    return Err(e);
                }
            };
            if parent_slot.is_some() {
                self.link(parent, copied);
            }
            copies.push(copied);
        }

        let top = copies
            .first()
            .copied()
            .ok_or(TreeError::InvalidHandle(source))?;
        self.link(dest, top);
        debug!(source = %source, dest = %dest, copy = %top, nodes = copies.len(), "Copied subtree");
        Ok(top)
    }

    /// Give `id` a new name. Requires Write on `id`.
    pub fn rename(&mut self, id: NodeId, new_name: &str) -> Result<(), TreeError> {
        if id == self.root() {
            return Err(TreeError::RootImmutable);
        }
        let node = self.require(id, Permissions::WRITE)?;
        let parent = node.parent;
        let old_footprint = node.footprint();
        let content = node.file_content().map(str::to_owned);

        let new_name = name::normalize_name(Some(new_name), self.limits().max_name_len);
        name::validate_entry_name(&new_name)?;
        if self.is_linked(id) {
            self.ensure_name_free(parent, &new_name, Some(id))?;
        }
        let new_footprint = footprint_of(&new_name, content.as_deref());
        self.ensure_growth(old_footprint, new_footprint)?;

        let node = self.get_mut(id)?;
        debug!(node = %id, from = %node.name, to = %new_name, "Renamed node");
        node.name = new_name;
        self.adjust_used_bytes(old_footprint, new_footprint);
        Ok(())
    }

    /// Unlink `id` from `dir` and free it with its whole subtree.
    ///
    /// `id` must be one of `dir`'s children. Returns the number of nodes freed.
    pub fn delete(&mut self, dir: NodeId, id: NodeId) -> Result<usize, TreeError> {
        if id == self.root() {
            return Err(TreeError::RootImmutable);
        }
        let dir_node = self.get(dir)?;
        if !dir_node.children().contains(&id) {
            return Err(TreeError::NotFound {
                dir: dir_node.name.clone(),
                name: self.display_name(id),
            });
        }
        self.unlink(dir, id);
        let freed = self.release_subtree(id);
        debug!(dir = %dir, node = %id, freed, "Deleted node");
        Ok(freed)
    }

    /// Point a symlink at `target`, or clear it with `None`.
    /// Requires Write on the link.
    pub fn set_symlink_target(&mut self, link: NodeId, target: Option<NodeId>) -> Result<(), TreeError> {
        let node = self.get(link)?;
        if !matches!(node.content, NodeContent::Symlink(_)) {
            return Err(TreeError::NotASymlink(node.name.clone()));
        }
        self.require(link, Permissions::WRITE)?;
        if let Some(t) = target {
            self.get(t)?;
        }
        self.get_mut(link)?.content = NodeContent::Symlink(target);
        trace!(link = %link, target = ?target, "Set symlink target");
        Ok(())
    }

    /// Replace the content of a file, following symlinks.
    ///
    /// The resolved node must be a file with Write.
    pub fn write_file(&mut self, id: NodeId, text: &str) -> Result<(), TreeError> {
        let resolved = self.try_resolve_symlink(id)?;
        let node = self.get(resolved)?;
        if !matches!(node.content, NodeContent::File(_)) {
            return Err(TreeError::NotAFile(node.name.clone()));
        }
        let node = self.require(resolved, Permissions::WRITE)?;
        let old_footprint = node.footprint();
        let new_footprint = footprint_of(&node.name, Some(text));
        self.ensure_growth(old_footprint, new_footprint)?;

        self.get_mut(resolved)?.content = NodeContent::File(Some(text.to_string()));
        self.adjust_used_bytes(old_footprint, new_footprint);
        debug!(node = %resolved, bytes = text.len(), "Wrote file");
        Ok(())
    }

    /// Content of a file, following symlinks. `None` if never written.
    ///
    /// The resolved node must be a file with Read.
    pub fn read_file(&self, id: NodeId) -> Result<Option<&str>, TreeError> {
        let resolved = self.try_resolve_symlink(id)?;
        let node = self.get(resolved)?;
        if !matches!(node.content, NodeContent::File(_)) {
            return Err(TreeError::NotAFile(node.name.clone()));
        }
        Ok(self.require(resolved, Permissions::READ)?.file_content())
    }

    /// Preorder snapshot of a subtree: each entry is a node and the position
    /// of its parent within the snapshot (`None` for the top).
    fn copy_plan(&self, source: NodeId) -> Vec<(NodeId, Option<usize>)> {
        let mut plan = Vec::new();
        let mut stack = vec![(source, None)];
        while let Some((current, parent_slot)) = stack.pop() {
            let Some(node) = self.node(current) else {
                continue;
            };
            let slot = plan.len();
            plan.push((current, parent_slot));
            stack.extend(node.children().iter().rev().map(|c| (*c, Some(slot))));
        }
        plan
    }

    /// Push `child` onto `parent`'s children and record the parent.
    /// Callers have already validated the move.
    fn link(&mut self, parent: NodeId, child: NodeId) {
        if let Ok(parent_node) = self.get_mut(parent) {
            if let NodeContent::Directory(children) = &mut parent_node.content {
                children.push(child);
            }
        }
        if let Ok(child_node) = self.get_mut(child) {
            child_node.parent = parent;
        }
    }

    fn ensure_name_free(&self, dir: NodeId, name: &str, except: Option<NodeId>) -> Result<(), TreeError> {
        let dir_node = self.get(dir)?;
        let taken = dir_node
            .children()
            .iter()
            .filter(|c| Some(**c) != except)
            .any(|c| self.node(*c).map_or(false, |n| n.name == name));
        if taken {
            Err(TreeError::AlreadyExists {
                dir: dir_node.name.clone(),
                name: name.to_string(),
            })
        } else {
            Ok(())
        }
    }

    fn cycle_error(&self, node: NodeId, target: NodeId) -> TreeError {
        TreeError::WouldCycle {
            node: self.display_name(node),
            target: self.display_name(target),
        }
    }
}
