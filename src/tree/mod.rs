//! In-memory filesystem tree
//!
//! Nodes live in an arena owned by [`Tree`] and are addressed by generational
//! [`NodeId`] handles. Directories own their children through an ordered list,
//! every node keeps a handle to its parent, and symlink targets are plain
//! handles that never own what they point to.

pub mod access;
pub mod lookup;
pub mod mutation;
pub mod name;
pub mod node;
pub mod size;

pub use name::{PATH_SEPARATOR, PLACEHOLDER_NAME, ROOT_MARKER};
pub use node::{Node, NodeContent, NODE_OVERHEAD};

use crate::clock::{Clock, SystemClock};
use crate::error::TreeError;
use crate::types::{NodeId, NodeType, Permissions};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace, warn};

/// Capacity limits enforced on every allocation and growth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeLimits {
    /// Maximum number of live nodes, root included
    #[serde(default = "default_max_nodes")]
    pub max_nodes: usize,

    /// Maximum sum of node footprints (see [`Node::footprint`])
    #[serde(default = "default_max_memory_bytes")]
    pub max_memory_bytes: u64,

    /// Names longer than this many characters are truncated
    #[serde(default = "default_max_name_len")]
    pub max_name_len: usize,

    /// Symlink chains longer than this are reported as loops
    #[serde(default = "default_max_symlink_hops")]
    pub max_symlink_hops: usize,
}

fn default_max_nodes() -> usize {
    4096
}

fn default_max_memory_bytes() -> u64 {
    1024 * 1024 // 1 MiB
}

fn default_max_name_len() -> usize {
    255
}

fn default_max_symlink_hops() -> usize {
    40
}

impl Default for TreeLimits {
    fn default() -> Self {
        Self {
            max_nodes: default_max_nodes(),
            max_memory_bytes: default_max_memory_bytes(),
            max_name_len: default_max_name_len(),
            max_symlink_hops: default_max_symlink_hops(),
        }
    }
}

impl TreeLimits {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_nodes == 0 {
            return Err("max_nodes must leave room for the root directory".to_string());
        }
        if self.max_name_len == 0 {
            return Err("max_name_len must be at least 1".to_string());
        }
        let root_footprint = node::footprint_of(ROOT_MARKER, None);
        if self.max_memory_bytes < root_footprint {
            return Err(format!(
                "max_memory_bytes must be at least {} (the root directory footprint)",
                root_footprint
            ));
        }
        Ok(())
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// A single filesystem tree and the arena that owns its nodes.
#[derive(Debug)]
pub struct Tree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeId,
    live_nodes: usize,
    used_bytes: u64,
    limits: TreeLimits,
    clock: Box<dyn Clock>,
}

impl Tree {
    /// Create a tree holding only the root directory, stamped by the host clock.
    pub fn new() -> Result<Self, TreeError> {
        Self::with_clock(TreeLimits::default(), Box::new(SystemClock))
    }

    pub fn with_limits(limits: TreeLimits) -> Result<Self, TreeError> {
        Self::with_clock(limits, Box::new(SystemClock))
    }

    /// Create a tree with explicit limits and clock.
    ///
    /// The root is named [`ROOT_MARKER`], has all permissions and is its own parent.
    #[instrument(skip(clock))]
    pub fn with_clock(limits: TreeLimits, clock: Box<dyn Clock>) -> Result<Self, TreeError> {
        limits.validate().map_err(TreeError::AllocationFailed)?;

        let placeholder = NodeId {
            index: 0,
            generation: 0,
        };
        let mut tree = Tree {
            slots: Vec::new(),
            free: Vec::new(),
            root: placeholder,
            live_nodes: 0,
            used_bytes: 0,
            limits,
            clock,
        };
        let created_at = tree.clock.now();
        let root = tree.allocate(|id| Node {
            name: ROOT_MARKER.to_string(),
            permissions: Permissions::ALL,
            created_at,
            content: NodeContent::Directory(Vec::new()),
            parent: id,
        })?;
        tree.root = root;
        debug!(root = %root, "Created tree");
        Ok(tree)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn limits(&self) -> &TreeLimits {
        &self.limits
    }

    /// Number of allocated nodes, including detached ones.
    pub fn live_nodes(&self) -> usize {
        self.live_nodes
    }

    /// Sum of the footprints of all allocated nodes.
    pub fn used_bytes(&self) -> u64 {
        self.used_bytes
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    pub(crate) fn get(&self, id: NodeId) -> Result<&Node, TreeError> {
        self.node(id).ok_or(TreeError::InvalidHandle(id))
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Result<&mut Node, TreeError> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
            .ok_or(TreeError::InvalidHandle(id))
    }

    /// Name of a node for error messages; the handle itself when stale.
    pub(crate) fn display_name(&self, id: NodeId) -> String {
        self.node(id)
            .map(|n| n.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    /// Allocate a node that is not yet linked into any directory.
    ///
    /// `parent` must be a directory; the new node records it as its parent but
    /// does not appear among its children until [`Tree::add_to_dir`] is called.
    /// An empty or missing name becomes [`PLACEHOLDER_NAME`].
    ///
    /// A node named [`ROOT_MARKER`] is a root: it is its own parent whatever
    /// `parent` says. It stays detached; [`Tree::root`] is unaffected.
    pub fn create_node(
        &mut self,
        parent: Option<NodeId>,
        name: Option<&str>,
        node_type: NodeType,
        permissions: Permissions,
    ) -> Result<NodeId, TreeError> {
        let name = name::normalize_name(name, self.limits.max_name_len);
        if name == ROOT_MARKER {
            let created_at = self.clock.now();
            let id = self.allocate(|id| Node {
                name,
                permissions: Permissions::from_bits(permissions.bits()),
                created_at,
                content: NodeContent::empty(node_type),
                parent: id,
            })?;
            debug!(node = %id, %node_type, "Allocated self-parented root node");
            return Ok(id);
        }
        name::validate_entry_name(&name)?;
        let parent = parent.ok_or_else(|| TreeError::MissingParent(name.clone()))?;
        let parent_node = self.get(parent)?;
        if !parent_node.is_dir() {
            return Err(TreeError::NotADirectory(parent_node.name.clone()));
        }

        let created_at = self.clock.now();
        let id = self.allocate(|_| Node {
            name,
            permissions: Permissions::from_bits(permissions.bits()),
            created_at,
            content: NodeContent::empty(node_type),
            parent,
        })?;
        trace!(node = %id, parent = %parent, %node_type, "Allocated node");
        Ok(id)
    }

    /// Allocate a node and append it to `parent`'s children.
    ///
    /// Requires Write on `parent`. If linking fails the allocation is undone.
    /// A root-marker name yields a detached root, as with [`Tree::create_node`].
    pub fn create(
        &mut self,
        parent: NodeId,
        name: Option<&str>,
        node_type: NodeType,
        permissions: Permissions,
    ) -> Result<NodeId, TreeError> {
        let id = self.create_node(Some(parent), name, node_type, permissions)?;
        if self.node(id).map_or(false, |n| n.parent == id) {
            return Ok(id);
        }
        // a node allocated just now has no descendants, so it cannot close a cycle
        if let Err(e) = self.attach(parent, id, false) {
            self.release_subtree(id);
            return Err(e);
        }
        debug!(node = %id, parent = %parent, %node_type, "Created node");
        Ok(id)
    }

    /// Destroy a node and, for directories, everything beneath it.
    ///
    /// The node is unlinked from its parent first. Symlink targets are never
    /// followed. Returns the number of nodes freed; stale handles and the root
    /// free nothing (use [`Tree::teardown`] for the whole tree).
    pub fn free_recursive(&mut self, id: NodeId) -> usize {
        if id == self.root {
            warn!("Refusing to free the root directory outside of teardown");
            return 0;
        }
        let Some(parent) = self.node(id).map(|n| n.parent) else {
            return 0;
        };
        self.unlink(parent, id);
        self.release_subtree(id)
    }

    /// Free every node reachable from the root and consume the tree.
    #[instrument(skip(self), fields(live_nodes = self.live_nodes))]
    pub fn teardown(mut self) -> usize {
        let root = self.root;
        let freed = self.release_subtree(root);
        if self.live_nodes > 0 {
            debug!(detached = self.live_nodes, "Dropping detached nodes");
        }
        debug!(freed, "Tree torn down");
        freed
    }

    /// Remove `child` from `parent`'s children, keeping sibling order.
    pub(crate) fn unlink(&mut self, parent: NodeId, child: NodeId) -> bool {
        let Ok(parent_node) = self.get_mut(parent) else {
            return false;
        };
        match &mut parent_node.content {
            NodeContent::Directory(children) => {
                match children.iter().position(|c| *c == child) {
                    Some(pos) => {
                        children.remove(pos);
                        true
                    }
                    None => false,
                }
            }
            _ => false,
        }
    }

    /// Whether `id` is the root or currently listed among its parent's children.
    pub fn is_linked(&self, id: NodeId) -> bool {
        if id == self.root {
            return true;
        }
        self.node(id)
            .and_then(|n| self.node(n.parent))
            .map_or(false, |p| p.children().contains(&id))
    }

    /// Whether `ancestor` is `node` or one of its parents.
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = node;
        // parent chains are bounded by the node count
        for _ in 0..=self.live_nodes {
            if current == ancestor {
                return true;
            }
            match self.node(current) {
                Some(n) if n.parent != current => current = n.parent,
                _ => return false,
            }
        }
        false
    }

    /// Check that `extra_nodes` more nodes adding `extra_bytes` would fit.
    pub(crate) fn ensure_capacity(&self, extra_nodes: usize, extra_bytes: u64) -> Result<(), TreeError> {
        if self.live_nodes + extra_nodes > self.limits.max_nodes {
            return Err(TreeError::AllocationFailed(format!(
                "node limit of {} reached",
                self.limits.max_nodes
            )));
        }
        if self.used_bytes + extra_bytes > self.limits.max_memory_bytes {
            return Err(TreeError::AllocationFailed(format!(
                "memory limit of {} bytes reached ({} in use, {} requested)",
                self.limits.max_memory_bytes, self.used_bytes, extra_bytes
            )));
        }
        Ok(())
    }

    /// Check that replacing a footprint of `old` bytes by `new` bytes would fit.
    pub(crate) fn ensure_growth(&self, old: u64, new: u64) -> Result<(), TreeError> {
        if new > old {
            self.ensure_capacity(0, new - old)
        } else {
            Ok(())
        }
    }

    pub(crate) fn adjust_used_bytes(&mut self, old: u64, new: u64) {
        self.used_bytes = self.used_bytes - old + new;
    }

    pub(crate) fn now(&self) -> crate::types::Timestamp {
        self.clock.now()
    }

    /// Place a node built by `build` (which receives the node's own handle)
    /// into a free slot, subject to the capacity limits.
    pub(crate) fn allocate(
        &mut self,
        build: impl FnOnce(NodeId) -> Node,
    ) -> Result<NodeId, TreeError> {
        let id = match self.free.last() {
            Some(&index) => NodeId {
                index,
                generation: self.slots[index as usize].generation,
            },
            None => NodeId {
                index: u32::try_from(self.slots.len()).map_err(|_| {
                    TreeError::AllocationFailed("arena index space exhausted".to_string())
                })?,
                generation: 0,
            },
        };

        let node = build(id);
        self.ensure_capacity(1, node.footprint())?;

        if self.free.last() == Some(&id.index) {
            self.free.pop();
        } else {
            self.slots.push(Slot {
                generation: id.generation,
                node: None,
            });
        }
        self.used_bytes += node.footprint();
        self.live_nodes += 1;
        self.slots[id.index as usize].node = Some(node);
        Ok(id)
    }

    /// Free `id` and its descendants without touching any parent's child list.
    pub(crate) fn release_subtree(&mut self, id: NodeId) -> usize {
        let mut freed = 0;
        let mut work = vec![id];
        while let Some(current) = work.pop() {
            let Some(slot) = self
                .slots
                .get_mut(current.index as usize)
                .filter(|slot| slot.generation == current.generation)
            else {
                continue;
            };
            let Some(node) = slot.node.take() else {
                continue;
            };
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(current.index);
            self.used_bytes -= node.footprint();
            self.live_nodes -= 1;
            freed += 1;

            if let NodeContent::Directory(children) = node.content {
                work.extend(children);
            }
        }
        trace!(node = %id, freed, "Released subtree");
        freed
    }
}
