//! Node representation stored in the tree arena

use crate::types::{NodeId, NodeType, Permissions, Timestamp};

/// Fixed per-node cost used by size accounting.
pub const NODE_OVERHEAD: u64 = std::mem::size_of::<Node>() as u64;

/// Type-specific payload of a node.
///
/// The variant is chosen at creation and never changes, so a node's type is
/// always the type of its content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeContent {
    /// Children in insertion order.
    Directory(Vec<NodeId>),
    /// Owned text, `None` until first written.
    File(Option<String>),
    /// Non-owning alias, `None` when unset.
    Symlink(Option<NodeId>),
}

impl NodeContent {
    pub fn empty(node_type: NodeType) -> Self {
        match node_type {
            NodeType::Directory => NodeContent::Directory(Vec::new()),
            NodeType::File => NodeContent::File(None),
            NodeType::Symlink => NodeContent::Symlink(None),
        }
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            NodeContent::Directory(_) => NodeType::Directory,
            NodeContent::File(_) => NodeType::File,
            NodeContent::Symlink(_) => NodeType::Symlink,
        }
    }
}

/// A file, directory or symbolic link.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) name: String,
    pub(crate) permissions: Permissions,
    pub(crate) created_at: Timestamp,
    pub(crate) content: NodeContent,
    /// Owning directory; the root points at itself.
    pub(crate) parent: NodeId,
}

impl Node {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn node_type(&self) -> NodeType {
        self.content.node_type()
    }

    pub fn permissions(&self) -> Permissions {
        self.permissions
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn parent(&self) -> NodeId {
        self.parent
    }

    pub fn content(&self) -> &NodeContent {
        &self.content
    }

    pub fn is_dir(&self) -> bool {
        matches!(self.content, NodeContent::Directory(_))
    }

    /// Children of a directory; empty for files and symlinks.
    pub fn children(&self) -> &[NodeId] {
        match &self.content {
            NodeContent::Directory(children) => children,
            _ => &[],
        }
    }

    pub fn file_content(&self) -> Option<&str> {
        match &self.content {
            NodeContent::File(content) => content.as_deref(),
            _ => None,
        }
    }

    pub fn symlink_target(&self) -> Option<NodeId> {
        match self.content {
            NodeContent::Symlink(target) => target,
            _ => None,
        }
    }

    /// Bytes this node accounts for on its own, excluding children.
    pub fn footprint(&self) -> u64 {
        footprint_of(&self.name, self.file_content())
    }
}

/// Overhead plus NUL-terminated name and, for files, NUL-terminated content.
pub(crate) fn footprint_of(name: &str, content: Option<&str>) -> u64 {
    NODE_OVERHEAD + name.len() as u64 + 1 + content.map_or(0, |c| c.len() as u64 + 1)
}
