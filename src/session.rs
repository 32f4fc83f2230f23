//! Session: one tree plus the current-directory cursor that walks it.

use crate::error::TreeError;
use crate::tree::{Tree, TreeLimits};
use crate::types::NodeId;
use tracing::debug;

/// Explicit owner of a tree and the caller's current directory.
#[derive(Debug)]
pub struct Session {
    tree: Tree,
    cwd: NodeId,
}

impl Session {
    pub fn new(tree: Tree) -> Self {
        let cwd = tree.root();
        Self { tree, cwd }
    }

    pub fn with_limits(limits: TreeLimits) -> Result<Self, TreeError> {
        Ok(Self::new(Tree::with_limits(limits)?))
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    /// Current directory. Falls back to the root if the directory was freed.
    pub fn cwd(&self) -> NodeId {
        if self.tree.contains(self.cwd) {
            self.cwd
        } else {
            self.tree.root()
        }
    }

    /// Child of the current directory named `name`.
    pub fn lookup(&self, name: &str) -> Option<NodeId> {
        self.tree.find_in_dir(self.cwd(), name)
    }

    /// Like [`Session::lookup`], but a miss is an error naming the directory.
    pub fn child(&self, name: &str) -> Result<NodeId, TreeError> {
        self.lookup(name).ok_or_else(|| TreeError::NotFound {
            dir: self.tree.display_name(self.cwd()),
            name: name.to_string(),
        })
    }

    /// Enter the child directory (or symlink to a directory) named `name`.
    pub fn change_dir(&mut self, name: &str) -> Result<(), TreeError> {
        let cwd = self.cwd();
        let target = self.child(name)?;
        let mut next = cwd;
        self.tree.change_current_dir(&mut next, target)?;
        self.cwd = next;
        Ok(())
    }

    /// Return to the parent directory. At the root this stays put.
    ///
    /// The parent must grant `r-x`, like any other change of directory.
    pub fn go_back(&mut self) -> Result<(), TreeError> {
        let cwd = self.cwd();
        let parent = self.tree.node(cwd).map_or(self.tree.root(), |n| n.parent());
        let mut next = cwd;
        self.tree.change_current_dir(&mut next, parent)?;
        debug!(from = %cwd, to = %next, "Went back");
        self.cwd = next;
        Ok(())
    }

    /// Free the whole tree. Returns the number of nodes freed.
    pub fn teardown(self) -> usize {
        self.tree.teardown()
    }
}
