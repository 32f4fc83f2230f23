//! Size computation

use super::Tree;
use crate::types::{NodeId, Permissions};

impl Tree {
    /// Footprint of `id` and everything beneath it.
    ///
    /// Each node counts [`NODE_OVERHEAD`](super::NODE_OVERHEAD) plus its name
    /// and, for files, its content (both with a terminator byte). A node
    /// without Read contributes nothing, and neither does its subtree.
    /// Symlink targets are not followed. Stale handles have size 0.
    pub fn get_size(&self, id: NodeId) -> u64 {
        let mut total = 0;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.node(current) else {
                continue;
            };
            if !node.permissions.contains(Permissions::READ) {
                continue;
            }
            total += node.footprint();
            stack.extend_from_slice(node.children());
        }
        total
    }
}
