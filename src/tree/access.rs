//! Permission checks and changes

use super::{Node, Tree};
use crate::error::TreeError;
use crate::types::{is_permissions_equal, NodeId, Permissions};
use tracing::debug;

impl Tree {
    /// Whether `id` is live and carries every bit of `required`.
    pub fn has_permissions(&self, id: NodeId, required: Permissions) -> bool {
        self.node(id)
            .map_or(false, |n| is_permissions_equal(n.permissions, required))
    }

    /// Resolve a handle and check its permissions in one step.
    pub(crate) fn require(&self, id: NodeId, required: Permissions) -> Result<&Node, TreeError> {
        let node = self.get(id)?;
        if is_permissions_equal(node.permissions, required) {
            Ok(node)
        } else {
            Err(TreeError::PermissionDenied {
                name: node.name.clone(),
                required,
            })
        }
    }

    /// Replace a node's permissions. Bits outside the rwx mask are dropped.
    ///
    /// Not permission-gated: this is the owner's escape hatch for regaining
    /// access to a node.
    pub fn change_permissions(&mut self, id: NodeId, permissions: Permissions) -> Result<(), TreeError> {
        let node = self.get_mut(id)?;
        let masked = Permissions::from_bits(permissions.bits());
        debug!(node = %id, from = %node.permissions, to = %masked, "Changed permissions");
        node.permissions = masked;
        Ok(())
    }
}
