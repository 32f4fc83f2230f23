//! Listing formatters.

use crate::tree::{Node, Tree};
use crate::types::{NodeId, NodeType};
use owo_colors::OwoColorize;
use std::fmt::Display;

/// `<type><rwx> <size> <YYYY-MM-DD HH:MM> <name>`, followed for symlinks by
/// ` -> ` and the same description of the target when it can be read.
pub fn format_node_line(tree: &Tree, id: NodeId, color: bool) -> Option<String> {
    let node = tree.node(id)?;
    let mut line = describe(tree, id, node, color);
    if node.node_type() == NodeType::Symlink {
        if let Ok(Some(target)) = tree.symlink_target(id) {
            if let Some(target_node) = tree.node(target) {
                line.push_str(" -> ");
                line.push_str(&describe(tree, target, target_node, color));
            }
        }
    }
    Some(line)
}

/// The directory's own line, then one line per child in order.
///
/// A directory that may not be traversed lists only itself plus an error line.
pub fn format_listing(tree: &Tree, dir: NodeId, color: bool) -> Vec<String> {
    let mut lines: Vec<String> = format_node_line(tree, dir, color).into_iter().collect();
    match tree.children(dir) {
        Ok(children) => lines.extend(
            children
                .into_iter()
                .filter_map(|child| format_node_line(tree, child, color)),
        ),
        Err(e) => lines.push(format_error(&e, color)),
    }
    lines
}

pub fn format_error(error: &dyn Display, color: bool) -> String {
    if color {
        format!("{} {}", "error:".red().bold(), error)
    } else {
        format!("error: {}", error)
    }
}

fn describe(tree: &Tree, id: NodeId, node: &Node, color: bool) -> String {
    let name = if color && node.is_dir() {
        node.name().blue().bold().to_string()
    } else if color && node.node_type() == NodeType::Symlink {
        node.name().cyan().to_string()
    } else {
        node.name().to_string()
    };
    format!(
        "{}{} {:>6} {} {}",
        node.node_type().letter(),
        node.permissions().symbolic(),
        tree.get_size(id),
        node.created_at(),
        name
    )
}
