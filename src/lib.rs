//! WSFS: an in-memory hierarchical filesystem
//!
//! A tree of directories, files and symbolic links held in an arena and
//! addressed by generational handles. Every node carries its own
//! read/write/execute permission bits that gate the operations on it, and
//! the whole tree is bounded by configurable node and memory quotas.
//!
//! The [`tree::Tree`] engine never prints; [`shell::Shell`] is a thin
//! interactive front end over a [`session::Session`].

pub mod cli;
pub mod clock;
pub mod config;
pub mod error;
pub mod logging;
pub mod session;
pub mod shell;
pub mod tree;
pub mod types;

pub use error::{ApiError, TreeError};
pub use session::Session;
pub use tree::{Tree, TreeLimits};
pub use types::{is_permissions_equal, NodeId, NodeType, Permissions, Timestamp};
