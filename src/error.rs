//! Error types for the WSFS tree engine and the application around it.

use crate::types::{NodeId, Permissions};
use thiserror::Error;

/// Tree engine errors.
///
/// Every variant except [`TreeError::AllocationFailed`] is a precondition
/// violation. An operation that returns any of them has left the tree unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("Allocation failed: {0}")]
    AllocationFailed(String),

    #[error("Stale or unknown node handle: {0}")]
    InvalidHandle(NodeId),

    #[error("Permission denied: '{name}' requires {required}")]
    PermissionDenied { name: String, required: Permissions },

    #[error("Not a directory: '{0}'")]
    NotADirectory(String),

    #[error("Not a file: '{0}'")]
    NotAFile(String),

    #[error("Not a symbolic link: '{0}'")]
    NotASymlink(String),

    #[error("No entry named '{name}' in '{dir}'")]
    NotFound { dir: String, name: String },

    #[error("An entry named '{name}' already exists in '{dir}'")]
    AlreadyExists { dir: String, name: String },

    #[error("'{0}' is already linked into a directory")]
    AlreadyLinked(String),

    #[error("Cannot place '{node}' inside its own subtree ('{target}')")]
    WouldCycle { node: String, target: String },

    #[error("Operation not permitted on the root directory")]
    RootImmutable,

    #[error("Name '{0}' is reserved")]
    ReservedName(String),

    #[error("Name '{0}' may not contain the path separator")]
    InvalidName(String),

    #[error("No parent directory given for '{0}'")]
    MissingParent(String),

    #[error("Dangling symbolic link: '{0}'")]
    DanglingSymlink(String),

    #[error("Too many levels of symbolic links resolving '{name}' (limit {limit})")]
    SymlinkLoop { name: String, limit: usize },
}

impl TreeError {
    /// Precondition violations (as opposed to allocation failures).
    pub fn is_precondition(&self) -> bool {
        !matches!(self, TreeError::AllocationFailed(_))
    }
}

/// Application-level errors (configuration, logging, shell I/O).
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Tree(#[from] TreeError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<ParsePermissionsError> for ApiError {
    fn from(err: ParsePermissionsError) -> Self {
        ApiError::InvalidInput(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid permissions '{0}' (expected 0-7 or an rwx mask such as 'rw-')")]
pub struct ParsePermissionsError(pub String);
