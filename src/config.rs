//! Configuration System
//!
//! Layered configuration for the tree limits, the interactive shell and
//! logging. Built-in defaults are overridden by the global config file (or an
//! explicit file) and then by `WSFS__*` environment variables.

use crate::logging::LoggingConfig;
use crate::tree::TreeLimits;
use crate::types::Permissions;
use serde::{Deserialize, Serialize};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WsfsConfig {
    /// Capacity limits of the in-memory tree
    #[serde(default)]
    pub limits: TreeLimits,

    /// Interactive shell settings
    #[serde(default)]
    pub shell: ShellConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Interactive shell configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShellConfig {
    /// Highlight directories and errors in listings
    #[serde(default = "default_true")]
    pub color: bool,

    /// Line that terminates multi-line input for the write command
    #[serde(default = "default_eof_marker")]
    pub eof_marker: String,

    /// Permissions given to nodes created from the shell
    #[serde(default)]
    pub default_permissions: DefaultPermissions,
}

/// Permissions per created node type, as octal digits (e.g. `6` for `rw-`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultPermissions {
    #[serde(default = "default_file_permissions")]
    pub file: Permissions,

    #[serde(default = "default_directory_permissions")]
    pub directory: Permissions,

    #[serde(default = "default_symlink_permissions")]
    pub symlink: Permissions,
}

fn default_true() -> bool {
    true
}

fn default_eof_marker() -> String {
    "EOF".to_string()
}

fn default_file_permissions() -> Permissions {
    Permissions::READ | Permissions::WRITE
}

fn default_directory_permissions() -> Permissions {
    Permissions::ALL
}

fn default_symlink_permissions() -> Permissions {
    Permissions::READ | Permissions::WRITE
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            color: default_true(),
            eof_marker: default_eof_marker(),
            default_permissions: DefaultPermissions::default(),
        }
    }
}

impl Default for DefaultPermissions {
    fn default() -> Self {
        Self {
            file: default_file_permissions(),
            directory: default_directory_permissions(),
            symlink: default_symlink_permissions(),
        }
    }
}

impl DefaultPermissions {
    pub fn for_type(&self, node_type: crate::types::NodeType) -> Permissions {
        use crate::types::NodeType;
        match node_type {
            NodeType::File => self.file,
            NodeType::Directory => self.directory,
            NodeType::Symlink => self.symlink,
        }
    }
}

impl ShellConfig {
    /// Validate shell configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.eof_marker.trim().is_empty() {
            return Err("EOF marker cannot be empty".to_string());
        }
        if self.eof_marker.contains(&['\n', '\r'][..]) {
            return Err("EOF marker must fit on a single line".to_string());
        }
        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Limits(String),
    Shell(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Limits(msg) => write!(f, "Limits: {}", msg),
            ValidationError::Shell(msg) => write!(f, "Shell: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl WsfsConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.limits.validate() {
            errors.push(ValidationError::Limits(e));
        }
        if let Err(e) = self.shell.validate() {
            errors.push(ValidationError::Shell(e));
        }
        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
