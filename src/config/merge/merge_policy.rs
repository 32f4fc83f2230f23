//! Merge rules: defaults, override order, conflict handling.

use crate::config::ShellConfig;
use crate::logging::LoggingConfig;
use crate::tree::TreeLimits;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
///
/// Later sources override these key by key, so a file that sets only
/// `limits.max_nodes` keeps every other default.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    let limits = TreeLimits::default();
    let shell = ShellConfig::default();
    let logging = LoggingConfig::default();

    Config::builder()
        .set_default("limits.max_nodes", limits.max_nodes as u64)?
        .set_default("limits.max_memory_bytes", limits.max_memory_bytes)?
        .set_default("limits.max_name_len", limits.max_name_len as u64)?
        .set_default("limits.max_symlink_hops", limits.max_symlink_hops as u64)?
        .set_default("shell.color", shell.color)?
        .set_default("shell.eof_marker", shell.eof_marker)?
        .set_default(
            "shell.default_permissions.file",
            u64::from(shell.default_permissions.file.bits()),
        )?
        .set_default(
            "shell.default_permissions.directory",
            u64::from(shell.default_permissions.directory.bits()),
        )?
        .set_default(
            "shell.default_permissions.symlink",
            u64::from(shell.default_permissions.symlink.bits()),
        )?
        .set_default("logging.enabled", logging.enabled)?
        .set_default("logging.level", logging.level)?
        .set_default("logging.format", logging.format)?
        .set_default("logging.output", logging.output)?
        .set_default("logging.file", logging.file.to_string_lossy().into_owned())?
        .set_default("logging.color", logging.color)
}
