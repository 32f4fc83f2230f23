//! Entry point for loading configuration.

use super::merge::merge_policy;
use super::sources::{environment, explicit_file, global_file};
use super::WsfsConfig;
use crate::error::ApiError;
use config::builder::DefaultState;
use config::ConfigBuilder;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from defaults, the global config file and the environment.
    pub fn load() -> Result<WsfsConfig, ApiError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        Self::finish(environment::add_to_builder(builder))
    }

    /// Load configuration from an explicit file instead of the global one.
    /// Environment variables still apply on top.
    pub fn load_from_file(path: &Path) -> Result<WsfsConfig, ApiError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = explicit_file::add_to_builder(builder, path)?;
        Self::finish(environment::add_to_builder(builder))
    }

    /// Location of the global config file, if a home directory can be found.
    pub fn global_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }

    /// Built-in defaults without consulting any source.
    #[allow(clippy::should_implement_trait)]
    pub fn default() -> WsfsConfig {
        WsfsConfig::default()
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<WsfsConfig, ApiError> {
        let config: WsfsConfig = builder.build()?.try_deserialize()?;

        config.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })?;

        debug!(limits = ?config.limits, "Loaded configuration");
        Ok(config)
    }
}
