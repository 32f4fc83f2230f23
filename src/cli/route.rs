//! CLI route: single route table and run context.

use crate::cli::help::command_name;
use crate::cli::parse::Commands;
use crate::config::{ConfigLoader, WsfsConfig};
use crate::error::ApiError;
use crate::session::Session;
use crate::shell::Shell;
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::{debug, info};

/// Runtime context for CLI execution: the effective configuration.
pub struct RunContext {
    config: WsfsConfig,
}

impl RunContext {
    /// Load configuration from `config_path`, or from the default sources.
    pub fn new(config_path: Option<&Path>) -> Result<Self, ApiError> {
        let config = match config_path {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load()?,
        };
        Ok(Self::from_config(config))
    }

    pub fn from_config(config: WsfsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WsfsConfig {
        &self.config
    }

    /// Turn colored listings on or off regardless of configuration.
    pub fn with_color(mut self, enabled: bool) -> Self {
        self.config.shell.color = enabled;
        self
    }

    /// Execute a command reading from `input` and writing to `output`.
    pub fn execute<R: BufRead, W: Write>(
        &self,
        command: &Commands,
        input: R,
        mut output: W,
    ) -> Result<(), ApiError> {
        info!(command = command_name(command), "Executing command");
        match command {
            Commands::Shell => {
                let session = Session::with_limits(self.config.limits.clone())?;
                let mut shell = Shell::new(session, self.config.shell.clone(), input, output);
                shell.run()?;
                let freed = shell.into_session().teardown();
                debug!(freed, "Session torn down");
            }
            Commands::Config => {
                let text = toml::to_string_pretty(&self.config).map_err(|e| {
                    ApiError::ConfigError(format!("Failed to render configuration: {}", e))
                })?;
                write!(output, "{}", text)?;
            }
        }
        Ok(())
    }
}
