//! CLI command-name contract for logging and routing.

use crate::cli::parse::Commands;

/// Command name string for log records (e.g. "shell", "config").
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Shell => "shell",
        Commands::Config => "config",
    }
}
