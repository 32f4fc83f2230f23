//! CLI parse: clap types for wsfs. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// wsfs - an in-memory filesystem explored from an interactive shell
#[derive(Parser, Debug)]
#[command(name = "wsfs")]
#[command(about = "In-memory filesystem with an interactive shell")]
pub struct Cli {
    /// Command to run (default: shell)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Disable colored listings
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Shell)
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start the interactive shell on a fresh tree
    Shell,
    /// Print the effective configuration as TOML
    Config,
}
