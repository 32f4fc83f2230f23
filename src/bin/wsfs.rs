//! wsfs Binary
//!
//! Loads configuration, initializes logging and runs the interactive shell
//! (or another command) over stdin and stdout.

use clap::Parser;
use std::process;
use tracing::{error, info};
use wsfs::cli::{map_error, Cli, RunContext};
use wsfs::logging::{init_logging, LoggingConfig};

fn main() {
    let cli = Cli::parse();

    let context = match RunContext::new(cli.config.as_deref()) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    };
    let context = if cli.no_color {
        context.with_color(false)
    } else {
        context
    };

    let logging_config = build_logging_config(&cli, &context.config().logging);
    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("wsfs starting");

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    match context.execute(&cli.command(), stdin.lock(), stdout.lock()) {
        Ok(()) => info!("Command completed successfully"),
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    }
}

/// Build logging configuration from CLI args on top of the loaded config.
/// Logging stays off unless `--verbose` is given.
fn build_logging_config(cli: &Cli, loaded: &LoggingConfig) -> LoggingConfig {
    if !cli.verbose {
        return LoggingConfig {
            enabled: false,
            ..loaded.clone()
        };
    }

    let mut config = loaded.clone();
    config.enabled = true;

    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        config.output = output.clone();
    }
    if let Some(ref file) = cli.log_file {
        config.file = file.clone();
        if cli.log_output.is_none() {
            config.output = "file".to_string();
        }
    }
    if cli.no_color {
        config.color = false;
    }

    config
}
