//! Interactive shell: single-key commands read line by line over a [`Session`](crate::session::Session).
//!
//! Before every prompt the current directory is listed `ls -l` style. Engine
//! errors are reported as a single `error: ...` line and the loop continues.

mod command;
mod help;
mod presentation;
mod route;

pub use command::ShellCommand;
pub use help::help_text;
pub use presentation::{format_error, format_listing, format_node_line};
pub use route::{Shell, PROMPT};
