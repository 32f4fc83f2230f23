//! Configuration sources, lowest precedence first: global file or explicit
//! file, then environment.

pub mod environment;
pub mod explicit_file;
pub mod global_file;
