//! Integration tests for the WSFS tree engine, shell and configuration

pub mod test_utils;

mod lookup;
mod permissions;
mod tree_lifecycle;
