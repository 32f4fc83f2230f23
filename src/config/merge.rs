//! Merge rules applied before any source is layered on.

pub mod merge_policy;
