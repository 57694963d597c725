//! Command implementations for the `jrt-index` CLI.
//!
//! Each command module resolves its arguments, runs the operation and
//! formats output according to the requested format.

pub mod completions;
pub mod packages;
