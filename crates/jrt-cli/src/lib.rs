//! JRT index CLI library.
//!
//! This library provides the core functionality for the `jrt-index` tool,
//! exposing modules for commands, layout resolution and formatters that can
//! be tested.

#![allow(clippy::missing_errors_doc)]

use clap::ValueEnum;
use jrt_index::IndexSource;

pub mod commands;
pub mod formatters;
pub mod layout;

/// Filesystem of the installation to index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SourceArg {
    /// Module image loaded through `lib/jrt-fs.jar` and the packaged modules.
    #[default]
    Image,
    /// Symbol archive `lib/ct.sym`.
    Symbols,
}

impl From<SourceArg> for IndexSource {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Image => Self::ModuleImage,
            SourceArg::Symbols => Self::SymbolArchive,
        }
    }
}
