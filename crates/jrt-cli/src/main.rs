//! JRT package index CLI.
//!
//! Command-line interface for listing which module of a runtime
//! installation provides each package.
//!
//! # Architecture
//!
//! The CLI is organized around subcommands:
//! - `packages` - Index the module image or symbol archive of an installation
//! - `completions` - Generate shell completions
//!
//! # Examples
//!
//! ```bash
//! # Index a modern installation
//! jrt-index packages /usr/lib/jvm/java-21
//!
//! # Index the symbol archive of an early-generation installation as JSON
//! jrt-index --format json packages /opt/jdk-9-ea --source symbols --generation early
//! ```

#![allow(clippy::missing_errors_doc)]

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use jrt_core::Generation;
use jrt_core::cli::{ExitCode, OutputFormat};
use jrt_index_cli::{SourceArg, commands};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// JRT Index - package to module maps of runtime installations.
///
/// Opens the module image (or the legacy symbol archive) of an installation
/// and prints which module provides each package.
#[derive(Parser, Debug)]
#[command(name = "jrt-index")]
#[command(version, about, long_about = None)]
#[command(author = "JRT Index Team")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (json, text, pretty)
    #[arg(long = "format", global = true, default_value = "pretty")]
    format: String,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List packages of an installation with the module providing each.
    ///
    /// # Examples
    ///
    /// ```bash
    /// # Module image of a released installation
    /// jrt-index packages /usr/lib/jvm/java-21
    ///
    /// # Helper archive directly under the root
    /// jrt-index packages /opt/jdk-ea --generation early
    ///
    /// # Custom layout file
    /// jrt-index packages /opt/jdk --layout ./layout.toml
    /// ```
    Packages {
        /// Installation root
        #[arg(env = "JAVA_HOME")]
        java_home: PathBuf,

        /// Filesystem to index
        #[arg(long, value_enum, default_value_t = SourceArg::Image)]
        source: SourceArg,

        /// Layout preset (modern, early)
        #[arg(long)]
        generation: Option<Generation>,

        /// Layout file (TOML) overriding the preset
        #[arg(long, conflicts_with = "generation")]
        layout: Option<PathBuf>,
    },

    /// Generate shell completions.
    ///
    /// Generates completion scripts for various shells that can be
    /// sourced or saved to enable tab completion for this CLI.
    Completions {
        /// Target shell for completion generation
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let output_format = cli
        .format
        .parse::<OutputFormat>()
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    let exit_code = execute_command(cli.command, output_format)?;

    std::process::exit(exit_code.as_i32());
}

/// Initializes logging to stderr.
///
/// `--verbose` forces debug level, otherwise `RUST_LOG` applies with
/// `info` as the default.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Routes commands to their handlers and returns the exit code.
fn execute_command(command: Commands, output_format: OutputFormat) -> Result<ExitCode> {
    match command {
        Commands::Packages {
            java_home,
            source,
            generation,
            layout,
        } => commands::packages::run(
            &java_home,
            source,
            generation,
            layout.as_deref(),
            output_format,
        ),
        Commands::Completions { shell } => {
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            commands::completions::run(shell, &mut cmd)
        }
    }
}
