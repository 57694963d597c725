//! Packages command implementation.
//!
//! Opens the module image or symbol archive of an installation, builds the
//! package to module index and prints it.

use crate::SourceArg;
use crate::formatters::format_packages;
use crate::layout::resolve_layout;
use anyhow::{Context, Result};
use jrt_core::cli::{ExitCode, OutputFormat};
use jrt_core::{Error, Generation, InstallLayout};
use jrt_index::{FileSystemOpener, IndexSource, JrtSession, PackageIndex, PackageMap};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A package left out of the index, as reported to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    /// Package name
    pub package: String,
    /// Why its modules could not be listed
    pub reason: String,
}

/// Output of the packages command.
#[derive(Debug, Clone, Serialize)]
pub struct PackagesReport {
    /// Installation root that was indexed
    pub java_home: PathBuf,
    /// Indexed filesystem (`image` or `symbols`)
    pub source: String,
    /// Package to module map in listing order
    pub packages: PackageMap,
    /// Packages that could not be indexed
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedEntry>,
}

impl PackagesReport {
    /// Builds the report for an index of `java_home`.
    #[must_use]
    pub fn new(java_home: &Path, source: IndexSource, index: PackageIndex) -> Self {
        Self {
            java_home: java_home.to_path_buf(),
            source: source.to_string(),
            packages: index.packages,
            skipped: index
                .skipped
                .into_iter()
                .map(|s| SkippedEntry {
                    package: s.package,
                    reason: s.error.to_string(),
                })
                .collect(),
        }
    }
}

/// Indexes `java_home` with `layout` and returns the report.
///
/// Every handle opened for the index is released before returning.
///
/// # Errors
///
/// Returns the core error unchanged so callers can tell a missing
/// installation from an environment or I/O failure.
pub fn index_installation(
    java_home: &Path,
    source: IndexSource,
    layout: InstallLayout,
) -> jrt_core::Result<PackagesReport> {
    let session = JrtSession::new(FileSystemOpener::new().with_layout(layout));
    let index = session.index_installation(java_home, source)?;

    let report = session.dispose();
    for failure in &report.failures {
        warn!("Could not release {}: {}", failure.id, failure.error);
    }

    Ok(PackagesReport::new(java_home, source, index))
}

/// Runs the packages command.
///
/// # Arguments
///
/// * `java_home` - Installation root
/// * `source` - Filesystem to index
/// * `generation` - Layout preset, if given
/// * `layout` - Layout file, if given
/// * `output_format` - Output format (json, text, pretty)
///
/// # Returns
///
/// - `ExitCode::SUCCESS` when every package was indexed
/// - `ExitCode::PARTIAL` when some packages were skipped
/// - `ExitCode::NOT_AN_INSTALLATION` when a provider archive is missing
/// - `ExitCode::ENVIRONMENT_ERROR` when no provider handles the archive
///
/// # Errors
///
/// Returns an error for layout and I/O failures.
pub fn run(
    java_home: &Path,
    source: SourceArg,
    generation: Option<Generation>,
    layout: Option<&Path>,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    let source = IndexSource::from(source);
    info!("Indexing {} of {}", source, java_home.display());

    let layout = resolve_layout(layout, generation)?;

    let report = match index_installation(java_home, source, layout) {
        Ok(report) => report,
        Err(Error::InstallationNotFound { root, missing }) => {
            eprintln!(
                "{} is not a valid installation (missing {})",
                root.display(),
                missing.display()
            );
            return Ok(ExitCode::NOT_AN_INSTALLATION);
        }
        Err(e) if e.is_fatal() => {
            eprintln!("Unsupported runtime environment: {e}");
            return Ok(ExitCode::ENVIRONMENT_ERROR);
        }
        Err(e) => {
            return Err(e)
                .with_context(|| format!("failed to index {}", java_home.display()));
        }
    };

    println!("{}", format_packages(&report, output_format)?);

    if report.skipped.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        warn!("{} packages skipped", report.skipped.len());
        Ok(ExitCode::PARTIAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_not_an_installation() {
        let dir = TempDir::new().unwrap();
        let code = run(
            dir.path(),
            SourceArg::Image,
            Some(Generation::Modern),
            None,
            OutputFormat::Text,
        )
        .unwrap();
        assert_eq!(code, ExitCode::NOT_AN_INSTALLATION);
    }

    #[test]
    fn test_symbols_not_an_installation() {
        let dir = TempDir::new().unwrap();
        let code = run(
            dir.path(),
            SourceArg::Symbols,
            Some(Generation::Early),
            None,
            OutputFormat::Json,
        )
        .unwrap();
        assert_eq!(code, ExitCode::NOT_AN_INSTALLATION);
    }

    #[test]
    fn test_report_from_index() {
        let mut index = PackageIndex::default();
        index.packages.insert("java.lang", "java.base");
        index.skipped.push(jrt_index::SkippedPackage {
            package: "broken".to_string(),
            error: Error::PathNotFound {
                path: "/packages/broken".to_string(),
            },
        });

        let report = PackagesReport::new(Path::new("/jdk"), IndexSource::SymbolArchive, index);
        assert_eq!(report.source, "symbols");
        assert_eq!(report.packages.get("java.lang"), Some("java.base"));
        assert_eq!(report.skipped[0].package, "broken");
        assert!(report.skipped[0].reason.contains("/packages/broken"));
    }
}
