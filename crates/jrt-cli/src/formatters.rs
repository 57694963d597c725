//! Output formatters for CLI commands.
//!
//! Provides consistent formatting for JSON, text, and pretty output modes.
//! Package maps keep their listing order in every mode.

use crate::commands::packages::PackagesReport;
use anyhow::Result;
use colored::Colorize;
use jrt_core::cli::OutputFormat;
use serde::Serialize;

/// Formats a packages report.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
///
/// # Examples
///
/// ```
/// use jrt_core::cli::OutputFormat;
/// use jrt_index::PackageMap;
/// use jrt_index_cli::commands::packages::PackagesReport;
/// use jrt_index_cli::formatters::format_packages;
/// use std::path::PathBuf;
///
/// let mut packages = PackageMap::new();
/// packages.insert("java.lang", "java.base");
/// let report = PackagesReport {
///     java_home: PathBuf::from("/opt/jdk"),
///     source: "image".to_string(),
///     packages,
///     skipped: Vec::new(),
/// };
///
/// let output = format_packages(&report, OutputFormat::Text)?;
/// assert_eq!(output, "java.lang -> java.base");
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn format_packages(report: &PackagesReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json::format(report),
        OutputFormat::Text => Ok(text::format_packages(report)),
        OutputFormat::Pretty => Ok(pretty::format_packages(report)),
    }
}

/// JSON output formatting.
pub mod json {
    use super::{Result, Serialize};

    /// Format data as JSON.
    ///
    /// Uses pretty-printing with 2-space indentation.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        let json = serde_json::to_string_pretty(data)?;
        Ok(json)
    }
}

/// Plain text output formatting.
///
/// One `package -> module` line per package, suitable for piping.
pub mod text {
    use super::PackagesReport;
    use std::fmt::Write;

    /// Format a packages report as plain lines.
    #[must_use]
    pub fn format_packages(report: &PackagesReport) -> String {
        let mut out = String::new();
        for (package, module) in report.packages.iter() {
            let _ = writeln!(out, "{package} -> {module}");
        }
        for skipped in &report.skipped {
            let _ = writeln!(out, "# skipped {}: {}", skipped.package, skipped.reason);
        }
        out.truncate(out.trim_end().len());
        out
    }
}

/// Pretty (human-readable) output formatting.
pub mod pretty {
    use super::{Colorize, PackagesReport};
    use std::fmt::Write;

    /// Format a packages report as a colorized two-column table.
    #[must_use]
    pub fn format_packages(report: &PackagesReport) -> String {
        let width = report
            .packages
            .keys()
            .map(str::len)
            .max()
            .unwrap_or(0)
            .max("PACKAGE".len());

        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} {}",
            format!("{:<width$}", "PACKAGE").bold(),
            "MODULE".bold()
        );
        for (package, module) in report.packages.iter() {
            let _ = writeln!(out, "{:<width$} {}", package, module.cyan());
        }
        for skipped in &report.skipped {
            let _ = writeln!(
                out,
                "{} {}: {}",
                "skipped".yellow(),
                skipped.package,
                skipped.reason.dimmed()
            );
        }
        let _ = write!(
            out,
            "{}",
            format!(
                "{} packages from {} ({})",
                report.packages.len(),
                report.java_home.display(),
                report.source
            )
            .dimmed()
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::packages::SkippedEntry;
    use jrt_index::PackageMap;
    use std::path::PathBuf;

    fn report() -> PackagesReport {
        let mut packages = PackageMap::new();
        packages.insert("java.sql", "java.sql");
        packages.insert("java.lang", "java.base");
        PackagesReport {
            java_home: PathBuf::from("/opt/jdk"),
            source: "image".to_string(),
            packages,
            skipped: Vec::new(),
        }
    }

    #[test]
    fn test_json_keeps_listing_order() {
        let output = format_packages(&report(), OutputFormat::Json).unwrap();
        let sql = output.find("\"java.sql\"").unwrap();
        let lang = output.find("\"java.lang\"").unwrap();
        assert!(sql < lang);
        assert!(!output.contains("skipped"));
    }

    #[test]
    fn test_text_lines() {
        let output = format_packages(&report(), OutputFormat::Text).unwrap();
        assert_eq!(output, "java.sql -> java.sql\njava.lang -> java.base");
    }

    #[test]
    fn test_text_reports_skipped() {
        let mut report = report();
        report.skipped.push(SkippedEntry {
            package: "broken".to_string(),
            reason: "I/O error".to_string(),
        });
        let output = text::format_packages(&report);
        assert!(output.ends_with("# skipped broken: I/O error"));
    }

    #[test]
    fn test_pretty_table() {
        colored::control::set_override(false);
        let output = pretty::format_packages(&report());
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines[0], "PACKAGE   MODULE");
        assert_eq!(lines[1], "java.sql  java.sql");
        assert_eq!(lines[2], "java.lang java.base");
        assert!(lines[3].starts_with("2 packages from /opt/jdk"));
    }
}
