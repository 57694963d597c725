//! Installation layout configuration.
//!
//! The relative locations of the provider archives differ between
//! generations of runtime distributions, so they are configuration rather
//! than constants.
//!
//! # Examples
//!
//! ```
//! use jrt_core::{Generation, InstallLayout};
//! use std::path::Path;
//!
//! // Use default configuration
//! let layout = InstallLayout::default();
//! assert_eq!(layout.module_provider_archive, Path::new("lib/jrt-fs.jar"));
//!
//! // Early access builds kept the helper archive at the root
//! let early = InstallLayout::for_generation(Generation::Early);
//! assert_eq!(early.module_provider_archive, Path::new("jrt-fs.jar"));
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Generation of a runtime distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Generation {
    /// Released distributions: helper archive under `lib/`.
    #[default]
    Modern,
    /// Early access builds: helper archive directly under the root.
    Early,
}

impl Generation {
    /// Returns the string representation of the generation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Modern => "modern",
            Self::Early => "early",
        }
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Generation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "modern" => Ok(Self::Modern),
            "early" => Ok(Self::Early),
            _ => Err(Error::ConfigError {
                message: format!("invalid generation: '{s}' (expected: modern or early)"),
            }),
        }
    }
}

/// Relative locations inside an installation root.
///
/// All paths are relative to the installation root, except `packages_dir`
/// which is relative to the root of the opened filesystem.
///
/// # Examples
///
/// ```
/// use jrt_core::InstallLayout;
///
/// let layout = InstallLayout::from_toml_str(r#"
///     module_provider_archive = "jrt-fs.jar"
/// "#)?;
///
/// // Unspecified fields keep their defaults
/// assert_eq!(layout.symbol_archive.to_str(), Some("lib/ct.sym"));
/// assert_eq!(layout.packages_dir, "packages");
/// # Ok::<(), jrt_core::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallLayout {
    /// Helper archive providing the module image filesystem.
    ///
    /// Default: `lib/jrt-fs.jar`
    pub module_provider_archive: PathBuf,

    /// Legacy multi-release symbol archive.
    ///
    /// Default: `lib/ct.sym`
    pub symbol_archive: PathBuf,

    /// Directory holding one child per package inside an opened filesystem.
    ///
    /// Default: `packages`
    pub packages_dir: String,
}

impl InstallLayout {
    /// Returns the preset layout for a distribution generation.
    #[must_use]
    pub fn for_generation(generation: Generation) -> Self {
        let module_provider_archive = match generation {
            Generation::Modern => PathBuf::from("lib/jrt-fs.jar"),
            Generation::Early => PathBuf::from("jrt-fs.jar"),
        };
        Self {
            module_provider_archive,
            symbol_archive: PathBuf::from("lib/ct.sym"),
            packages_dir: "packages".to_string(),
        }
    }

    /// Parses a layout from TOML. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the TOML is malformed or the layout
    /// is inconsistent.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let layout: Self = toml::from_str(content).map_err(|e| Error::ConfigError {
            message: e.to_string(),
        })?;
        layout.validate()?;
        Ok(layout)
    }

    /// Loads a layout from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read and
    /// [`Error::ConfigError`] if it cannot be parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::io(format!("reading layout {}", path.display()), e))?;
        let layout = Self::from_toml_str(&content)?;
        tracing::debug!("Loaded install layout from {}", path.display());
        Ok(layout)
    }

    /// Checks that every configured path is relative and non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] describing the first offending field.
    pub fn validate(&self) -> Result<()> {
        for (field, path) in [
            ("module_provider_archive", &self.module_provider_archive),
            ("symbol_archive", &self.symbol_archive),
        ] {
            if path.as_os_str().is_empty() || path.is_absolute() {
                return Err(Error::ConfigError {
                    message: format!("{field} must be a non-empty relative path"),
                });
            }
        }
        if self.packages_dir.is_empty() || self.packages_dir.starts_with('/') {
            return Err(Error::ConfigError {
                message: "packages_dir must be a non-empty relative path".to_string(),
            });
        }
        Ok(())
    }

    /// Resolves the module provider archive below an installation root.
    #[must_use]
    pub fn module_provider_archive_in(&self, install_root: &Path) -> PathBuf {
        install_root.join(&self.module_provider_archive)
    }

    /// Resolves the symbol archive below an installation root.
    #[must_use]
    pub fn symbol_archive_in(&self, install_root: &Path) -> PathBuf {
        install_root.join(&self.symbol_archive)
    }
}

impl Default for InstallLayout {
    fn default() -> Self {
        Self::for_generation(Generation::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_modern() {
        assert_eq!(
            InstallLayout::default(),
            InstallLayout::for_generation(Generation::Modern)
        );
    }

    #[test]
    fn test_generation_parsing() {
        assert_eq!("modern".parse::<Generation>().unwrap(), Generation::Modern);
        assert_eq!("EARLY".parse::<Generation>().unwrap(), Generation::Early);
        assert!("legacy".parse::<Generation>().unwrap_err().is_config_error());
    }

    #[test]
    fn test_resolve_archives() {
        let layout = InstallLayout::default();
        let root = Path::new("/opt/jdk");
        assert_eq!(
            layout.module_provider_archive_in(root),
            Path::new("/opt/jdk/lib/jrt-fs.jar")
        );
        assert_eq!(
            layout.symbol_archive_in(root),
            Path::new("/opt/jdk/lib/ct.sym")
        );
    }

    #[test]
    fn test_from_toml_full() {
        let layout = InstallLayout::from_toml_str(
            r#"
            module_provider_archive = "lib/jrt-fs.jar"
            symbol_archive = "lib/ct.sym"
            packages_dir = "pkgs"
            "#,
        )
        .unwrap();
        assert_eq!(layout.packages_dir, "pkgs");
    }

    #[test]
    fn test_from_toml_rejects_unknown_types() {
        let err = InstallLayout::from_toml_str("packages_dir = 42").unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_validate_rejects_empty_packages_dir() {
        let err = InstallLayout::from_toml_str(r#"packages_dir = """#).unwrap_err();
        assert!(err.is_config_error());
    }

    #[cfg(unix)]
    #[test]
    fn test_validate_rejects_absolute_archive() {
        let err =
            InstallLayout::from_toml_str(r#"symbol_archive = "/etc/ct.sym""#).unwrap_err();
        assert!(err.to_string().contains("symbol_archive"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("layout.toml");
        std::fs::write(&path, "module_provider_archive = \"jrt-fs.jar\"\n").unwrap();

        let layout = InstallLayout::load(&path).unwrap();
        assert_eq!(
            layout,
            InstallLayout::for_generation(Generation::Early)
        );
    }

    #[test]
    fn test_load_missing_file() {
        let err = InstallLayout::load("/definitely/not/here.toml").unwrap_err();
        assert!(err.is_io_error());
    }
}
