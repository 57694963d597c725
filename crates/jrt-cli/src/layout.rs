//! Install layout resolution.
//!
//! The layout comes from, in order of precedence:
//!
//! 1. `--layout <FILE>`
//! 2. `--generation <modern|early>`
//! 3. `<config dir>/jrt-index/layout.toml` if it exists
//! 4. the modern preset

use anyhow::{Context, Result};
use jrt_core::{Generation, InstallLayout};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory below the platform config directory holding `layout.toml`.
pub const CONFIG_DIR_NAME: &str = "jrt-index";

/// File name of the user layout.
pub const LAYOUT_FILE_NAME: &str = "layout.toml";

/// Returns the path of the user layout file, if a config directory exists.
///
/// # Examples
///
/// ```
/// use jrt_index_cli::layout::default_layout_path;
///
/// if let Some(path) = default_layout_path() {
///     assert!(path.ends_with("jrt-index/layout.toml"));
/// }
/// ```
#[must_use]
pub fn default_layout_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(LAYOUT_FILE_NAME))
}

/// Resolves the install layout from CLI arguments and the user config.
pub fn resolve_layout(
    explicit: Option<&Path>,
    generation: Option<Generation>,
) -> Result<InstallLayout> {
    resolve_layout_with(explicit, generation, default_layout_path().as_deref())
}

/// Same as [`resolve_layout`] with an explicit user layout location.
pub fn resolve_layout_with(
    explicit: Option<&Path>,
    generation: Option<Generation>,
    user_layout: Option<&Path>,
) -> Result<InstallLayout> {
    if let Some(path) = explicit {
        debug!("Using layout from {}", path.display());
        return InstallLayout::load(path)
            .with_context(|| format!("failed to load layout from {}", path.display()));
    }

    if let Some(generation) = generation {
        debug!("Using {} layout preset", generation);
        return Ok(InstallLayout::for_generation(generation));
    }

    match user_layout {
        Some(path) if path.is_file() => {
            debug!("Using user layout from {}", path.display());
            InstallLayout::load(path)
                .with_context(|| format!("failed to load layout from {}", path.display()))
        }
        _ => Ok(InstallLayout::default()),
    }
}
