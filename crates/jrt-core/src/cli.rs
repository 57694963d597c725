//! CLI-specific types.
//!
//! Strong types for the values the command-line front end exchanges with
//! the library crates.
//!
//! # Examples
//!
//! ```
//! use jrt_core::cli::{ExitCode, OutputFormat};
//!
//! let format: OutputFormat = "json".parse().unwrap();
//! assert_eq!(format, OutputFormat::Json);
//!
//! assert!(ExitCode::SUCCESS.is_success());
//! assert_eq!(ExitCode::NOT_AN_INSTALLATION.as_i32(), 2);
//! ```

use std::fmt;
use std::str::FromStr;

/// CLI output format.
///
/// All formats carry the same information with different presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// JSON output for machine parsing
    Json,
    /// Plain `package -> module` lines for scripts
    Text,
    /// Colored, aligned output for human reading
    #[default]
    Pretty,
}

impl OutputFormat {
    /// Returns the string representation of the format.
    ///
    /// # Examples
    ///
    /// ```
    /// use jrt_core::cli::OutputFormat;
    ///
    /// assert_eq!(OutputFormat::Json.as_str(), "json");
    /// assert_eq!(OutputFormat::Text.as_str(), "text");
    /// assert_eq!(OutputFormat::Pretty.as_str(), "pretty");
    /// ```
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "text",
            Self::Pretty => "pretty",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" => Ok(Self::Text),
            "pretty" => Ok(Self::Pretty),
            _ => Err(crate::Error::ConfigError {
                message: format!(
                    "invalid output format: '{s}' (expected: json, text, or pretty)"
                ),
            }),
        }
    }
}

/// CLI exit code with semantic meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Successful execution (exit code 0).
    pub const SUCCESS: Self = Self(0);

    /// General error (exit code 1).
    pub const ERROR: Self = Self(1);

    /// The given root is not a valid installation (exit code 2).
    pub const NOT_AN_INSTALLATION: Self = Self(2);

    /// Broken or incompatible environment (exit code 3).
    pub const ENVIRONMENT_ERROR: Self = Self(3);

    /// The index was built but some packages were skipped (exit code 4).
    pub const PARTIAL: Self = Self(4);

    /// Creates an exit code from an integer value.
    #[must_use]
    pub const fn from_i32(code: i32) -> Self {
        Self(code)
    }

    /// Returns the exit code as an integer.
    #[must_use]
    pub const fn as_i32(&self) -> i32 {
        self.0
    }

    /// Checks if the exit code represents success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.0 == 0
    }
}

impl Default for ExitCode {
    fn default() -> Self {
        Self::SUCCESS
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.0
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_round_trip() {
        for format in [OutputFormat::Json, OutputFormat::Text, OutputFormat::Pretty] {
            assert_eq!(format.as_str().parse::<OutputFormat>().unwrap(), format);
        }
    }

    #[test]
    fn test_output_format_case_insensitive() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
    }

    #[test]
    fn test_output_format_invalid() {
        let err = "yaml".parse::<OutputFormat>().unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Pretty);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(ExitCode::SUCCESS.as_i32(), 0);
        assert!(!ExitCode::ERROR.is_success());
        assert!(!ExitCode::PARTIAL.is_success());
        assert_eq!(i32::from(ExitCode::ENVIRONMENT_ERROR), 3);
        assert_eq!(ExitCode::from_i32(2), ExitCode::NOT_AN_INSTALLATION);
        assert_eq!(ExitCode::default(), ExitCode::SUCCESS);
        assert_eq!(ExitCode::PARTIAL.to_string(), "4");
    }
}
