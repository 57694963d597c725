//! Shell completion generation command.
//!
//! Generates shell completion scripts for bash, zsh, fish, and `PowerShell`.

use anyhow::Result;
use clap::Command;
use clap_complete::{Shell, generate};
use jrt_core::cli::ExitCode;
use std::io::{self, Write};
use tracing::info;

/// Writes the completion script for `shell` to `out`.
///
/// # Examples
///
/// ```
/// use clap::Command;
/// use clap_complete::Shell;
/// use jrt_index_cli::commands::completions;
///
/// let mut cmd = Command::new("jrt-index");
/// let mut script = Vec::new();
/// completions::generate_completions(Shell::Bash, &mut cmd, &mut script);
/// assert!(!script.is_empty());
/// ```
pub fn generate_completions(shell: Shell, cmd: &mut Command, out: &mut dyn Write) {
    info!("Generating {} completions", shell);
    let name = cmd.get_name().to_string();
    generate(shell, cmd, name, out);
}

/// Runs the completions command, printing the script to stdout.
///
/// # Returns
///
/// Returns `Ok(ExitCode::SUCCESS)` on successful generation.
pub fn run(shell: Shell, cmd: &mut Command) -> Result<ExitCode> {
    generate_completions(shell, cmd, &mut io::stdout());
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(shell: Shell) -> String {
        let mut cmd = Command::new("test-cli").subcommand(Command::new("packages"));
        let mut out = Vec::new();
        generate_completions(shell, &mut cmd, &mut out);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_generate_completions_bash() {
        assert!(script(Shell::Bash).contains("test-cli"));
    }

    #[test]
    fn test_generate_completions_zsh() {
        assert!(script(Shell::Zsh).contains("packages"));
    }

    #[test]
    fn test_generate_completions_fish() {
        assert!(!script(Shell::Fish).is_empty());
    }

    #[test]
    fn test_generate_completions_powershell() {
        assert!(!script(Shell::PowerShell).is_empty());
    }

    #[test]
    fn test_run_bash() {
        let mut cmd = Command::new("test-cli");
        assert_eq!(run(Shell::Bash, &mut cmd).unwrap(), ExitCode::SUCCESS);
    }
}
