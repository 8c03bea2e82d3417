//! External process invocation

use std::process::Command;

use crate::error::{HelmError, Result};

/// Runs a command line and returns its combined output
pub trait CommandRunner {
    /// Run `command`, returning stdout and stderr combined
    ///
    /// A non-zero exit must produce [`HelmError::Process`] carrying the
    /// combined output.
    fn run(&self, command: &str) -> Result<String>;
}

/// Split a command line into argv on whitespace
///
/// No shell interpretation and no quoting: arguments cannot contain spaces.
pub fn split_command(command: &str) -> Vec<&str> {
    command.split_whitespace().collect()
}

/// Runs commands as child processes of the current process
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, command: &str) -> Result<String> {
        let argv = split_command(command);
        let (program, args) = argv.split_first().ok_or(HelmError::EmptyCommand)?;

        tracing::info!(command, "running command");
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| HelmError::Spawn {
                program: program.to_string(),
                source,
            })?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        tracing::info!(command, status = %output.status, output = %combined, "command finished");

        if !output.status.success() {
            return Err(HelmError::Process {
                command: command.to_string(),
                status: output.status.to_string(),
                output: combined,
            });
        }

        Ok(combined)
    }
}
