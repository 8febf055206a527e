//! Access to the Go toolchain's persisted environment.
//!
//! The settings written here live in Go's own env file (see `go env GOENV`),
//! outside anything goenv-switch manages. [`Toolchain`] is the seam that lets
//! tests record calls instead of launching `go`.

use std::path::PathBuf;
use std::process::{Command, Output};
use tracing::debug;

use crate::error::{SwitchError, SwitchResult};

/// Binary used when no override is configured
pub const DEFAULT_GO_BIN: &str = "go";

pub trait Toolchain {
    /// Persist `key=value`. An empty value is written as an explicit empty setting.
    fn set(&self, key: &str, value: &str) -> SwitchResult<()>;

    /// Read the current value of `key`, without trailing whitespace.
    fn get(&self, key: &str) -> SwitchResult<String>;
}

/// [`Toolchain`] backed by `go env`
#[derive(Debug, Clone)]
pub struct GoToolchain {
    program: PathBuf,
}

impl GoToolchain {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn run(&self, args: &[&str]) -> SwitchResult<Output> {
        let command_line = self.describe(args);
        debug!(command = %command_line, "running toolchain");

        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|e| SwitchError::ExternalTool {
                command: command_line.clone(),
                output: e.to_string(),
            })?;

        if !output.status.success() {
            let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
            let combined = combined.trim();
            return Err(SwitchError::ExternalTool {
                command: command_line,
                output: if combined.is_empty() {
                    output.status.to_string()
                } else {
                    combined.to_string()
                },
            });
        }

        Ok(output)
    }

    fn describe(&self, args: &[&str]) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(args.iter().map(|a| a.to_string()));
        parts.join(" ")
    }
}

impl Default for GoToolchain {
    fn default() -> Self {
        Self::new(DEFAULT_GO_BIN)
    }
}

impl Toolchain for GoToolchain {
    fn set(&self, key: &str, value: &str) -> SwitchResult<()> {
        let assignment = format!("{}={}", key, value);
        self.run(&["env", "-w", &assignment])?;
        Ok(())
    }

    fn get(&self, key: &str) -> SwitchResult<String> {
        let output = self.run(&["env", key])?;
        Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
    }
}
