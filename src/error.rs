//! Error taxonomy for the library layer.
//!
//! Every operation in `config`, `toolchain` and `profiles` returns
//! [`SwitchError`]. The command layer wraps these in `anyhow` and adds hints.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type SwitchResult<T> = Result<T, SwitchError>;

#[derive(Debug, Error)]
pub enum SwitchError {
    #[error("failed to read config file {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to write config file {}: {source}", .path.display())]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("profile '{0}' does not exist")]
    ProfileNotFound(String),

    #[error("no profiles are configured")]
    NoProfilesConfigured,

    #[error("invalid selection: '{0}'")]
    InvalidSelection(String),

    #[error("no selection was read: {0}")]
    InputAborted(String),

    /// `go` could not be launched or exited non-zero.
    #[error("`{command}` failed: {output}")]
    ExternalTool { command: String, output: String },
}

impl SwitchError {
    pub(crate) fn config_write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::ConfigWrite {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_profile() {
        let err = SwitchError::ProfileNotFound("company".to_string());
        assert_eq!(err.to_string(), "profile 'company' does not exist");

        let err = SwitchError::InvalidSelection("99".to_string());
        assert_eq!(err.to_string(), "invalid selection: '99'");
    }

    #[test]
    fn test_external_tool_message_carries_output() {
        let err = SwitchError::ExternalTool {
            command: "go env -w GOPROXY=direct".to_string(),
            output: "go: permission denied".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("go env -w GOPROXY=direct"));
        assert!(msg.contains("permission denied"));
    }

    #[test]
    fn test_config_read_message_names_path() {
        let err = SwitchError::ConfigRead {
            path: PathBuf::from("/tmp/missing.yaml"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.to_string().contains("/tmp/missing.yaml"));
    }
}
