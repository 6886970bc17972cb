//! CLI error handling and formatting.

use std::error::Error as _;
use std::fmt::Write as _;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use stencil_build::VerifyError;
use stencil_common_config::{ConfigError, EnvError};
use stencil_git::GitError;
use thiserror::Error;

use crate::cli::OutputFormat;

/// CLI error type with context for the operator.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        hint: Option<String>,
    },

    #[error("{message}")]
    Io {
        message: String,
        #[source]
        source: io::Error,
        path: Option<PathBuf>,
    },

    #[error("{message}")]
    Validation {
        message: String,
        hint: Option<String>,
    },

    #[error("{message}")]
    Command {
        message: String,
        command: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("{message}")]
    Verification {
        message: String,
        failed: Vec<String>,
    },

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Get the error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config { .. } => "E001",
            Self::Io { .. } => "E002",
            Self::Validation { .. } => "E004",
            Self::Command { .. } => "E007",
            Self::Verification { .. } => "E011",
            Self::Other(_) => "E999",
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit_status())
    }

    /// Numeric exit status, as seen by the calling shell.
    pub fn exit_status(&self) -> u8 {
        match self {
            Self::Config { .. } => 2,
            Self::Io { .. } => 3,
            Self::Validation { .. } => 5,
            Self::Command { .. } => 8,
            Self::Verification { .. } => 11,
            Self::Other(_) => 1,
        }
    }

    /// Get hint for this error if available
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::Config { hint, .. } | Self::Validation { hint, .. } => hint.as_deref(),
            Self::Io { path: Some(_), .. } => Some("Check that the path exists and is writable"),
            Self::Verification { .. } => Some("Re-run with -v to see each build tool invocation"),
            _ => None,
        }
    }

    /// Create a config error with hint
    pub fn config_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
            hint: Some(hint.into()),
        }
    }

    /// Create an IO error with path
    pub fn io_with_path(
        message: impl Into<String>,
        source: io::Error,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self::Io {
            message: message.into(),
            source,
            path: Some(path.into()),
        }
    }

    /// Create a validation error with hint
    pub fn validation_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    /// Format the error for stderr.
    pub fn render(&self, format: OutputFormat, verbose: bool) -> String {
        match format {
            OutputFormat::Json => {
                let value = serde_json::json!({
                    "error": {
                        "code": self.code(),
                        "message": self.to_string(),
                        "hint": self.hint(),
                    }
                });
                value.to_string()
            }
            OutputFormat::Text => {
                let mut output = format!("error[{}]: {self}", self.code());

                if let Self::Verification { failed, .. } = self {
                    for line in failed {
                        let _ = write!(output, "\n  - {line}");
                    }
                }

                if verbose {
                    let mut source = self.source();
                    while let Some(err) = source {
                        let _ = write!(output, "\n  caused by: {err}");
                        source = err.source();
                    }
                }

                if let Some(hint) = self.hint() {
                    let _ = write!(output, "\n  hint: {hint}");
                }
                output
            }
        }
    }
}

// Conversion implementations
impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
            source: err,
            path: None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config {
            message: format!("Configuration error: {err}"),
            source: Some(Box::new(err)),
            hint: Some("Check .stencil/config.yaml or the file given with --config".to_string()),
        }
    }
}

impl From<EnvError> for CliError {
    fn from(err: EnvError) -> Self {
        Self::Config {
            message: format!("Configuration error: {err}"),
            source: Some(Box::new(err)),
            hint: None,
        }
    }
}

impl From<GitError> for CliError {
    fn from(err: GitError) -> Self {
        match err {
            GitError::NoFetchRemote | GitError::OnlyTemplateRemote { .. } => {
                Self::validation_with_hint(
                    err.to_string(),
                    "Add the repository's remote first, e.g. `git remote add origin <url>`",
                )
            }
            GitError::InvalidRemoteUrl { .. } => Self::Validation {
                message: err.to_string(),
                hint: None,
            },
            GitError::TemplateRemoteExists { .. } => Self::validation_with_hint(
                err.to_string(),
                "Remove the remote or set link.existing_template to overwrite",
            ),
            GitError::ScriptWrite { path, source } => Self::io_with_path(
                format!("failed to write sync script {}: {source}", path.display()),
                source,
                path,
            ),
            GitError::Spawn { ref args, .. } | GitError::CommandFailed { ref args, .. } => {
                Self::Command {
                    message: err.to_string(),
                    command: format!("git {args}"),
                    source: Some(Box::new(err)),
                }
            }
        }
    }
}

impl From<VerifyError> for CliError {
    fn from(err: VerifyError) -> Self {
        match err {
            VerifyError::ProjectNotFound { .. } => Self::validation_with_hint(
                err.to_string(),
                "Pass the project directory with --dir",
            ),
            VerifyError::Spawn { ref command, .. }
            | VerifyError::ProcessFailed { ref command, .. }
            | VerifyError::Timeout { ref command, .. } => Self::Command {
                message: err.to_string(),
                command: command.clone(),
                source: Some(Box::new(err)),
            },
            VerifyError::MissingArtifact { .. } | VerifyError::LingeringArtifact { .. } => {
                Self::Verification {
                    message: err.to_string(),
                    failed: Vec::new(),
                }
            }
            VerifyError::Workspace { path, source } => Self::io_with_path(
                format!("failed to prepare workspace from {}: {source}", path.display()),
                source,
                path,
            ),
            VerifyError::Io(source) => source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::config_with_hint("bad", "fix it").exit_status(), 2);
        assert_eq!(CliError::from(GitError::NoFetchRemote).exit_status(), 5);
        assert_eq!(
            CliError::Verification {
                message: "1 of 6 scenarios failed".into(),
                failed: vec![],
            }
            .exit_status(),
            11
        );
    }

    #[test]
    fn test_process_failures_map_to_command_errors() {
        let err = CliError::from(VerifyError::ProcessFailed {
            command: "make docs".into(),
            exit_code: 2,
            stderr: String::new(),
        });
        assert!(matches!(err, CliError::Command { ref command, .. } if command == "make docs"));
        assert_eq!(err.exit_status(), 8);
    }

    #[test]
    fn test_script_write_keeps_path() {
        let err = CliError::from(GitError::ScriptWrite {
            path: PathBuf::from("/ro/updateRepoFromMaster.py"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        });
        assert!(matches!(err, CliError::Io { path: Some(_), .. }));
        assert_eq!(err.exit_status(), 3);
    }

    #[test]
    fn test_render_text_with_hint() {
        let text = CliError::from(GitError::NoFetchRemote).render(OutputFormat::Text, false);
        assert!(text.starts_with("error[E004]: "));
        assert!(text.contains("hint: Add the repository's remote first"));
    }

    #[test]
    fn test_render_verification_lists_failures() {
        let err = CliError::Verification {
            message: "1 of 2 scenarios failed".into(),
            failed: vec!["documentation: `make docs` failed with exit code 2".into()],
        };
        let text = err.render(OutputFormat::Text, false);
        assert!(text.contains("\n  - documentation: `make docs` failed with exit code 2"));
    }

    #[test]
    fn test_render_json() {
        let json = CliError::from(GitError::NoFetchRemote).render(OutputFormat::Json, false);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["error"]["code"], "E004");
    }
}
