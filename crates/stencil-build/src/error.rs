//! Build verifier error types.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

/// Kind of generated file a scenario checks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    /// Compiled object file.
    Object,
    /// Dependency-tracking file.
    Dependency,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Object => f.write_str("object file"),
            Self::Dependency => f.write_str("dependency file"),
        }
    }
}

/// Errors raised while verifying a build.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// The project directory does not exist.
    #[error("project directory not found: {}", path.display())]
    ProjectNotFound {
        /// Directory that was looked up.
        path: PathBuf,
    },

    /// The build tool could not be started.
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        /// Command line that was attempted.
        command: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The build tool exited with a non-zero status.
    #[error("`{command}` failed with exit code {exit_code}{}", stderr_suffix(stderr))]
    ProcessFailed {
        /// Command line that failed.
        command: String,
        /// Exit code, or -1 when killed by a signal.
        exit_code: i32,
        /// Captured stderr.
        stderr: String,
    },

    /// The build tool did not finish in time.
    #[error("`{command}` timed out after {timeout:?}")]
    Timeout {
        /// Command line that timed out.
        command: String,
        /// Configured limit.
        timeout: Duration,
    },

    /// Expected files were not generated.
    #[error("{kind} not created: {}", files.join(", "))]
    MissingArtifact {
        /// Kind of the missing files.
        kind: ArtifactKind,
        /// Names of the missing files.
        files: Vec<String>,
    },

    /// Files that should have been removed are still present.
    #[error("object files not cleaned up: {}", files.join(", "))]
    LingeringArtifact {
        /// Names of the remaining files.
        files: Vec<String>,
    },

    /// A scoped workspace could not be prepared.
    #[error("failed to prepare workspace from {}: {source}", path.display())]
    Workspace {
        /// Path being copied when the failure happened.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for verifier operations.
pub type VerifyResult<T> = Result<T, VerifyError>;

impl VerifyError {
    /// Check if this error is a failed filesystem assertion.
    pub fn is_assertion_failure(&self) -> bool {
        matches!(self, Self::MissingArtifact { .. } | Self::LingeringArtifact { .. })
    }

    /// Check if this error came from the external build tool.
    pub fn is_process_failure(&self) -> bool {
        matches!(
            self,
            Self::Spawn { .. } | Self::ProcessFailed { .. } | Self::Timeout { .. }
        )
    }
}

fn stderr_suffix(stderr: &str) -> String {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {stderr}")
    }
}
