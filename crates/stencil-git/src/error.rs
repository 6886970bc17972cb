//! Git error types.

use std::path::PathBuf;
use thiserror::Error;

/// Git operation error.
#[derive(Debug, Error)]
pub enum GitError {
    /// The git binary could not be started.
    #[error("failed to run `git {args}`: {source}")]
    Spawn {
        args: String,
        #[source]
        source: std::io::Error,
    },

    /// A git invocation exited unsuccessfully.
    #[error("`git {args}` failed ({status}): {stderr}")]
    CommandFailed {
        args: String,
        status: String,
        stderr: String,
    },

    /// `git remote -v` listed no fetch entry at all.
    #[error("no remote with a fetch URL found in `git remote -v` output")]
    NoFetchRemote,

    /// The only fetch entries belong to the template remote itself.
    #[error("no remote other than '{name}' has a fetch URL")]
    OnlyTemplateRemote { name: String },

    /// The fetch URL of the chosen remote is not a URL.
    #[error("remote '{remote}' has an invalid fetch URL '{url}': {reason}")]
    InvalidRemoteUrl {
        remote: String,
        url: String,
        reason: String,
    },

    /// A remote with the template name is configured and the policy forbids replacing it.
    #[error("a remote named '{name}' already exists")]
    TemplateRemoteExists { name: String },

    /// The sync script could not be written.
    #[error("failed to write sync script {}: {source}", path.display())]
    ScriptWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for Git operations.
pub type GitResult<T> = Result<T, GitError>;

impl GitError {
    /// Check if this error means no template URL could be derived.
    pub fn is_extraction_failure(&self) -> bool {
        matches!(
            self,
            Self::NoFetchRemote | Self::OnlyTemplateRemote { .. } | Self::InvalidRemoteUrl { .. }
        )
    }

    /// Check if this error came from a git process.
    pub fn is_process_failure(&self) -> bool {
        matches!(self, Self::Spawn { .. } | Self::CommandFailed { .. })
    }
}
