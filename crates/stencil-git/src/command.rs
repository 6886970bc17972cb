//! Git command wrappers using [`tokio::process::Command`].
//!
//! Every call shells out to the system `git` binary inside the repository
//! directory. Output is forced to the C locale so that messages such as
//! "nothing to commit" can be recognized.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, instrument};

use crate::commit::CommitOutcome;
use crate::error::{GitError, GitResult};

/// Captured result of one git invocation.
#[derive(Debug, Clone)]
pub struct GitOutput {
    /// Whether git exited with status zero.
    pub success: bool,
    /// Human-readable exit status.
    pub status: String,
    /// Captured stdout.
    pub stdout: String,
    /// Captured stderr.
    pub stderr: String,
}

/// Handle for running git inside one repository directory.
#[derive(Debug, Clone)]
pub struct GitCli {
    repo_dir: PathBuf,
    env_vars: Vec<(String, String)>,
}

impl GitCli {
    /// Create a handle for the repository at `repo_dir`.
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            repo_dir: repo_dir.into(),
            env_vars: Vec::new(),
        }
    }

    /// Add an environment variable passed to every git invocation.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.push((key.into(), value.into()));
        self
    }

    /// Repository directory.
    pub fn repo_dir(&self) -> &Path {
        &self.repo_dir
    }

    /// Run git with `args` and capture its output without checking the status.
    #[instrument(skip(self), fields(repo = %self.repo_dir.display()))]
    pub async fn output(&self, args: &[&str]) -> GitResult<GitOutput> {
        let mut cmd = Command::new("git");
        cmd.args(args)
            .current_dir(&self.repo_dir)
            .env("GIT_TERMINAL_PROMPT", "0")
            .env("LC_ALL", "C");

        for (k, v) in &self.env_vars {
            cmd.env(k, v);
        }

        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let output = cmd.output().await.map_err(|source| GitError::Spawn {
            args: args.join(" "),
            source,
        })?;

        let result = GitOutput {
            success: output.status.success(),
            status: output.status.to_string(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        debug!(success = result.success, status = %result.status, "git finished");
        Ok(result)
    }

    /// Run git with `args`, turning a non-zero exit into [`GitError::CommandFailed`].
    pub async fn run(&self, args: &[&str]) -> GitResult<GitOutput> {
        let output = self.output(args).await?;

        if !output.success {
            return Err(GitError::CommandFailed {
                args: args.join(" "),
                status: output.status,
                stderr: output.stderr.trim().to_string(),
            });
        }

        Ok(output)
    }

    /// Raw `git remote -v` output.
    pub async fn remote_listing(&self) -> GitResult<String> {
        Ok(self.run(&["remote", "-v"]).await?.stdout)
    }

    /// Stage every working-tree change, including new and deleted files.
    pub async fn stage_all(&self) -> GitResult<()> {
        self.run(&["add", "--all"]).await?;
        Ok(())
    }

    /// Commit all tracked changes with `message`.
    ///
    /// A clean tree is reported as [`CommitOutcome::NothingToCommit`].
    pub async fn commit_all(&self, message: &str) -> GitResult<CommitOutcome> {
        let output = self.output(&["commit", "-a", "-m", message]).await?;

        if !output.success {
            if CommitOutcome::is_nothing_to_commit(&output.stdout, &output.stderr) {
                debug!("working tree clean, no commit created");
                return Ok(CommitOutcome::NothingToCommit);
            }
            return Err(GitError::CommandFailed {
                args: format!("commit -a -m {message}"),
                status: output.status,
                stderr: first_non_empty(&output.stderr, &output.stdout),
            });
        }

        let head = self.run(&["rev-parse", "--short", "HEAD"]).await?;
        Ok(CommitOutcome::Created {
            commit: head.stdout.trim().to_string(),
        })
    }
}

fn first_non_empty(primary: &str, fallback: &str) -> String {
    let primary = primary.trim();
    if primary.is_empty() {
        fallback.trim().to_string()
    } else {
        primary.to_string()
    }
}
