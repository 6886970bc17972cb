//! Remote linker: derive the template URL, write the sync script, commit it.

use std::path::PathBuf;

use serde::Serialize;
use stencil_common_config::{ExistingTemplatePolicy, LinkConfig};
use stencil_common_log::spans;
use tracing::{info, warn, Instrument};

use crate::commit::CommitOutcome;
use crate::command::GitCli;
use crate::error::{GitError, GitResult};
use crate::remote::{parse_remote_listing, select_template_source};
use crate::script::{Registration, SyncScript};

/// Summary of one linker run.
#[derive(Debug, Clone, Serialize)]
pub struct LinkReport {
    /// Remote the template URL was taken from.
    pub source_remote: String,
    /// Derived template URL.
    pub template_url: String,
    /// How the script registers the template remote.
    pub registration: Registration,
    /// Path of the generated script.
    pub script_path: PathBuf,
    /// Whether the script content differs from what was on disk.
    pub script_changed: bool,
    /// Result of the stage-and-commit step.
    pub commit: CommitOutcome,
}

/// Runs the list → extract → write → stage → commit sequence.
#[derive(Debug, Clone)]
pub struct RemoteLinker {
    git: GitCli,
    config: LinkConfig,
}

impl RemoteLinker {
    /// Create a linker for the repository at `repo_dir`.
    pub fn new(repo_dir: impl Into<PathBuf>, config: LinkConfig) -> Self {
        Self::with_git(GitCli::new(repo_dir), config)
    }

    /// Create a linker around a preconfigured git handle.
    pub fn with_git(git: GitCli, config: LinkConfig) -> Self {
        Self { git, config }
    }

    /// Path the sync script is written to.
    pub fn script_path(&self) -> PathBuf {
        self.git.repo_dir().join(&self.config.script_name)
    }

    /// Run the linker.
    ///
    /// Nothing is written unless a valid template URL was extracted, and
    /// nothing is committed unless the script was written.
    pub async fn run(&self) -> GitResult<LinkReport> {
        let span = spans::link_span(&self.git.repo_dir().display().to_string());
        self.run_inner().instrument(span).await
    }

    async fn run_inner(&self) -> GitResult<LinkReport> {
        let listing = self.git.remote_listing().await?;
        let remotes = parse_remote_listing(&listing);
        let source = select_template_source(&remotes, &self.config.template_remote)?;

        let registration = match (source.template_remote_exists, self.config.existing_template) {
            (false, _) => Registration::Add,
            (true, ExistingTemplatePolicy::Overwrite) => {
                warn!(
                    remote = %self.config.template_remote,
                    "template remote already exists, script will replace its URL"
                );
                Registration::SetUrl
            }
            (true, ExistingTemplatePolicy::Error) => {
                return Err(GitError::TemplateRemoteExists {
                    name: self.config.template_remote.clone(),
                });
            }
        };

        info!(remote = %source.remote, url = %source.url, "derived template URL");

        let script = SyncScript {
            remote: self.config.template_remote.clone(),
            url: source.url.clone(),
            branch: self.config.template_branch.clone(),
            merge_message: self.config.merge_message.clone(),
            registration,
        };

        let script_path = self.script_path();
        let script_changed = script.write(&script_path).await?;

        let commit = if self.config.commit {
            self.git.stage_all().await?;
            self.git.commit_all(&self.config.commit_message).await?
        } else {
            CommitOutcome::Skipped
        };

        match &commit {
            CommitOutcome::Created { commit } => info!(%commit, "committed sync script"),
            CommitOutcome::NothingToCommit => info!("nothing to commit"),
            CommitOutcome::Skipped => info!("commit skipped"),
        }

        Ok(LinkReport {
            source_remote: source.remote,
            template_url: source.url,
            registration,
            script_path,
            script_changed,
            commit,
        })
    }
}
