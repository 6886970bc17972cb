//! Git integration for Stencil.
//!
//! This crate drives the system `git` binary to link a repository to its
//! template: it reads `git remote -v`, derives the template remote URL,
//! writes a sync script and commits it.

#![warn(missing_docs)]

pub mod command;
pub mod commit;
pub mod error;
pub mod link;
pub mod remote;
pub mod script;

pub use command::{GitCli, GitOutput};
pub use commit::CommitOutcome;
pub use error::{GitError, GitResult};
pub use link::{LinkReport, RemoteLinker};
pub use remote::{parse_remote_listing, select_template_source, Direction, RemoteDescriptor, TemplateSource};
pub use script::{Registration, SyncScript};
