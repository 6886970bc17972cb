//! Link command implementation.

use std::path::PathBuf;

use clap::{Parser, ValueHint};
use stencil_git::RemoteLinker;

use crate::cli::CommandContext;
use crate::error::CliError;
use crate::output::print_output;

/// Write the template sync script and commit it
#[derive(Debug, Parser)]
pub struct LinkCommand {
    /// Repository to link (defaults to the current directory)
    #[arg(long, value_hint = ValueHint::DirPath)]
    pub repo: Option<PathBuf>,

    /// Write the script without staging or committing it
    #[arg(long)]
    pub no_commit: bool,
}

impl LinkCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let mut config = ctx.config.link.clone();
        if self.no_commit {
            config.commit = false;
        }

        let report = RemoteLinker::new(&ctx.project_dir, config).run().await?;

        if !ctx.quiet {
            print_output(ctx, &report)?;
        }
        Ok(())
    }
}
