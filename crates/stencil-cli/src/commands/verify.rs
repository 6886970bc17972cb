//! Verify command implementation.

use std::path::PathBuf;

use clap::{Parser, ValueHint};
use stencil_build::{BuildVerifier, ScenarioStatus};
use stencil_common_config::ScenarioKind;

use crate::cli::CommandContext;
use crate::error::CliError;
use crate::output::print_output;

/// Run build verification scenarios
#[derive(Debug, Parser)]
pub struct VerifyCommand {
    /// Project directory containing the Makefile (defaults to the current directory)
    #[arg(long, value_hint = ValueHint::DirPath)]
    pub dir: Option<PathBuf>,

    /// Run only these scenarios, in the given order
    #[arg(long, value_name = "NAME")]
    pub scenario: Vec<ScenarioKind>,

    /// Build in the project directory instead of temporary copies
    #[arg(long)]
    pub no_isolate: bool,

    /// Stop after the first failing scenario
    #[arg(long)]
    pub fail_fast: bool,
}

impl VerifyCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let mut config = ctx.config.verify.clone();
        if !self.scenario.is_empty() {
            config.scenarios = self.scenario.clone();
        }
        if self.no_isolate {
            config.isolate = false;
        }
        if self.fail_fast {
            config.fail_fast = true;
        }

        let report = BuildVerifier::new(&ctx.project_dir, config).run().await?;

        if !ctx.quiet {
            print_output(ctx, &report)?;
        }

        if report.success() {
            return Ok(());
        }

        let failed = report
            .scenarios
            .iter()
            .filter(|s| s.status == ScenarioStatus::Failed)
            .map(|s| match &s.error {
                Some(error) => format!("{}: {error}", s.scenario),
                None => s.scenario.to_string(),
            })
            .collect();

        Err(CliError::Verification {
            message: format!(
                "{} of {} scenarios failed",
                report.failed(),
                report.scenarios.len()
            ),
            failed,
        })
    }
}
