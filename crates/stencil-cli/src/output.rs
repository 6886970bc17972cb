//! Output formatting utilities for CLI commands.

use std::fmt::Write as _;

use serde::Serialize;
use stencil_build::{ScenarioStatus, VerifyReport};
use stencil_git::{CommitOutcome, LinkReport, Registration};

use crate::cli::{CommandContext, OutputFormat};
use crate::error::CliError;

/// Trait for types that can be formatted for output
pub trait FormattedOutput {
    fn format_text(&self) -> String;
    fn format_json(&self) -> Result<String, serde_json::Error>;
}

/// Print formatted output to stdout
pub fn print_output<T>(ctx: &CommandContext, value: &T) -> Result<(), CliError>
where
    T: FormattedOutput + Serialize,
{
    println!("{}", render_output(ctx.format, value)?);
    Ok(())
}

/// Render a value in the requested format.
pub fn render_output<T>(format: OutputFormat, value: &T) -> Result<String, CliError>
where
    T: FormattedOutput + Serialize,
{
    match format {
        OutputFormat::Text => Ok(value.format_text()),
        OutputFormat::Json => value.format_json().map_err(|e| {
            CliError::Other(anyhow::anyhow!("JSON serialization failed: {}", e))
        }),
    }
}

impl FormattedOutput for LinkReport {
    fn format_text(&self) -> String {
        let mut out = String::new();
        let action = match self.registration {
            Registration::Add => "registers",
            Registration::SetUrl => "re-points",
        };
        let _ = writeln!(
            out,
            "Template URL: {} (from remote '{}')",
            self.template_url, self.source_remote
        );
        let _ = writeln!(
            out,
            "{} {} the template remote{}",
            self.script_path.display(),
            action,
            if self.script_changed { "" } else { " (unchanged)" }
        );
        let commit = match &self.commit {
            CommitOutcome::Created { commit } => format!("✓ Committed {commit}"),
            CommitOutcome::NothingToCommit => "✓ Nothing to commit".to_string(),
            CommitOutcome::Skipped => "- Commit skipped".to_string(),
        };
        out.push_str(&commit);
        out
    }

    fn format_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl FormattedOutput for VerifyReport {
    fn format_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Verifying {}", self.project_dir.display());

        for scenario in &self.scenarios {
            let mark = match scenario.status {
                ScenarioStatus::Passed => "✓",
                ScenarioStatus::Failed => "✗",
                ScenarioStatus::Skipped => "-",
            };
            let _ = write!(out, "  {mark} {}", scenario.scenario);
            match (&scenario.status, &scenario.error) {
                (ScenarioStatus::Skipped, _) => out.push_str(" (skipped)"),
                (_, Some(error)) => {
                    let _ = write!(out, ": {error}");
                }
                _ => {
                    let _ = write!(out, " ({} ms)", scenario.duration_ms);
                }
            }
            out.push('\n');
        }

        let _ = write!(
            out,
            "{} passed, {} failed, {} skipped",
            self.passed(),
            self.failed(),
            self.skipped()
        );
        out
    }

    fn format_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
