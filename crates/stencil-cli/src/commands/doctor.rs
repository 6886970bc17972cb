//! Doctor command implementation.

use std::fmt::Write as _;

use clap::Parser;
use serde::Serialize;
use stencil_common_config::{Detection, ToolInfo};

use crate::cli::CommandContext;
use crate::error::CliError;
use crate::output::{print_output, FormattedOutput};

/// Check that the external tools are installed
#[derive(Debug, Parser)]
pub struct DoctorCommand {}

/// Availability of every external tool.
#[derive(Debug, Serialize)]
pub struct DoctorReport {
    pub tools: Vec<ToolInfo>,
}

impl DoctorReport {
    /// Whether every tool was found.
    pub fn all_available(&self) -> bool {
        self.tools.iter().all(|t| t.available)
    }
}

impl FormattedOutput for DoctorReport {
    fn format_text(&self) -> String {
        let mut out = String::from("Environment:\n");
        for tool in &self.tools {
            match (tool.available, &tool.version) {
                (true, Some(version)) => {
                    let _ = writeln!(out, "  ✓ {} {}", tool.name, version);
                }
                (true, None) => {
                    let _ = writeln!(out, "  ✓ {} installed", tool.name);
                }
                (false, _) => {
                    let _ = writeln!(out, "  ✗ {} not found", tool.name);
                }
            }
        }
        out.push_str(if self.all_available() {
            "Overall: all tools available"
        } else {
            "Overall: some tools are missing"
        });
        out
    }

    fn format_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl DoctorCommand {
    pub fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let build_tool = ctx.config.verify.build_tool.as_str();
        let extra: Vec<&str> = if Detection::REQUIRED_TOOLS.contains(&build_tool) {
            Vec::new()
        } else {
            vec![build_tool]
        };

        let report = DoctorReport {
            tools: Detection::scan(&extra),
        };

        // missing tools are reported, not treated as a failure
        print_output(ctx, &report)
    }
}
