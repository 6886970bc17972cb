//! External tool detection.

use serde::Serialize;
use std::process::{Command, Stdio};

/// Tool detection result.
#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: Option<String>,
    pub available: bool,
}

/// Environment detection utilities.
pub struct Detection;

impl Detection {
    /// Tools the linker and verifier shell out to.
    pub const REQUIRED_TOOLS: [&'static str; 3] = ["git", "make", "doxygen"];

    /// Detect every tool in [`Self::REQUIRED_TOOLS`], plus `extra` ones.
    pub fn scan(extra: &[&str]) -> Vec<ToolInfo> {
        Self::REQUIRED_TOOLS
            .iter()
            .chain(extra.iter())
            .map(|name| Self::detect_tool(name))
            .collect()
    }

    /// Detect a single tool by running `<tool> --version`.
    pub fn detect_tool(name: &str) -> ToolInfo {
        let mut tool_info = ToolInfo {
            name: name.to_string(),
            version: None,
            available: false,
        };

        let output = Command::new(name)
            .arg("--version")
            .stdin(Stdio::null())
            .output();

        if let Ok(output) = output {
            if output.status.success() {
                tool_info.available = true;
                let stdout = String::from_utf8_lossy(&output.stdout);
                tool_info.version = extract_version(&stdout);
            }
        }

        tool_info
    }
}

/// Extract the first version-looking word (`4.3`, `2.39.2`, `1.9.8-rc1`).
fn extract_version(output: &str) -> Option<String> {
    output
        .lines()
        .flat_map(str::split_whitespace)
        .map(|word| word.trim_end_matches(','))
        .find(|word| looks_like_version(word))
        .map(str::to_string)
}

fn looks_like_version(s: &str) -> bool {
    let starts_with_digit = s.chars().next().is_some_and(|c| c.is_ascii_digit());

    starts_with_digit
        && s.contains('.')
        && s.len() >= 3
        && s
            .chars()
            .all(|c| c.is_ascii_digit() || c == '.' || c == '-' || c.is_ascii_alphabetic())
}
