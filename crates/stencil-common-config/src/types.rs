//! Configuration types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StencilConfig {
    /// Remote linker settings.
    pub link: LinkConfig,
    /// Build verifier settings.
    pub verify: VerifyConfig,
}

/// What to do when a remote with the template name already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExistingTemplatePolicy {
    /// Point the existing remote at the derived URL (`git remote set-url`).
    #[default]
    Overwrite,
    /// Refuse to generate a script.
    Error,
}

/// Remote linker configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// File name of the generated sync script, relative to the repository root.
    pub script_name: String,
    /// Name of the template remote used by the script.
    pub template_remote: String,
    /// Branch of the template remote to merge.
    pub template_branch: String,
    /// Message of the merge commit the script creates.
    pub merge_message: String,
    /// Message of the commit recording the generated script.
    pub commit_message: String,
    /// Policy for a pre-existing template remote.
    pub existing_template: ExistingTemplatePolicy,
    /// Stage and commit after writing the script.
    pub commit: bool,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            script_name: "updateRepoFromMaster.py".to_string(),
            template_remote: "template".to_string(),
            template_branch: "main".to_string(),
            merge_message: "Merge updates from template".to_string(),
            commit_message: ".".to_string(),
            existing_template: ExistingTemplatePolicy::default(),
            commit: true,
        }
    }
}

/// One verifier scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScenarioKind {
    /// Every source file gets an object file.
    ObjectGeneration,
    /// Every source file gets a dependency file.
    DependencyGeneration,
    /// The clean target removes every object file.
    PhonyClean,
    /// The default build succeeds with the debug flag set.
    ConditionalCompilation,
    /// The default build succeeds with its included configuration.
    IncludeDirectives,
    /// The docs target succeeds.
    Documentation,
}

impl ScenarioKind {
    /// All scenarios in run order.
    pub const ALL: [ScenarioKind; 6] = [
        ScenarioKind::ObjectGeneration,
        ScenarioKind::DependencyGeneration,
        ScenarioKind::PhonyClean,
        ScenarioKind::ConditionalCompilation,
        ScenarioKind::IncludeDirectives,
        ScenarioKind::Documentation,
    ];

    /// Kebab-case name, as used in config and on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ObjectGeneration => "object-generation",
            Self::DependencyGeneration => "dependency-generation",
            Self::PhonyClean => "phony-clean",
            Self::ConditionalCompilation => "conditional-compilation",
            Self::IncludeDirectives => "include-directives",
            Self::Documentation => "documentation",
        }
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScenarioKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|k| k.name()).collect();
                format!("unknown scenario '{s}' (expected one of: {})", known.join(", "))
            })
    }
}

/// Build verifier configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyConfig {
    /// Build tool executable.
    pub build_tool: String,
    /// Extension of source files, without the dot.
    pub source_extension: String,
    /// Extension of object files, without the dot.
    pub object_extension: String,
    /// Extension of dependency files, without the dot.
    pub dependency_extension: String,
    /// Phony target that removes build products.
    pub clean_target: String,
    /// Target that generates documentation.
    pub docs_target: String,
    /// Environment variable that switches the build into debug mode.
    pub debug_var: String,
    /// Value assigned to `debug_var`.
    pub debug_value: String,
    /// Run each scenario in a temporary copy of the project.
    pub isolate: bool,
    /// Stop after the first failing scenario.
    pub fail_fast: bool,
    /// Per-invocation timeout in seconds. No timeout when unset.
    pub timeout_secs: Option<u64>,
    /// Scenarios to run, in order.
    pub scenarios: Vec<ScenarioKind>,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            build_tool: "make".to_string(),
            source_extension: "c".to_string(),
            object_extension: "o".to_string(),
            dependency_extension: "d".to_string(),
            clean_target: "clean".to_string(),
            docs_target: "docs".to_string(),
            debug_var: "DEBUG".to_string(),
            debug_value: "1".to_string(),
            isolate: true,
            fail_fast: false,
            timeout_secs: None,
            scenarios: ScenarioKind::ALL.to_vec(),
        }
    }
}
