//! Configuration types for Stencil.
//!
//! This crate provides the configuration read from `.stencil/config.yaml`
//! and the environment helpers shared by the `stencil` binary.

pub mod detection;
pub mod env;
pub mod loader;
pub mod types;

pub use detection::{Detection, ToolInfo};
pub use env::{EnvError, Environment};
pub use loader::{ConfigError, ConfigLoader, CONFIG_FILE};
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_sensible_values() {
        let config = StencilConfig::default();

        assert_eq!(config.link.script_name, "updateRepoFromMaster.py");
        assert_eq!(config.link.template_remote, "template");
        assert_eq!(config.link.template_branch, "main");
        assert_eq!(config.link.merge_message, "Merge updates from template");
        assert_eq!(config.link.existing_template, ExistingTemplatePolicy::Overwrite);
        assert!(config.link.commit);

        assert_eq!(config.verify.build_tool, "make");
        assert_eq!(config.verify.source_extension, "c");
        assert_eq!(config.verify.object_extension, "o");
        assert_eq!(config.verify.dependency_extension, "d");
        assert_eq!(config.verify.debug_var, "DEBUG");
        assert_eq!(config.verify.debug_value, "1");
        assert!(config.verify.isolate);
        assert!(!config.verify.fail_fast);
        assert!(config.verify.timeout_secs.is_none());
        assert_eq!(config.verify.scenarios, ScenarioKind::ALL.to_vec());
    }

    #[test]
    fn test_config_serializes_to_yaml() {
        let yaml = serde_yaml::to_string(&StencilConfig::default()).unwrap();

        assert!(yaml.contains("link:"));
        assert!(yaml.contains("verify:"));
        assert!(yaml.contains("existing_template: overwrite"));
        assert!(yaml.contains("- phony-clean"));
    }

    #[test]
    fn test_partial_configs_merge_with_defaults() {
        let config: StencilConfig = serde_yaml::from_str("verify:\n  fail_fast: true\n").unwrap();

        assert!(config.verify.fail_fast);
        assert_eq!(config.verify.build_tool, "make");
        assert_eq!(config.link, LinkConfig::default());
    }
}
