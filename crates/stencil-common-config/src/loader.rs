//! Configuration file loading and parsing.

use crate::types::StencilConfig;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Location of the config file relative to the project directory.
pub const CONFIG_FILE: &str = ".stencil/config.yaml";

static ENV_VAR_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{([^}:]+)(?::-([^}]*))?\}").expect("env var pattern is a valid regex")
});

/// Config loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to read config: {source}")]
    ReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("invalid YAML at line {}: {message}", line.map(|l| l.to_string()).unwrap_or_else(|| "unknown".to_string()))]
    ParseError { line: Option<usize>, message: String },

    #[error("validation error: {message}")]
    ValidationError { message: String },

    #[error("environment variable not found: {var}")]
    EnvVarNotFound { var: String },
}

/// Configuration loader.
pub struct ConfigLoader {
    base_path: PathBuf,
}

impl ConfigLoader {
    /// Create a loader for the given project directory.
    pub fn new(project_dir: impl AsRef<Path>) -> Self {
        Self {
            base_path: project_dir.as_ref().to_path_buf(),
        }
    }

    /// Path of the project config file.
    pub fn config_path(&self) -> PathBuf {
        self.base_path.join(CONFIG_FILE)
    }

    /// Load configuration from `.stencil/config.yaml`, or defaults if absent.
    pub fn load(&self) -> Result<StencilConfig, ConfigError> {
        let config_path = self.config_path();

        if !config_path.exists() {
            return Ok(StencilConfig::default());
        }

        Self::load_file(&config_path)
    }

    /// Load configuration from an explicit file, which must exist.
    pub fn load_file(path: &Path) -> Result<StencilConfig, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration text, expanding env vars and validating the result.
    pub fn parse(contents: &str) -> Result<StencilConfig, ConfigError> {
        let expanded = expand_env_vars(contents)?;

        // An empty or comment-only file means "all defaults".
        if expanded.lines().all(|l| l.trim().is_empty() || l.trim_start().starts_with('#')) {
            return Ok(StencilConfig::default());
        }

        let config: StencilConfig =
            serde_yaml::from_str(&expanded).map_err(|e| ConfigError::ParseError {
                line: e.location().map(|l| l.line()),
                message: e.to_string(),
            })?;

        validate(&config)?;
        Ok(config)
    }

    /// Save configuration to `.stencil/config.yaml`.
    pub fn save(&self, config: &StencilConfig) -> Result<(), ConfigError> {
        let config_path = self.config_path();
        if let Some(dir) = config_path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        let yaml = serde_yaml::to_string(config).map_err(|e| ConfigError::ParseError {
            line: None,
            message: e.to_string(),
        })?;

        std::fs::write(config_path, yaml)?;
        Ok(())
    }
}

/// Expand environment variables in the form `${VAR}` or `${VAR:-default}`.
fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
    let mut result = content.to_string();

    for cap in ENV_VAR_PATTERN.captures_iter(content) {
        let full_match = &cap[0];
        let var_name = &cap[1];
        let default = cap.get(2).map(|m| m.as_str());

        let value = match std::env::var(var_name) {
            Ok(v) => v,
            Err(_) => match default {
                Some(d) => d.to_string(),
                None => {
                    return Err(ConfigError::EnvVarNotFound {
                        var: var_name.to_string(),
                    })
                }
            },
        };

        result = result.replace(full_match, &value);
    }

    Ok(result)
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        message: message.into(),
    }
}

/// Validate configuration values.
fn validate(config: &StencilConfig) -> Result<(), ConfigError> {
    let link = &config.link;
    if link.script_name.trim().is_empty() {
        return Err(invalid("link.script_name must not be empty"));
    }
    if link.template_remote.trim().is_empty() || link.template_remote.contains(char::is_whitespace)
    {
        return Err(invalid("link.template_remote must be a single word"));
    }
    if link.template_branch.trim().is_empty() {
        return Err(invalid("link.template_branch must not be empty"));
    }

    let verify = &config.verify;
    if verify.build_tool.trim().is_empty() {
        return Err(invalid("verify.build_tool must not be empty"));
    }
    for (field, ext) in [
        ("source_extension", &verify.source_extension),
        ("object_extension", &verify.object_extension),
        ("dependency_extension", &verify.dependency_extension),
    ] {
        if ext.is_empty() || ext.starts_with('.') {
            return Err(invalid(format!(
                "verify.{field} must be a bare extension without a leading dot"
            )));
        }
    }
    if verify.source_extension == verify.object_extension
        || verify.source_extension == verify.dependency_extension
    {
        return Err(invalid(
            "verify.source_extension must differ from the object and dependency extensions",
        ));
    }
    if verify.debug_var.is_empty() {
        return Err(invalid("verify.debug_var must not be empty"));
    }
    if verify.scenarios.is_empty() {
        return Err(invalid("verify.scenarios must list at least one scenario"));
    }
    if verify.timeout_secs == Some(0) {
        return Err(invalid("verify.timeout_secs must be greater than 0"));
    }

    Ok(())
}
