//! Environment variable handling.

use std::env;
use thiserror::Error;

use crate::types::StencilConfig;

/// Environment variable errors.
#[derive(Debug, Error)]
pub enum EnvError {
    #[error("invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },
}

/// Environment variable names.
pub mod vars {
    /// Explicit config file path.
    pub const STENCIL_CONFIG: &str = "STENCIL_CONFIG";
    /// Overrides `verify.build_tool`.
    pub const STENCIL_BUILD_TOOL: &str = "STENCIL_BUILD_TOOL";
    /// Overrides `verify.timeout_secs`.
    pub const STENCIL_VERIFY_TIMEOUT: &str = "STENCIL_VERIFY_TIMEOUT";
}

/// Environment configuration.
pub struct Environment {
    _guard: (),
}

impl Environment {
    /// Initialize environment from `.env` files in the current directory.
    ///
    /// Later files override earlier ones; missing files are ignored.
    pub fn init() -> Self {
        let _ = dotenvy::from_filename(".env");
        let _ = dotenvy::from_filename(".env.local");

        Self { _guard: () }
    }

    /// Get an optional string variable. Empty values count as unset.
    pub fn get(var: &str) -> Option<String> {
        env::var(var).ok().filter(|v| !v.is_empty())
    }

    /// Get an integer variable.
    pub fn get_int<T: std::str::FromStr>(var: &str) -> Result<Option<T>, EnvError> {
        match Self::get(var) {
            Some(v) => v.parse().map(Some).map_err(|_| EnvError::InvalidValue {
                var: var.to_string(),
                message: format!("expected integer, got '{v}'"),
            }),
            None => Ok(None),
        }
    }

    /// Apply `STENCIL_*` overrides on top of a loaded configuration.
    pub fn apply_overrides(config: &mut StencilConfig) -> Result<(), EnvError> {
        if let Some(tool) = Self::get(vars::STENCIL_BUILD_TOOL) {
            config.verify.build_tool = tool;
        }
        if let Some(secs) = Self::get_int::<u64>(vars::STENCIL_VERIFY_TIMEOUT)? {
            if secs == 0 {
                return Err(EnvError::InvalidValue {
                    var: vars::STENCIL_VERIFY_TIMEOUT.to_string(),
                    message: "timeout must be greater than zero".to_string(),
                });
            }
            config.verify.timeout_secs = Some(secs);
        }
        Ok(())
    }
}
