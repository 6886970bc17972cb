//! Config command implementation.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueHint};
use serde::Serialize;
use stencil_common_config::{ConfigLoader, StencilConfig};

use crate::cli::CommandContext;
use crate::error::CliError;
use crate::output::{print_output, FormattedOutput};

/// Manage configuration
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration, defaults included
    Show(ConfigDirArgs),

    /// Write a config file with every default spelled out
    Init(ConfigInitArgs),
}

/// Project selection shared by config subcommands.
#[derive(Debug, Parser)]
pub struct ConfigDirArgs {
    /// Project directory (defaults to the current directory)
    #[arg(long, value_hint = ValueHint::DirPath)]
    pub dir: Option<PathBuf>,
}

/// Arguments of `config init`.
#[derive(Debug, Parser)]
pub struct ConfigInitArgs {
    #[command(flatten)]
    pub project: ConfigDirArgs,

    /// Replace an existing config file
    #[arg(long)]
    pub force: bool,
}

/// Effective configuration and where it came from.
#[derive(Debug, Serialize)]
pub struct ConfigView {
    pub source: Option<PathBuf>,
    pub config: StencilConfig,
}

impl FormattedOutput for ConfigView {
    fn format_text(&self) -> String {
        let header = match &self.source {
            Some(path) => format!("# {}\n", path.display()),
            None => "# defaults (no config file)\n".to_string(),
        };
        let body = serde_yaml::to_string(&self.config).unwrap_or_default();
        format!("{header}{}", body.trim_end())
    }

    fn format_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl ConfigCommand {
    /// Project directory selected with `--dir`, if any.
    pub fn dir(&self) -> Option<&Path> {
        match self {
            Self::Show(args) => args.dir.as_deref(),
            Self::Init(args) => args.project.dir.as_deref(),
        }
    }

    pub fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let loader = ConfigLoader::new(&ctx.project_dir);

        match self {
            Self::Show(_) => {
                let source = ctx.config_path.clone().or_else(|| {
                    let path = loader.config_path();
                    path.exists().then_some(path)
                });
                let view = ConfigView {
                    source,
                    config: ctx.config.clone(),
                };
                print_output(ctx, &view)
            }
            Self::Init(args) => {
                let path = loader.config_path();
                if path.exists() && !args.force {
                    return Err(CliError::config_with_hint(
                        format!("{} already exists", path.display()),
                        "Pass --force to overwrite it",
                    ));
                }

                loader.save(&StencilConfig::default())?;
                if !ctx.quiet {
                    println!("✓ Wrote {}", path.display());
                }
                Ok(())
            }
        }
    }
}
