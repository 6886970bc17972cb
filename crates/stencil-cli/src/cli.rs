//! CLI argument definitions using clap derive macros.

use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, Subcommand, ValueHint};
use stencil_common_config::{env::vars, ConfigLoader, Environment, StencilConfig};
use tracing::debug;

use crate::commands::{ConfigCommand, DoctorCommand, LinkCommand, VerifyCommand};
use crate::error::CliError;

/// Stencil - keep generated repositories in sync with their template
///
/// Link a repository back to the template it was created from, and verify
/// that a Makefile project builds the way it should.
#[derive(Debug, Parser)]
#[command(
    name = "stencil",
    author,
    version,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true,
    help_template = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
"
)]
pub struct Cli {
    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true,
        help = "Increase verbosity level"
    )]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(
        short,
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Suppress non-error output"
    )]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(
        short,
        long,
        global = true,
        env = vars::STENCIL_CONFIG,
        value_hint = ValueHint::FilePath,
        help = "Path to configuration file"
    )]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        global = true,
        default_value = "text",
        value_enum,
        help = "Output format (text, json)"
    )]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Available subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Write and commit a script that merges updates from the template repository
    Link(LinkCommand),

    /// Run the build verification scenarios against a Makefile project
    Verify(VerifyCommand),

    /// Show or initialize configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Check that git, make and doxygen are available
    Doctor(DoctorCommand),

    /// Generate shell completions
    #[command(hide = true)]
    Completions(CompletionsCommand),
}

impl Command {
    /// Whether the command needs the loaded configuration.
    pub fn reads_config(&self) -> bool {
        !matches!(
            self,
            Self::Config(ConfigCommand::Init(_)) | Self::Completions(_)
        )
    }
}

/// Shell completions generation
#[derive(Debug, Parser)]
pub struct CompletionsCommand {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

impl Cli {
    /// Directory the selected command operates on.
    pub fn project_dir(&self) -> PathBuf {
        let dir = match &self.command {
            Command::Link(cmd) => cmd.repo.clone(),
            Command::Verify(cmd) => cmd.dir.clone(),
            Command::Config(cmd) => cmd.dir().map(Path::to_path_buf),
            Command::Doctor(_) | Command::Completions(_) => None,
        };
        dir.unwrap_or_else(|| PathBuf::from("."))
    }

    /// Load configuration from `--config`, or from the project directory.
    ///
    /// `STENCIL_*` environment overrides are applied on top.
    pub fn load_config(&self) -> Result<StencilConfig, CliError> {
        let mut config = match &self.config {
            Some(path) => {
                debug!(path = %path.display(), "loading explicit config file");
                ConfigLoader::load_file(path)?
            }
            None => ConfigLoader::new(self.project_dir()).load()?,
        };

        Environment::apply_overrides(&mut config)?;
        Ok(config)
    }

    /// Execute the selected command
    pub async fn execute(self) -> Result<(), CliError> {
        if let Command::Completions(cmd) = &self.command {
            return cmd.execute();
        }

        // init replaces the file, so a broken one must not block it
        let config = if self.command.reads_config() {
            self.load_config()?
        } else {
            StencilConfig::default()
        };
        let ctx = CommandContext {
            project_dir: self.project_dir(),
            config_path: self.config.clone(),
            config,
            format: self.format,
            verbose: self.verbose,
            quiet: self.quiet,
        };

        match self.command {
            Command::Link(cmd) => cmd.execute(&ctx).await,
            Command::Verify(cmd) => cmd.execute(&ctx).await,
            Command::Config(cmd) => cmd.execute(&ctx),
            Command::Doctor(cmd) => cmd.execute(&ctx),
            Command::Completions(cmd) => cmd.execute(),
        }
    }
}

impl CompletionsCommand {
    /// Execute the completions command
    pub fn execute(&self) -> Result<(), CliError> {
        use clap::CommandFactory;
        use clap_complete::generate;
        use std::io;

        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(self.shell, &mut cmd, name, &mut io::stdout());
        Ok(())
    }
}

/// Context passed to all commands
#[derive(Debug)]
pub struct CommandContext {
    pub project_dir: PathBuf,
    pub config_path: Option<PathBuf>,
    pub config: StencilConfig,
    pub format: OutputFormat,
    pub verbose: u8,
    pub quiet: bool,
}
