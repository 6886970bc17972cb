//! Stencil CLI
//!
//! Main entry point for the `stencil` binary.

use std::process::ExitCode;

use clap::Parser;
use stencil_cli::cli::Cli;
use stencil_cli::CliError;
use stencil_common_config::Environment;
use stencil_common_log::LogConfig;
use tracing::debug;

/// Application exit codes
#[repr(u8)]
pub enum Exit {
    Success = 0,
    GeneralError = 1,
}

impl From<Exit> for ExitCode {
    fn from(exit: Exit) -> Self {
        ExitCode::from(exit as u8)
    }
}

fn main() -> ExitCode {
    let _env = Environment::init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_config = LogConfig::from_env().with_verbosity(cli.verbose, cli.quiet);
    if let Err(e) = stencil_common_log::init(log_config) {
        eprintln!("warning: {e}");
    }

    let format = cli.format;
    let verbose = cli.verbose > 0;

    // Subprocesses are awaited one at a time
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("error: failed to create Tokio runtime: {e}");
            return Exit::GeneralError.into();
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => Exit::Success.into(),
        Err(e) => {
            debug!(code = e.code(), "command failed");
            eprintln!("{}", e.render(format, verbose));
            e.exit_code()
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    cli.execute().await
}
