//! Stencil CLI Library
//!
//! Argument parsing, command dispatch and output for the `stencil` binary.

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;

pub use error::CliError;
