//! Command implementations.

mod config;
mod doctor;
mod link;
mod verify;

pub use config::ConfigCommand;
pub use doctor::{DoctorCommand, DoctorReport};
pub use link::LinkCommand;
pub use verify::VerifyCommand;
