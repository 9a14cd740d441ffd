//! # Dome Storage
//!
//! Operator tool over a directory-backed Dome project store: export and
//! import backup documents, write timestamped backups, clear projects, and
//! edit unit owners and statuses from the command line.

pub mod commands;
pub mod config;
pub mod errors;

pub use commands::{Cli, Command};
pub use config::{Config, Dependencies, LogFormat};
pub use errors::CliError;
