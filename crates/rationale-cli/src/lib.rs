//! Rationale CLI library.
//!
//! This library provides the core functionality for the `rationale` command-line interface,
//! including configuration management, adapter wiring, command execution, and output formatting.

pub mod backend;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod repl;

pub use backend::{open_service, Embedder, Service};
pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
