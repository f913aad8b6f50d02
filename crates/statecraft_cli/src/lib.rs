//! The `statecraft` command-line tool.
//!
//! This crate provides:
//! - [`args`] - the clap argument surface
//! - [`config`] - TOML configuration merged with command-line flags
//! - [`commands`] - subcommand implementations
//! - [`logging`] - tracing subscriber setup

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod args;
pub mod commands;
pub mod config;
pub mod logging;

pub use args::{Args, Command, CompileArgs, GrammarArg};
pub use commands::execute;
pub use config::{Config, EmitFormat};

use std::io::Write;

use statecraft_foundation::Result;

/// Loads the configuration, installs logging and runs the command.
///
/// # Errors
/// Returns configuration errors and the errors of [`execute`].
pub fn run(args: &Args, out: &mut impl Write) -> Result<()> {
    let base = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let config = args.apply(base);
    logging::init(config.verbose);
    tracing::debug!(?config, "configuration");
    execute(&args.command, &config, out)
}
