//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::{Config, EmitFormat};

/// Compiles PlantUML activity diagrams and SCL programs into state machines.
#[derive(Parser, Debug)]
#[command(name = "statecraft")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log debug events (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Compile a PlantUML activity diagram
    Ad(CompileArgs),
    /// Compile an SCL program
    Scl(CompileArgs),
    /// Print the syntax tree of a file and any syntax errors
    Parse {
        /// Grammar to parse with
        #[arg(short, long, value_enum)]
        grammar: GrammarArg,
        /// Source file
        file: PathBuf,
    },
    /// Check that both grammars load
    CheckGrammars,
}

/// Arguments shared by the compiling subcommands.
#[derive(clap::Args, Debug, Clone, PartialEq, Eq)]
pub struct CompileArgs {
    /// Source file
    pub file: PathBuf,

    /// Output directory
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// Outputs to produce; repeat for several
    #[arg(short, long, value_enum)]
    pub emit: Vec<EmitFormat>,

    /// Namespace of generated C# code
    #[arg(long)]
    pub namespace: Option<String>,
}

/// Grammar selector for `parse`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GrammarArg {
    /// PlantUML activity diagrams
    #[value(name = "ad")]
    ActivityDiagram,
    /// SCL programs
    #[value(name = "scl")]
    Scl,
}

impl Args {
    /// Applies the command-line overrides to `base`.
    #[must_use]
    pub fn apply(&self, base: Config) -> Config {
        let mut config = base;
        if self.verbose {
            config = config.with_verbose(true);
        }
        if let Command::Ad(compile) | Command::Scl(compile) = &self.command {
            if let Some(dir) = &compile.out_dir {
                config = config.with_output_dir(dir);
            }
            if !compile.emit.is_empty() {
                config = config.with_emit(compile.emit.clone());
            }
            if let Some(namespace) = &compile.namespace {
                config = config.with_namespace(namespace);
            }
        }
        config
    }
}
