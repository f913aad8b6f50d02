//! Statecraft CLI entry point.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use statecraft_cli::{Args, run};

fn main() -> ExitCode {
    let args = Args::parse();
    let stdout = io::stdout();
    match run(&args, &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError: {e}\x1b[0m");
            if let Some(context) = &e.context {
                eprintln!("{context}");
            }
            if let statecraft_foundation::ErrorKind::ParseError { context, .. } = &e.kind {
                eprintln!("{context}");
            }
            ExitCode::FAILURE
        }
    }
}
