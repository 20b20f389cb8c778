//! # nuspec-pack CLI
//!
//! This is the binary entry point for the `nuspec-pack` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Setting up logging and dispatching to the selected command.
//! - Translating top-level errors into a message on stderr and exit code 1.
//!
//! The core logic lives in the `nuspec_pack` library crate; the binary is a
//! thin wrapper around it.

mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    match cli.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
