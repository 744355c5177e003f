//! bdnbuild - prepare, build and run a multi-platform native project through CMake
//!
//! ## Architecture
//!
//! ```text
//! CLI → commands/ → build/ (plan, generators, state) → exec::Runner → cmake / SDK tools
//! ```

mod build;
mod cli;
mod commands;
mod config;
mod error;
mod exec;
mod utils;

use clap::Parser;

use cli::Cli;
use error::{BuildError, EXIT_ARGUMENT_ERROR, EXIT_UNEXPECTED};
use utils::terminal::print_error;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version are not errors
            let code = if e.use_stderr() { EXIT_ARGUMENT_ERROR } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    if let Err(e) = cli.execute() {
        std::process::exit(report(&e));
    }
}

/// Print an error and return the process exit code for it
fn report(e: &anyhow::Error) -> i32 {
    match e.downcast_ref::<BuildError>() {
        Some(err) => {
            err.display_with_hints();
            err.exit_code()
        }
        None => {
            print_error(&format!("Unexpected error: {:?}", e));
            EXIT_UNEXPECTED
        }
    }
}
