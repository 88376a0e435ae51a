//! rpn - Reverse Polish Notation calculator
//!
//! Usage:
//!   rpn               Read lines from stdin (interactively on a terminal)
//!   rpn -e "3 4 + p"  Evaluate each argument as a line
//!   rpn script.rpn    Evaluate the lines of a file

mod cli;
mod rcfile;
mod repl;
mod terminal;

use std::env;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Diagnostics go to stderr, filtered by RPN_LOG
fn init_tracing() {
    let filter = EnvFilter::try_from_env("RPN_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    let args: Vec<String> = env::args().collect();
    cli::run(cli::parse_args(&args))
}
