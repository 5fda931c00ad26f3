//! tfjunit: Convert `go test -v` output into JUnit XML or JSON
//!
//! Reads test output from stdin and writes the report to stdout. Logs and
//! timing diagnostics go to stderr.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tfjunit::{Config, run};

fn main() -> ExitCode {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(config.log_level().into()),
        )
        .init();

    match run(&config, io::stdin().lock(), io::stdout().lock()) {
        Ok(false) => ExitCode::SUCCESS,
        Ok(true) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
