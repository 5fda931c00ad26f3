//! Conversion pipeline
//!
//! Parses test output from a reader and renders the report to a writer in
//! the format the configuration selects.

use std::io::{BufRead, Write};

use anyhow::Context;
use tfjunit_formatter::{write_json, write_junit_xml};
use tfjunit_parser::{Parser, TracingDiagnostics, WriterDiagnostics};
use tracing::info;

use crate::config::Config;

/// Convert test output to a report
///
/// Returns `true` when the process should exit non-zero because tests failed
/// and `--set-exit-code` was given.
///
/// # Errors
///
/// Returns an error with a one-line description if reading the input or
/// writing the report fails.
pub fn run<R: BufRead, W: Write>(config: &Config, input: R, output: W) -> anyhow::Result<bool> {
    let mut parser = Parser::new();
    if let Some(name) = &config.package_name {
        parser = parser.package_name(name.as_str());
    }
    if config.debug_timings {
        parser = parser.diagnostics(WriterDiagnostics::stderr());
    } else if config.verbose {
        parser = parser.diagnostics(TracingDiagnostics);
    }

    let report = parser.parse(input).context("Error reading input")?;

    if config.format_json {
        write_json(&report, output).context("Error writing JSON")?;
    } else {
        write_junit_xml(&report, &config.junit_options(), output).context("Error writing XML")?;
    }

    let failures = report.failures();
    info!(
        packages = report.packages.len(),
        tests = report.test_count(),
        failures,
        "Converted test output"
    );
    Ok(config.set_exit_code && failures > 0)
}
