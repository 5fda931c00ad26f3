//! Configuration for the tfjunit command
//!
//! This module provides the command-line options, including the fallback
//! package name, output format selection and logging options.

use clap::Parser;
use tfjunit_formatter::JunitOptions;

/// tfjunit - Convert go test output with Terraform phase timings into JUnit XML or JSON
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "tfjunit")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Package name to use when the output has no result line
    ///
    /// Compiled test binaries do not print a package name.
    #[arg(long, env = "TFJUNIT_PACKAGE_NAME")]
    pub package_name: Option<String>,

    /// Value of the go.version property in the generated XML
    #[arg(long, env = "TFJUNIT_GO_VERSION")]
    pub go_version: Option<String>,

    /// Do not print the XML declaration
    #[arg(long, default_value = "false")]
    pub no_xml_header: bool,

    /// Exit with status 1 if any test failed
    #[arg(long, default_value = "false")]
    pub set_exit_code: bool,

    /// Write one JSON array of tests per package instead of JUnit XML
    ///
    /// The JSON includes the create and destroy phase timings of each test.
    #[arg(long, default_value = "false")]
    pub format_json: bool,

    /// Print the phase timing summary of every passing test to stderr
    #[arg(long, default_value = "false")]
    pub debug_timings: bool,

    /// Enable verbose logging (debug level)
    ///
    /// Timing summaries are also emitted as debug events.
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,

    /// Quiet mode - suppress info-level logs
    ///
    /// Only errors and warnings will be logged.
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

impl Config {
    /// Get the log level based on verbose/quiet flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }

    /// Options for the JUnit renderer
    #[must_use]
    pub fn junit_options(&self) -> JunitOptions {
        JunitOptions {
            no_xml_header: self.no_xml_header,
            go_version: self.go_version.clone(),
        }
    }
}
