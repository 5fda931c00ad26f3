// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Parser entry points
//!
//! Reads `go test -v` output line by line and returns the finished
//! [`Report`]. Only read errors abort a parse; everything else is parsed on a
//! best-effort basis.
//!
//! # Example
//!
//! ```
//! use tfjunit_parser::parser::Parser;
//!
//! let input = "=== RUN   TestA\n--- PASS: TestA (1.50s)\nok  \tpkg\t1.50s\n";
//! let report = Parser::new().parse_str(input).unwrap();
//! assert_eq!(report.packages[0].name, "pkg");
//! ```

use crate::builder::ReportBuilder;
use crate::diagnostics::Diagnostics;
use crate::error::ParseError;
use crate::phase::PhaseAnalyzer;
use crate::report::Report;
use std::borrow::Cow;
use std::io::BufRead;

/// Parse test output from a reader
///
/// `package_name` names the package when the output has no result line, as
/// with compiled test binaries.
///
/// # Errors
///
/// Returns `ParseError::Io` if reading fails. No partial report is returned.
pub fn parse<R: BufRead>(reader: R, package_name: Option<&str>) -> Result<Report, ParseError> {
    let mut parser = Parser::new();
    if let Some(name) = package_name {
        parser = parser.package_name(name);
    }
    parser.parse(reader)
}

/// Configurable parser
#[derive(Debug, Default)]
pub struct Parser {
    package_name: String,
    analyzer: PhaseAnalyzer,
}

impl Parser {
    /// Create a parser without a fallback package name or diagnostics
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fallback package name
    #[must_use]
    pub fn package_name(mut self, name: impl Into<String>) -> Self {
        self.package_name = name.into();
        self
    }

    /// Report the phase timings of passing tests to a sink
    #[must_use]
    pub fn diagnostics(mut self, diagnostics: impl Diagnostics + 'static) -> Self {
        self.analyzer = PhaseAnalyzer::new(diagnostics);
        self
    }

    /// Parse everything the reader yields
    ///
    /// Lines are split on `\n` with any trailing `\r` removed. Invalid UTF-8
    /// is replaced rather than rejected.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Io` if reading fails.
    pub fn parse<R: BufRead>(self, mut reader: R) -> Result<Report, ParseError> {
        let mut builder = ReportBuilder::new(self.analyzer);
        let mut buf = Vec::new();
        let mut lines = 0usize;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let line = decode_line(&buf);
            builder.push_line(&line);
            lines += 1;
        }

        let report = builder.finish(&self.package_name);
        tracing::debug!(
            lines,
            packages = report.packages.len(),
            tests = report.test_count(),
            "Parsed test output"
        );
        Ok(report)
    }

    /// Parse in-memory output
    ///
    /// # Errors
    ///
    /// Never fails in practice; reading from a string cannot error.
    pub fn parse_str(self, input: &str) -> Result<Report, ParseError> {
        self.parse(input.as_bytes())
    }
}

fn decode_line(raw: &[u8]) -> Cow<'_, str> {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw)
}
