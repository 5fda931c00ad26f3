// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! tfjunit-parser: Streaming parser for `go test -v` output
//!
//! This library crate turns the text printed by `go test -v` into a
//! structured [`Report`] of packages and tests. Passing Terraform acceptance
//! tests additionally get a breakdown of how long their create and destroy
//! phases took, recovered from the provisioning log lines interleaved with
//! the test output.
//!
//! # Example
//!
//! ```no_run
//! use tfjunit_parser::{Parser, WriterDiagnostics, parse};
//!
//! // Parse stdin with a fallback package name
//! let stdin = std::io::stdin();
//! let report = parse(stdin.lock(), Some("my/pkg")).unwrap();
//!
//! // Or print each test's phase timings while parsing
//! let report = Parser::new()
//!     .diagnostics(WriterDiagnostics::stderr())
//!     .parse_str("=== RUN TestA\n--- PASS: TestA (1.00s)\n")
//!     .unwrap();
//! println!("{} failures", report.failures());
//! ```

#![warn(missing_docs)]

pub mod builder;
pub mod classify;
pub mod diagnostics;
pub mod error;
pub mod parser;
pub mod phase;
pub mod report;

pub use builder::ReportBuilder;
pub use diagnostics::{Diagnostics, NoopDiagnostics, TracingDiagnostics, WriterDiagnostics};
pub use error::ParseError;
pub use parser::{Parser, parse};
pub use phase::PhaseAnalyzer;
pub use report::{Package, PhaseWarning, Report, ResourceAction, ResourceTime, Test, TestOutcome};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::ParseError;
    pub use crate::parser::{Parser, parse};
    pub use crate::report::{Package, Report, Test, TestOutcome};
}
