// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! tfjunit-formatter: Report rendering for tfjunit
//!
//! Renders a parsed [`Report`](tfjunit_parser::Report) either as a JUnit XML
//! document or as newline-delimited JSON arrays of tests. Rendering is a pure
//! pass over the report; nothing is derived here.
//!
//! # Example
//!
//! ```no_run
//! use tfjunit_formatter::{JunitOptions, write_json, write_junit_xml};
//!
//! let report = tfjunit_parser::parse(std::io::stdin().lock(), None).unwrap();
//! write_junit_xml(&report, &JunitOptions::default(), std::io::stdout()).unwrap();
//! write_json(&report, std::io::stdout()).unwrap();
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod json;
pub mod junit;

pub use error::FormatError;
pub use json::write_json;
pub use junit::{JunitOptions, write_junit_xml};
