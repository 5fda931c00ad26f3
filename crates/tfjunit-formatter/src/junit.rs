// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! JUnit XML rendering
//!
//! One `<testsuite>` per package and one `<testcase>` per test. Failed tests
//! carry their output in a `<failure message="Failed">` body, skipped tests
//! carry it as the `<skipped>` message. Package coverage, when reported, is
//! written as the `coverage.statements.pct` suite property.

use crate::error::FormatError;
use quick_junit::{NonSuccessKind, Property, TestCase, TestCaseStatus, TestSuite};
use std::io::Write;
use std::time::Duration;
use tfjunit_parser::{Package, Report, Test, TestOutcome};

const REPORT_NAME: &str = "go test";
const FAILURE_MESSAGE: &str = "Failed";
const GO_VERSION_PROPERTY: &str = "go.version";
const COVERAGE_PROPERTY: &str = "coverage.statements.pct";

/// Options for JUnit rendering
#[derive(Debug, Clone, Default)]
pub struct JunitOptions {
    /// Omit the `<?xml ...?>` declaration
    pub no_xml_header: bool,
    /// Value of the `go.version` suite property, omitted when unset
    pub go_version: Option<String>,
}

/// Write the report as a JUnit XML document
///
/// # Errors
///
/// Returns `FormatError::Xml` if the document cannot be serialized and
/// `FormatError::Io` if writing fails.
pub fn write_junit_xml<W: Write>(
    report: &Report,
    options: &JunitOptions,
    mut writer: W,
) -> Result<(), FormatError> {
    let xml = to_junit(report, options).to_string()?;
    let body = if options.no_xml_header {
        strip_xml_declaration(&xml)
    } else {
        &xml
    };

    writer.write_all(body.as_bytes())?;
    writer.flush()?;
    tracing::debug!(
        packages = report.packages.len(),
        tests = report.test_count(),
        "Wrote JUnit report"
    );
    Ok(())
}

/// Build the JUnit document for a report
#[must_use]
pub fn to_junit(report: &Report, options: &JunitOptions) -> quick_junit::Report {
    let mut junit = quick_junit::Report::new(REPORT_NAME);
    for package in &report.packages {
        junit.add_test_suite(package_suite(package, options));
    }
    junit
}

fn package_suite(package: &Package, options: &JunitOptions) -> TestSuite {
    let mut suite = TestSuite::new(package.name.as_str());
    suite.set_time(seconds(package.time));
    if let Some(version) = &options.go_version {
        suite.add_property(Property::new(GO_VERSION_PROPERTY, version.as_str()));
    }
    if !package.coverage_pct.is_empty() {
        suite.add_property(Property::new(
            COVERAGE_PROPERTY,
            package.coverage_pct.as_str(),
        ));
    }

    let classname = class_name(&package.name);
    for test in &package.tests {
        let mut case = TestCase::new(test.name.as_str(), test_status(test));
        case.set_classname(classname).set_time(seconds(test.time));
        suite.add_test_case(case);
    }
    suite
}

fn test_status(test: &Test) -> TestCaseStatus {
    let output = test.output.join("\n");
    match test.outcome {
        TestOutcome::Pass => TestCaseStatus::success(),
        TestOutcome::Fail => {
            let mut status = TestCaseStatus::non_success(NonSuccessKind::Failure);
            status.set_message(FAILURE_MESSAGE).set_description(output);
            status
        }
        TestOutcome::Skip => {
            let mut status = TestCaseStatus::skipped();
            status.set_message(output);
            status
        }
    }
}

/// Last `/`-separated segment of a package path
fn class_name(package: &str) -> &str {
    package.rsplit('/').next().unwrap_or(package)
}

fn seconds(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs).unwrap_or_default()
}

fn strip_xml_declaration(xml: &str) -> &str {
    if xml.starts_with("<?xml") {
        xml.split_once('\n').map_or("", |(_, rest)| rest)
    } else {
        xml
    }
}
