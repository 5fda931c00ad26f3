// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Report builder
//!
//! [`ReportBuilder`] is the state machine behind the parser. It is fed one
//! line at a time, in input order, and assembles packages and tests from the
//! classified lines. Each line kind has its own transition method so the
//! transitions can be exercised without a reader.
//!
//! Besides its classified meaning, every line is also appended to the raw
//! create or destroy text of the current test. The destroy step marker flips
//! the builder from create to destroy until the next test starts.

use crate::classify::{self, Line, PackageResult};
use crate::phase::PhaseAnalyzer;
use crate::report::{Package, Report, Test, TestOutcome};
use std::collections::HashMap;
use tracing::{debug, trace};

/// Name of the test synthesized for a failed package without tests
pub const FAILURE_TEST_NAME: &str = "Failure";

/// Incremental report construction
#[derive(Debug, Default)]
pub struct ReportBuilder {
    /// Finished packages
    packages: Vec<Package>,
    /// Tests of the package being read
    tests: Vec<Test>,
    /// Name of the test lines are attributed to
    current: String,
    /// Coverage of the package being read
    coverage_pct: String,
    /// Output not yet attributed to a test
    buffer: Vec<String>,
    /// Build output per package name
    package_captures: HashMap<String, Vec<String>>,
    /// Package whose build output is being captured
    captured_package: Option<String>,
    /// A bare PASS/FAIL/SKIP was seen in the package being read
    seen_summary: bool,
    /// The current test has entered its destroy phase
    in_destroy: bool,
    /// Sum of reported test durations, used when no result line arrives
    tests_time: f64,
    analyzer: PhaseAnalyzer,
}

impl ReportBuilder {
    /// Create a builder that times passing tests with the given analyzer
    #[must_use]
    pub fn new(analyzer: PhaseAnalyzer) -> Self {
        Self {
            analyzer,
            ..Default::default()
        }
    }

    /// Process a single line of output
    pub fn push_line(&mut self, line: &str) {
        let capturing = self.captured_package.is_some();
        match classify::classify(line) {
            Line::TestStart { name } => self.on_test_start(name),
            Line::PackageResult(result) => self.on_package_result(&result),
            Line::TestStatus {
                outcome,
                name,
                time,
            } => self.on_test_status(outcome, name, time),
            Line::Coverage { pct } => self.on_coverage(pct),
            Line::Output { text } if !capturing => self.on_output(text),
            Line::BuildHeader { package } => self.on_build_header(package),
            _ if capturing => self.on_build_capture(line),
            Line::Summary => self.on_summary(),
            _ => self.on_other(line),
        }
        self.route_phase_line(line);
    }

    /// `=== RUN <name>`: start a new test in the current package
    pub fn on_test_start(&mut self, name: &str) {
        trace!(test = name, "Test started");
        self.tests.push(Test::new(name));
        self.current = name.to_string();
        self.captured_package = None;
        self.in_destroy = false;
        self.seen_summary = false;
    }

    /// Package result line: close the current package
    pub fn on_package_result(&mut self, result: &PackageResult<'_>) {
        if let Some(pct) = result.coverage_pct {
            self.coverage_pct = pct.to_string();
        }

        if let Some(reason) = result.build_failure {
            if self.tests.is_empty() {
                let output = self
                    .package_captures
                    .get(result.name)
                    .cloned()
                    .unwrap_or_default();
                debug!(package = result.name, reason, "Package failed to build");
                self.tests.push(Test::failure(reason, output));
            }
        } else if result.failed && self.tests.is_empty() && !self.buffer.is_empty() {
            debug!(
                package = result.name,
                lines = self.buffer.len(),
                "Package failed without tests"
            );
            let output = std::mem::take(&mut self.buffer);
            self.tests.push(Test::failure(FAILURE_TEST_NAME, output));
        }

        let package = Package {
            name: result.name.to_string(),
            time: result.time,
            coverage_pct: std::mem::take(&mut self.coverage_pct),
            tests: std::mem::take(&mut self.tests),
        };
        debug!(
            package = %package.name,
            tests = package.tests.len(),
            time = package.time,
            "Package finished"
        );
        self.packages.push(package);

        self.buffer.clear();
        self.current.clear();
        self.seen_summary = false;
        self.tests_time = 0.0;
    }

    /// `--- PASS|FAIL|SKIP: <name> (<d>s)`: record a test's outcome
    pub fn on_test_status(&mut self, outcome: TestOutcome, name: &str, time: f64) {
        self.current = name.to_string();
        let Some(idx) = self.find_test(name) else {
            trace!(test = name, "Status for unknown test");
            return;
        };

        let test = &mut self.tests[idx];
        test.outcome = outcome;
        if outcome != TestOutcome::Pass {
            test.clear_phase_text();
        }
        test.output.append(&mut self.buffer);
        test.time = time;
        test.resolved = true;

        if outcome == TestOutcome::Pass {
            self.analyzer.analyze(test);
        }
        self.tests_time += time;
    }

    /// Standalone coverage line
    pub fn on_coverage(&mut self, pct: &str) {
        self.coverage_pct = pct.to_string();
    }

    /// Tab-indented output of the current test
    pub fn on_output(&mut self, text: &str) {
        if let Some(idx) = self.find_test(&self.current) {
            self.tests[idx].output.push(text.to_string());
        }
    }

    /// `# <package>`: start capturing build output
    pub fn on_build_header(&mut self, package: &str) {
        self.captured_package = Some(package.to_string());
    }

    /// A line of build output for the captured package
    pub fn on_build_capture(&mut self, line: &str) {
        if let Some(package) = &self.captured_package {
            self.package_captures
                .entry(package.clone())
                .or_default()
                .push(line.to_string());
        }
    }

    /// Bare `PASS`, `FAIL` or `SKIP`: ignore further unattributed output
    pub fn on_summary(&mut self) {
        self.seen_summary = true;
    }

    /// Unrecognized line: buffer it until a test claims it
    pub fn on_other(&mut self, line: &str) {
        if !self.seen_summary {
            self.buffer.push(line.to_string());
        }
    }

    /// Append a line to the current test's create or destroy text
    ///
    /// Tests that already reported a status take no more raw text.
    pub fn route_phase_line(&mut self, line: &str) {
        let Some(idx) = self.find_test(&self.current) else {
            return;
        };

        let test = &mut self.tests[idx];
        if classify::is_destroy_start(line) {
            self.in_destroy = true;
        }
        if test.resolved {
            return;
        }
        if self.in_destroy {
            test.destroy_text.push(line.to_string());
        } else {
            test.create_text.push(line.to_string());
        }
    }

    /// Finish the report
    ///
    /// Tests left open by a missing result line, as with compiled test
    /// binaries, become a package named `fallback_name` whose duration is the
    /// sum of its tests. An input without any package yields one empty package.
    #[must_use]
    pub fn finish(mut self, fallback_name: &str) -> Report {
        if !self.tests.is_empty() || self.packages.is_empty() {
            debug!(
                package = fallback_name,
                tests = self.tests.len(),
                "No result line, using fallback package"
            );
            self.packages.push(Package {
                name: fallback_name.to_string(),
                time: self.tests_time,
                coverage_pct: self.coverage_pct,
                tests: self.tests,
            });
        }
        Report {
            packages: self.packages,
        }
    }

    /// Tests of the package being read
    #[must_use]
    pub fn tests(&self) -> &[Test] {
        &self.tests
    }

    /// Packages finished so far
    #[must_use]
    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    /// Name of the test lines are currently attributed to
    #[must_use]
    pub fn current_test(&self) -> &str {
        &self.current
    }

    /// Output buffered outside any test
    #[must_use]
    pub fn buffered_output(&self) -> &[String] {
        &self.buffer
    }

    /// Package whose build output is being captured
    #[must_use]
    pub fn captured_package(&self) -> Option<&str> {
        self.captured_package.as_deref()
    }

    /// Newest test with the given name
    fn find_test(&self, name: &str) -> Option<usize> {
        self.tests.iter().rposition(|t| t.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    fn strings(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| (*s).to_string()).collect()
    }

    fn feed(lines: &[&str]) -> ReportBuilder {
        let mut builder = ReportBuilder::new(PhaseAnalyzer::default());
        for line in lines {
            builder.push_line(line);
        }
        builder
    }

    #[test]
    fn test_start_appends_failing_test() {
        let builder = feed(&["=== RUN   TestA"]);
        assert_eq!(builder.tests().len(), 1);
        assert_eq!(builder.tests()[0].outcome, TestOutcome::Fail);
        assert_eq!(builder.current_test(), "TestA");
        assert_eq!(builder.tests()[0].create_text, strings(&["=== RUN   TestA"]));
    }

    #[test]
    fn test_status_updates_newest_same_named_test() {
        let mut builder = feed(&["=== RUN   TestA", "=== RUN   TestA"]);
        builder.on_test_status(TestOutcome::Pass, "TestA", 2.0);

        assert_eq!(builder.tests()[0].outcome, TestOutcome::Fail);
        assert_eq!(builder.tests()[1].outcome, TestOutcome::Pass);
        assert_eq!(builder.tests()[1].time, 2.0);
    }

    #[test]
    fn test_status_flushes_buffer_into_test() {
        let builder = feed(&[
            "=== RUN   TestA",
            "stray line one",
            "stray line two",
            "--- FAIL: TestA (0.10s)",
        ]);
        let test = &builder.tests()[0];
        assert_eq!(test.output, strings(&["stray line one", "stray line two"]));
        assert!(builder.buffered_output().is_empty());
    }

    #[test]
    fn test_fail_and_skip_clear_phase_text() {
        let builder = feed(&[
            "=== RUN   TestA",
            "provider log",
            "--- FAIL: TestA (0.10s)",
            "=== RUN   TestB",
            "provider log",
            "--- SKIP: TestB (0.00s)",
            "\tskipped because reasons",
        ]);
        for test in builder.tests() {
            assert!(test.create_text.is_empty(), "{} create text", test.name);
            assert!(test.destroy_text.is_empty(), "{} destroy text", test.name);
        }
        assert_eq!(
            builder.tests()[1].output,
            strings(&["skipped because reasons"])
        );
    }

    #[test]
    fn test_destroy_marker_switches_phase() {
        let builder = feed(&[
            "=== RUN   TestAcc",
            "create log",
            "2020/01/02 10:00:00 [WARN] Test: Executing destroy step",
            "destroy log",
        ]);
        let test = &builder.tests()[0];
        assert_eq!(test.create_text, strings(&["=== RUN   TestAcc", "create log"]));
        assert_eq!(
            test.destroy_text,
            strings(&[
                "2020/01/02 10:00:00 [WARN] Test: Executing destroy step",
                "destroy log"
            ])
        );
    }

    #[test]
    fn test_next_test_restarts_in_create_phase() {
        let builder = feed(&[
            "=== RUN   TestOne",
            "2020/01/02 10:00:00 [WARN] Test: Executing destroy step",
            "=== RUN   TestTwo",
            "create log",
        ]);
        assert_eq!(
            builder.tests()[1].create_text,
            strings(&["=== RUN   TestTwo", "create log"])
        );
    }

    #[test]
    fn test_build_capture_stops_at_next_test() {
        let mut builder = feed(&["# github.com/acme/broken", "./x.go:3: undefined: y"]);
        assert_eq!(builder.captured_package(), Some("github.com/acme/broken"));
        builder.push_line("=== RUN   TestA");
        assert_eq!(builder.captured_package(), None);
    }

    #[test]
    fn test_tab_output_is_captured_while_building() {
        let builder = feed(&["# pkg", "\tnote: see above", "FAIL\tpkg [build failed]"]);
        let package = &builder.packages()[0];
        assert_eq!(package.tests[0].name, "[build failed]");
        assert_eq!(package.tests[0].output, strings(&["\tnote: see above"]));
    }

    #[test]
    fn test_summary_stops_buffering() {
        let builder = feed(&["=== RUN   TestA", "PASS", "trailing noise"]);
        assert!(builder.buffered_output().is_empty());
    }

    #[test]
    fn test_failed_package_without_tests_gets_failure_test() {
        let builder = feed(&["panic: init failed", "FAIL\tpkg\t0.01s"]);
        let package = &builder.packages()[0];
        assert_eq!(package.tests.len(), 1);
        assert_eq!(package.tests[0].name, FAILURE_TEST_NAME);
        assert_eq!(package.tests[0].output, strings(&["panic: init failed"]));
        assert!(builder.buffered_output().is_empty());
    }

    #[test]
    fn test_package_result_resets_state() {
        let mut builder = feed(&[
            "=== RUN   TestA",
            "--- PASS: TestA (1.00s)",
            "coverage: 50.0% of statements",
            "ok  \tpkg\t1.00s",
        ]);
        assert!(builder.tests().is_empty());
        assert_eq!(builder.current_test(), "");
        assert_eq!(builder.packages()[0].coverage_pct, "50.0");

        builder.push_line("=== RUN   TestB");
        let report = builder.finish("fallback");
        assert_eq!(report.packages.len(), 2);
        assert_eq!(report.packages[1].coverage_pct, "");
        assert_eq!(report.packages[1].time, 0.0);
    }

    #[test]
    fn test_package_result_resets_summary() {
        let builder = feed(&[
            "=== RUN   TestA",
            "--- PASS: TestA (0.10s)",
            "PASS",
            "ok  \ta\t0.10s",
            "panic: init boom",
            "FAIL\tb\t0.01s",
        ]);
        let package = &builder.packages()[1];
        assert_eq!(package.name, "b");
        assert_eq!(package.tests.len(), 1);
        assert_eq!(package.tests[0].name, FAILURE_TEST_NAME);
        assert_eq!(package.tests[0].output, strings(&["panic: init boom"]));
    }

    #[test]
    fn test_build_failure_with_tests_synthesizes_nothing() {
        let builder = feed(&[
            "# pkg",
            "./x.go:3: undefined: y",
            "=== RUN   TestA",
            "--- PASS: TestA (0.10s)",
            "FAIL\tpkg [build failed]",
        ]);
        let package = &builder.packages()[0];
        assert_eq!(package.tests.len(), 1);
        assert_eq!(package.tests[0].name, "TestA");
        assert_eq!(package.tests[0].outcome, TestOutcome::Pass);
    }

    #[test]
    fn test_status_for_unknown_test_is_ignored() {
        let mut builder = feed(&["=== RUN   TestA", "stray line"]);
        builder.on_test_status(TestOutcome::Pass, "TestMissing", 1.0);

        assert_eq!(builder.tests().len(), 1);
        assert_eq!(builder.tests()[0].outcome, TestOutcome::Fail);
        assert_eq!(builder.current_test(), "TestMissing");
        assert_eq!(builder.buffered_output(), strings(&["stray line"]).as_slice());
    }

    #[test]
    fn test_finish_without_packages_uses_fallback() {
        let builder = feed(&[
            "=== RUN   TestA",
            "--- PASS: TestA (1.25s)",
            "=== RUN   TestB",
            "--- FAIL: TestB (0.50s)",
        ]);
        let report = builder.finish("compiled");
        assert_eq!(report.packages.len(), 1);
        assert_eq!(report.packages[0].name, "compiled");
        assert_eq!(report.packages[0].time, 1.75);
    }

    #[test]
    fn test_finish_skips_empty_trailing_package() {
        let builder = feed(&["=== RUN   TestA", "--- PASS: TestA (1.00s)", "ok  \tpkg\t1.00s"]);
        let report = builder.finish("");
        assert_eq!(report.packages.len(), 1);
    }

    #[test]
    fn test_finish_on_empty_input() {
        let report = ReportBuilder::new(PhaseAnalyzer::default()).finish("pkg");
        assert_eq!(report.packages.len(), 1);
        assert!(report.packages[0].tests.is_empty());
    }
}
