// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Line classification
//!
//! Stateless matchers that sort a single line of `go test -v` output into one
//! of a fixed set of kinds. Patterns are compiled once and shared by every
//! parse. The builder decides what a classified line means given its state.
//!
//! Provisioning markers come from Terraform acceptance test logs (`TF_LOG`)
//! and are matched separately, since every line is also routed to the current
//! test's create or destroy buffer regardless of its kind.

use crate::report::{ResourceAction, TestOutcome};
use chrono::{DateTime, FixedOffset};
use once_cell::sync::Lazy;
use regex::Regex;

/// Offset assumed for provisioning log timestamps, which carry no zone
pub const LOG_UTC_OFFSET: &str = "+08:00";

const TEST_START_PREFIX: &str = "=== RUN ";
const BUILD_HEADER_PREFIX: &str = "# ";

static STATUS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*--- (PASS|FAIL|SKIP): (.+) \((\d+\.\d+)(?: seconds|s)\)$").unwrap()
});
static COVERAGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^coverage:\s+(\d+\.\d+)%\s+of\s+statements(?:\sin\s.+)?$").unwrap()
});
static RESULT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(ok|FAIL)\s+([^ ]+)\s+(?:(\d+\.\d+)s|(\[\w+ failed\]))(?:\s+coverage:\s+(\d+\.\d+)%\sof\sstatements(?:\sin\s.+)?)?$",
    )
    .unwrap()
});
static OUTPUT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:    )*\t(.*)$").unwrap());
static SUMMARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:PASS|FAIL|SKIP)$").unwrap());
static TIMESTAMP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4})/(\d{2})/(\d{2})\s(\d{2}):(\d{2}):(\d{2})").unwrap());

static DESTROY_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}/\d{2}/\d{2}.\d{2}:\d{2}:\d{2}.\SWARN\S.Test:.Executing.destroy.step")
        .unwrap()
});
static DIFF_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}/\d{2}/\d{2}.\d{2}:\d{2}:\d{2}.\SWARN\S.Test: Step plan: DIFF:").unwrap()
});
static RESOURCE_ACTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(CREATE|UPDATE|DESTROY):.(.*)").unwrap());
static GRAPH_APPLY: Lazy<Regex> = Lazy::new(|| graph_marker("GraphTypeApply"));
static GRAPH_PLAN: Lazy<Regex> = Lazy::new(|| graph_marker("GraphTypePlan"));
static GRAPH_PLAN_DESTROY: Lazy<Regex> = Lazy::new(|| graph_marker("GraphTypePlanDestroy"));

fn graph_marker(graph_type: &str) -> Regex {
    Regex::new(&format!(
        r"^\d{{4}}/\d{{2}}/\d{{2}}.\d{{2}}:\d{{2}}:\d{{2}}.\SINFO\S.terraform:.building.graph:.{graph_type}"
    ))
    .unwrap()
}

/// A `ok|FAIL <package> ...` line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackageResult<'a> {
    /// True for `FAIL`
    pub failed: bool,
    /// Package name
    pub name: &'a str,
    /// Reported duration, zero when absent
    pub time: f64,
    /// `[build failed]`-style reason in place of a duration
    pub build_failure: Option<&'a str>,
    /// Trailing coverage percentage
    pub coverage_pct: Option<&'a str>,
}

/// The kind of a single output line
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Line<'a> {
    /// `=== RUN <name>`
    TestStart {
        /// Test name
        name: &'a str,
    },
    /// Package result line
    PackageResult(PackageResult<'a>),
    /// `--- PASS|FAIL|SKIP: <name> (<d>s)`
    TestStatus {
        /// Reported outcome
        outcome: TestOutcome,
        /// Test name
        name: &'a str,
        /// Reported duration in seconds
        time: f64,
    },
    /// Standalone `coverage: N% of statements`
    Coverage {
        /// Coverage percentage as printed
        pct: &'a str,
    },
    /// Tab-prefixed test output
    Output {
        /// Payload after the indent
        text: &'a str,
    },
    /// `# <package>` build output header
    BuildHeader {
        /// Package whose build output follows
        package: &'a str,
    },
    /// Bare `PASS`, `FAIL` or `SKIP`
    Summary,
    /// Anything else
    Other,
}

type Matcher = for<'a> fn(&'a str) -> Option<Line<'a>>;

/// Matchers in priority order; the first hit wins
const MATCHERS: [Matcher; 7] = [
    test_start,
    package_result,
    test_status,
    coverage,
    output,
    build_header,
    summary,
];

/// Classify a single line
#[must_use]
pub fn classify(line: &str) -> Line<'_> {
    MATCHERS
        .iter()
        .find_map(|matcher| matcher(line))
        .unwrap_or(Line::Other)
}

fn test_start(line: &str) -> Option<Line<'_>> {
    line.strip_prefix(TEST_START_PREFIX)
        .map(|rest| Line::TestStart { name: rest.trim() })
}

fn package_result(line: &str) -> Option<Line<'_>> {
    let caps = RESULT.captures(line)?;
    Some(Line::PackageResult(PackageResult {
        failed: &caps[1] == "FAIL",
        name: caps.get(2).map_or("", |m| m.as_str()),
        time: caps.get(3).map_or(0.0, |m| parse_seconds(m.as_str())),
        build_failure: caps.get(4).map(|m| m.as_str()),
        coverage_pct: caps.get(5).map(|m| m.as_str()),
    }))
}

fn test_status(line: &str) -> Option<Line<'_>> {
    let caps = STATUS.captures(line)?;
    let outcome = match &caps[1] {
        "PASS" => TestOutcome::Pass,
        "SKIP" => TestOutcome::Skip,
        _ => TestOutcome::Fail,
    };
    Some(Line::TestStatus {
        outcome,
        name: caps.get(2).map_or("", |m| m.as_str()),
        time: caps.get(3).map_or(0.0, |m| parse_seconds(m.as_str())),
    })
}

fn coverage(line: &str) -> Option<Line<'_>> {
    let caps = COVERAGE.captures(line)?;
    caps.get(1).map(|m| Line::Coverage { pct: m.as_str() })
}

fn output(line: &str) -> Option<Line<'_>> {
    let caps = OUTPUT.captures(line)?;
    caps.get(1).map(|m| Line::Output { text: m.as_str() })
}

fn build_header(line: &str) -> Option<Line<'_>> {
    line.strip_prefix(BUILD_HEADER_PREFIX)
        .map(|package| Line::BuildHeader { package })
}

fn summary(line: &str) -> Option<Line<'_>> {
    SUMMARY.is_match(line).then_some(Line::Summary)
}

/// Parse a duration in seconds, falling back to zero
#[must_use]
pub fn parse_seconds(text: &str) -> f64 {
    text.trim().parse().unwrap_or(0.0)
}

// ============================================================================
// Provisioning markers
// ============================================================================

/// Line announcing the destroy step of a test
#[must_use]
pub fn is_destroy_start(line: &str) -> bool {
    DESTROY_START.is_match(line)
}

/// Line opening a plan diff block
#[must_use]
pub fn is_diff_start(line: &str) -> bool {
    DIFF_START.is_match(line)
}

/// `CREATE|UPDATE|DESTROY: <resource>` line inside a diff block
#[must_use]
pub fn resource_action(line: &str) -> Option<(ResourceAction, &str)> {
    let caps = RESOURCE_ACTION.captures(line)?;
    let action = ResourceAction::from_verb(&caps[1])?;
    Some((action, caps.get(2).map_or("", |m| m.as_str())))
}

/// Graph build for apply, which starts a timed phase
#[must_use]
pub fn is_graph_apply(line: &str) -> bool {
    GRAPH_APPLY.is_match(line)
}

/// Graph build for plan, which ends a create phase
///
/// Also matches the plan-destroy marker, which shares the prefix.
#[must_use]
pub fn is_graph_plan(line: &str) -> bool {
    GRAPH_PLAN.is_match(line)
}

/// Graph build for plan-destroy, which ends a destroy phase
#[must_use]
pub fn is_graph_plan_destroy(line: &str) -> bool {
    GRAPH_PLAN_DESTROY.is_match(line)
}

/// Extract the `YYYY/MM/DD HH:MM:SS` timestamp of a log line
///
/// The timestamp is rewritten to RFC 3339 with [`LOG_UTC_OFFSET`] before
/// parsing. Returns `None` when the line has no such timestamp or it does not
/// name a real instant.
#[must_use]
pub fn parse_log_timestamp(line: &str) -> Option<DateTime<FixedOffset>> {
    let caps = TIMESTAMP.captures(line)?;
    let rfc3339 = format!(
        "{}-{}-{}T{}:{}:{}{}",
        &caps[1], &caps[2], &caps[3], &caps[4], &caps[5], &caps[6], LOG_UTC_OFFSET
    );
    DateTime::parse_from_rfc3339(&rfc3339).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    #[test]
    fn test_classify_test_start() {
        assert_eq!(
            classify("=== RUN   TestFoo  "),
            Line::TestStart { name: "TestFoo" }
        );
    }

    #[test]
    fn test_classify_status_lines() {
        assert_eq!(
            classify("--- PASS: TestA (1.50s)"),
            Line::TestStatus {
                outcome: TestOutcome::Pass,
                name: "TestA",
                time: 1.5
            }
        );
        assert_eq!(
            classify("    --- SKIP: TestA/sub (0.00 seconds)"),
            Line::TestStatus {
                outcome: TestOutcome::Skip,
                name: "TestA/sub",
                time: 0.0
            }
        );
        assert_eq!(
            classify("--- FAIL: TestB (12.03s)"),
            Line::TestStatus {
                outcome: TestOutcome::Fail,
                name: "TestB",
                time: 12.03
            }
        );
    }

    #[test]
    fn test_classify_package_result() {
        assert_eq!(
            classify("ok  \tgithub.com/acme/pkg\t1.50s"),
            Line::PackageResult(PackageResult {
                failed: false,
                name: "github.com/acme/pkg",
                time: 1.5,
                build_failure: None,
                coverage_pct: None,
            })
        );
    }

    #[test]
    fn test_classify_package_result_with_coverage() {
        let line = classify("ok  \tpkg\t0.10s\tcoverage: 81.5% of statements in ./...");
        let Line::PackageResult(result) = line else {
            panic!("expected package result, got {line:?}");
        };
        assert_eq!(result.coverage_pct, Some("81.5"));
    }

    #[test]
    fn test_classify_build_failure() {
        let line = classify("FAIL\tgithub.com/acme/broken [build failed]");
        let Line::PackageResult(result) = line else {
            panic!("expected package result, got {line:?}");
        };
        assert!(result.failed);
        assert_eq!(result.name, "github.com/acme/broken");
        assert_eq!(result.build_failure, Some("[build failed]"));
        assert_eq!(result.time, 0.0);
    }

    #[test]
    fn test_classify_coverage_output_and_summary() {
        assert_eq!(
            classify("coverage: 12.0% of statements"),
            Line::Coverage { pct: "12.0" }
        );
        assert_eq!(
            classify("        \tfoo_test.go:12: boom"),
            Line::Output {
                text: "foo_test.go:12: boom"
            }
        );
        assert_eq!(
            classify("# github.com/acme/broken"),
            Line::BuildHeader {
                package: "github.com/acme/broken"
            }
        );
        assert_eq!(classify("PASS"), Line::Summary);
        assert_eq!(classify("PASS extra"), Line::Other);
        assert_eq!(classify("random log line"), Line::Other);
    }

    #[test]
    fn test_classify_start_beats_later_matchers() {
        // A start marker wins even when the name looks like a status line
        assert_eq!(
            classify("=== RUN --- PASS: X (1.00s)"),
            Line::TestStart {
                name: "--- PASS: X (1.00s)"
            }
        );
    }

    #[test]
    fn test_parse_seconds_falls_back_to_zero() {
        assert_eq!(parse_seconds("2.25"), 2.25);
        assert_eq!(parse_seconds("nope"), 0.0);
    }

    #[test]
    fn test_provisioning_markers() {
        assert!(is_destroy_start(
            "2020/01/02 10:00:00 [WARN] Test: Executing destroy step"
        ));
        assert!(is_diff_start(
            "2020/01/02 10:00:00 [WARN] Test: Step plan: DIFF:"
        ));
        assert_eq!(
            resource_action("CREATE: aws_instance.foo"),
            Some((ResourceAction::Create, "aws_instance.foo"))
        );
        assert_eq!(resource_action("READ: data.foo"), None);

        let plan_destroy =
            "2020/01/02 10:00:05 [INFO] terraform: building graph: GraphTypePlanDestroy";
        assert!(is_graph_plan_destroy(plan_destroy));
        assert!(is_graph_plan(plan_destroy));
        assert!(is_graph_apply(
            "2020/01/02 10:00:05 [INFO] terraform: building graph: GraphTypeApply"
        ));
        assert!(!is_graph_plan_destroy(
            "2020/01/02 10:00:05 [INFO] terraform: building graph: GraphTypePlan"
        ));
    }

    #[test]
    fn test_parse_log_timestamp() {
        let start = parse_log_timestamp("2020/01/02 10:00:00 [INFO] x").expect("valid");
        let end = parse_log_timestamp("2020/01/02 10:00:10 [INFO] y").expect("valid");
        assert_eq!((end - start).num_seconds(), 10);
        assert_eq!(start.offset().local_minus_utc(), 8 * 3600);
    }

    #[test]
    fn test_parse_log_timestamp_rejects_bad_input() {
        assert!(parse_log_timestamp("no timestamp here").is_none());
        assert!(parse_log_timestamp("2020/13/45 10:00:00 [INFO] x").is_none());
    }
}
