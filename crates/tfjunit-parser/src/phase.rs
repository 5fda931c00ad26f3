// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Provisioning phase analysis
//!
//! A passing acceptance test's raw log lines are split into a create section
//! and a destroy section while parsing. This module times the steps inside
//! each section:
//!
//! - scanning starts at the first `Step plan: DIFF:` marker
//! - `CREATE|UPDATE|DESTROY: <resource>` lines add to the step in progress
//! - a `GraphTypeApply` graph build starts the timed phase
//! - `GraphTypePlan` (create) or `GraphTypePlanDestroy` (destroy) ends it
//!
//! Step durations are whole seconds taken from the log timestamps.

use crate::classify::{
    is_diff_start, is_graph_apply, is_graph_plan, is_graph_plan_destroy, parse_log_timestamp,
    resource_action,
};
use crate::diagnostics::{Diagnostics, NoopDiagnostics};
use crate::report::{PhaseWarning, ResourceTime, Test};
use std::fmt;

/// Times the create and destroy phases of passing tests
pub struct PhaseAnalyzer {
    diagnostics: Box<dyn Diagnostics>,
}

impl PhaseAnalyzer {
    /// Create an analyzer that reports timings to the given sink
    #[must_use]
    pub fn new(diagnostics: impl Diagnostics + 'static) -> Self {
        Self {
            diagnostics: Box::new(diagnostics),
        }
    }

    /// Fill in the step sequences and derived durations of a test
    ///
    /// Uses the test's raw create and destroy text and its reported duration.
    /// Anything previously derived is replaced.
    pub fn analyze(&self, test: &mut Test) {
        let mut warnings = Vec::new();
        test.steps = scan_section(&test.create_text, is_graph_plan, &mut warnings);
        test.cleanup = scan_section(&test.destroy_text, is_graph_plan_destroy, &mut warnings);

        test.create_time = test.steps.iter().map(|rt| rt.duration).sum();
        test.create_destroy_time = test.create_time + test.destroy_time();
        test.overhead = test.time - test.create_destroy_time;

        for warning in &warnings {
            tracing::warn!(test = %test.name, "{warning}");
        }
        test.warnings.extend(warnings);

        tracing::debug!(
            test = %test.name,
            steps = test.steps.len(),
            cleanup = test.cleanup.len(),
            "Analyzed provisioning phases"
        );
        self.diagnostics.test_timings(test);
    }
}

impl Default for PhaseAnalyzer {
    fn default() -> Self {
        Self::new(NoopDiagnostics)
    }
}

impl fmt::Debug for PhaseAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhaseAnalyzer").finish_non_exhaustive()
    }
}

/// Collect the timed steps of one section
fn scan_section(
    lines: &[String],
    is_phase_end: fn(&str) -> bool,
    warnings: &mut Vec<PhaseWarning>,
) -> Vec<ResourceTime> {
    let mut steps = Vec::new();
    let Some(first_diff) = lines.iter().position(|l| is_diff_start(l)) else {
        return steps;
    };

    let mut current = ResourceTime::default();
    let mut i = first_diff;
    while i < lines.len() {
        let line = lines[i].as_str();
        if let Some((action, resource)) = resource_action(line) {
            current.add_action(action);
            current.add_resource(resource);
        } else if is_diff_start(line) {
            current = ResourceTime::default();
        } else if is_graph_apply(line) {
            let end = (i + 1..lines.len()).find(|&x| is_phase_end(&lines[x]));
            if let Some(end) = end {
                current.duration = phase_duration(line, &lines[end], &current, warnings);
                steps.push(std::mem::take(&mut current));
                i = end;
            }
        }
        i += 1;
    }

    steps
}

/// Seconds between two marker lines, zero when either timestamp is unusable
fn phase_duration(
    start_line: &str,
    end_line: &str,
    step: &ResourceTime,
    warnings: &mut Vec<PhaseWarning>,
) -> f64 {
    let start = parse_log_timestamp(start_line);
    let end = parse_log_timestamp(end_line);
    let (Some(start), Some(end)) = (start, end) else {
        for (line, parsed) in [(start_line, start.is_some()), (end_line, end.is_some())] {
            if !parsed {
                warnings.push(PhaseWarning::InvalidTimestamp {
                    line: line.to_string(),
                });
            }
        }
        return 0.0;
    };

    let seconds = (end - start).num_milliseconds() as f64 / 1000.0;
    if seconds < 0.0 {
        warnings.push(PhaseWarning::NegativeDuration {
            resource_name: step.resource_name.clone(),
            seconds: -seconds,
        });
        return 0.0;
    }
    seconds
}
