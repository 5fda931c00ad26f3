//! Report types produced by the parser
//!
//! A [`Report`] is built once per parse and is not mutated afterwards. All
//! durations are `f64` seconds, including the phase timings derived from
//! provisioning log timestamps.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A collection of package results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Packages in the order their results were seen
    pub packages: Vec<Package>,
}

impl Report {
    /// Count failed tests across all packages
    #[must_use]
    pub fn failures(&self) -> usize {
        self.packages.iter().map(Package::failures).sum()
    }

    /// Count all tests across all packages
    #[must_use]
    pub fn test_count(&self) -> usize {
        self.packages.iter().map(|p| p.tests.len()).sum()
    }

    /// True when no package was reported
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

/// The results of a single test binary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Package {
    /// Package name, empty when neither a result line nor a fallback name was available
    pub name: String,
    /// Total duration in seconds
    pub time: f64,
    /// Coverage percentage as printed, empty if not reported
    pub coverage_pct: String,
    /// Tests in the order they started
    pub tests: Vec<Test>,
}

impl Package {
    /// Count failed tests
    #[must_use]
    pub fn failures(&self) -> usize {
        self.tests
            .iter()
            .filter(|t| t.outcome == TestOutcome::Fail)
            .count()
    }

    /// Count skipped tests
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.tests
            .iter()
            .filter(|t| t.outcome == TestOutcome::Skip)
            .count()
    }
}

/// Possible test outcomes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TestOutcome {
    /// Test passed
    Pass,
    /// Test failed, or never reported a status
    #[default]
    Fail,
    /// Test was skipped
    Skip,
}

/// A single test case and its timing breakdown
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Test {
    /// Test name
    pub name: String,
    /// Test outcome
    pub outcome: TestOutcome,
    /// Duration reported by the status line, in seconds
    pub time: f64,
    /// Sum of all create step durations
    pub create_time: f64,
    /// Sum of all create and destroy step durations
    pub create_destroy_time: f64,
    /// Reported duration minus `create_destroy_time`
    pub overhead: f64,
    /// Test output lines
    pub output: Vec<String>,
    /// Raw lines seen before the destroy step started
    pub create_text: Vec<String>,
    /// Raw lines seen from the destroy step onwards
    pub destroy_text: Vec<String>,
    /// Timed create steps
    pub steps: Vec<ResourceTime>,
    /// Timed destroy steps
    pub cleanup: Vec<ResourceTime>,
    /// Problems found while timing phases
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<PhaseWarning>,
    /// Set once a status line has been applied
    #[serde(skip)]
    pub(crate) resolved: bool,
}

impl Test {
    /// Create a test that has started but not yet reported a status
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Create a failed test carrying the given output
    #[must_use]
    pub fn failure(name: impl Into<String>, output: Vec<String>) -> Self {
        Self {
            name: name.into(),
            outcome: TestOutcome::Fail,
            output,
            resolved: true,
            ..Default::default()
        }
    }

    /// Check if the test passed
    #[must_use]
    pub fn passed(&self) -> bool {
        self.outcome == TestOutcome::Pass
    }

    /// Check if the test failed
    #[must_use]
    pub fn failed(&self) -> bool {
        self.outcome == TestOutcome::Fail
    }

    /// Drop the raw phase buffers
    pub fn clear_phase_text(&mut self) {
        self.create_text.clear();
        self.destroy_text.clear();
    }

    /// Duration of all destroy steps
    #[must_use]
    pub fn destroy_time(&self) -> f64 {
        self.cleanup.iter().map(|rt| rt.duration).sum()
    }
}

/// What a provisioning step did to a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResourceAction {
    /// Resource was created
    Create,
    /// Resource was updated in place
    Update,
    /// Resource was destroyed
    Destroy,
}

impl ResourceAction {
    /// Parse an action verb, ignoring case
    #[must_use]
    pub fn from_verb(verb: &str) -> Option<Self> {
        match verb.to_ascii_lowercase().as_str() {
            "create" => Some(Self::Create),
            "update" => Some(Self::Update),
            "destroy" => Some(Self::Destroy),
            _ => None,
        }
    }

    /// Upper-case verb as printed in plan diffs
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Destroy => "DESTROY",
        }
    }
}

impl std::fmt::Display for ResourceAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One timed diff block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceTime {
    /// Affected resources, joined with `", "`
    pub resource_name: String,
    /// Distinct actions in first-seen order
    pub actions: Vec<ResourceAction>,
    /// Phase duration in seconds, never negative
    pub duration: f64,
}

impl ResourceTime {
    /// Record an action unless it is already present
    pub fn add_action(&mut self, action: ResourceAction) {
        if !self.actions.contains(&action) {
            self.actions.push(action);
        }
    }

    /// Append a resource identifier to the name list
    pub fn add_resource(&mut self, resource: &str) {
        if self.resource_name.is_empty() {
            self.resource_name = resource.to_string();
        } else {
            self.resource_name.push_str(", ");
            self.resource_name.push_str(resource);
        }
    }

    /// True when no action or resource has been recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty() && self.resource_name.is_empty()
    }
}

/// A problem found while timing a provisioning phase
///
/// Warnings never abort analysis; the affected step is timed as zero seconds.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PhaseWarning {
    /// A phase marker's timestamp could not be parsed
    #[error("unparseable timestamp in phase marker: {line}")]
    InvalidTimestamp {
        /// The marker line
        line: String,
    },

    /// A phase ended before it started
    #[error("phase for '{resource_name}' ends {seconds}s before it starts")]
    NegativeDuration {
        /// Resources of the affected step
        resource_name: String,
        /// How far the end precedes the start
        seconds: f64,
    },
}
