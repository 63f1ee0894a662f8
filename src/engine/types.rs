//! Types for decoded action plans and run results.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One decoded page interaction
///
/// A step pairs a locator with an optional input value: `Some` drives a
/// clear-then-set-value action, `None` drives a click.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionStep {
    /// Locator expression resolved against the current page
    pub locator: String,

    /// Value to type into the element; `None` means click
    pub input: Option<String>,
}

impl ActionStep {
    /// Build the action plan for one record by zipping locators with inputs
    ///
    /// Positions past the end of `inputs`, or whose entry is empty, default
    /// to a click. The plan always has one step per locator.
    pub fn plan(locators: &[String], inputs: &[String]) -> Vec<ActionStep> {
        locators
            .iter()
            .enumerate()
            .map(|(i, locator)| ActionStep {
                locator: locator.clone(),
                input: inputs.get(i).filter(|s| !s.is_empty()).cloned(),
            })
            .collect()
    }
}

/// Tagged per-step result
///
/// A failed step is recorded and skipped; it never aborts the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum StepOutcome {
    /// The action was applied to the resolved element
    Applied { step: ActionStep },

    /// The step could not be applied (element not resolved, driver failure)
    Failed { locator: String, error: String },
}

/// Outcome of the optional verification step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CheckOutcome {
    /// Element became visible and its text contained the expected value
    Matched { actual: String },

    /// Element became visible but its text did not contain the expected value
    Mismatched { actual: String },

    /// Element never became visible within the timeout
    TimedOut,

    /// No expected-result locator was given; nothing was verified
    Skipped,
}

impl CheckOutcome {
    /// A case passes only on a matched verification; an unverified case
    /// cannot be asserted true
    pub fn passed(&self) -> bool {
        matches!(self, CheckOutcome::Matched { .. })
    }
}

/// Result of one processed record
#[derive(Debug, Clone, Serialize)]
pub struct CaseReport {
    /// Sheet row the record came from
    pub row: u32,

    /// Test case ID
    pub case_id: String,

    /// Per-step outcomes, one per locator
    pub steps: Vec<StepOutcome>,

    /// Verification outcome
    pub check: CheckOutcome,

    /// The verdict written back to the sheet
    pub passed: bool,
}

/// Result of a complete run over one case sheet
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Records executed (skipped rows excluded)
    pub processed: usize,

    /// Records whose verification matched
    pub passed: usize,

    /// Records that failed verification, timed out, or were not verified
    pub failed: usize,

    /// Rows skipped for an empty test case ID
    pub skipped: usize,

    /// Per-case reports in sheet order
    pub cases: Vec<CaseReport>,

    /// When the run finished
    #[serde(with = "chrono::serde::ts_seconds")]
    pub finished_at: DateTime<Utc>,
}
