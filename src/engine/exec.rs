//! Record execution: decode, drive the page, verify, aggregate verdicts.
//!
//! Fault isolation is layered: a step that cannot be applied is logged and
//! skipped, a verification that never sees its element times out to a false
//! verdict, and only storage errors escape [`run_book`].

use std::time::{Duration, Instant};

use chrono::Utc;

use super::types::{ActionStep, CaseReport, CheckOutcome, RunReport, StepOutcome};
use crate::page::{PageDriver, PageResult};
use crate::source::{CaseBook, SourceResult, TestCaseRecord};

/// Fixed upper bound on the verification wait, per record
pub const VERIFY_TIMEOUT: Duration = Duration::from_secs(10);

/// Default re-check interval while waiting for the expected-result element
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Timing of the verification wait
///
/// The default is the production policy: a fixed 10 second deadline with a
/// 250 ms poll. A single timeout is final; the wait is never retried.
#[derive(Debug, Clone, Copy)]
pub struct WaitPolicy {
    pub timeout: Duration,
    pub poll: Duration,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            timeout: VERIFY_TIMEOUT,
            poll: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl WaitPolicy {
    /// Production timeout with a custom poll interval
    pub fn with_poll(poll: Duration) -> Self {
        Self {
            poll,
            ..Self::default()
        }
    }
}

/// Execute one record against the page and compute its verdict
///
/// The caller is expected to have filtered out records with an empty case ID;
/// this function always executes and always produces a report.
pub fn run_case(page: &mut dyn PageDriver, record: &TestCaseRecord, wait: WaitPolicy) -> CaseReport {
    let plan = ActionStep::plan(&record.locators, &record.inputs);

    if !record.inputs.is_empty() && record.locators.len() != record.inputs.len() {
        eprintln!(
            "Warning: number of locators and inputs do not match in row {}.",
            record.row
        );
    }

    let mut steps = Vec::with_capacity(plan.len());
    for step in plan {
        match apply_step(page, &step) {
            Ok(()) => steps.push(StepOutcome::Applied { step }),
            Err(e) => {
                eprintln!(
                    "Warning: row {} case {}: step skipped for locator '{}': {}",
                    record.row, record.case_id, step.locator, e
                );
                steps.push(StepOutcome::Failed {
                    locator: step.locator,
                    error: e.to_string(),
                });
            }
        }
    }

    let check = if record.expected_locator.is_empty() {
        CheckOutcome::Skipped
    } else {
        wait_for_match(page, &record.expected_locator, &record.expected_value, wait)
    };

    if let CheckOutcome::TimedOut = check {
        eprintln!(
            "Warning: row {} case {}: expected-result element '{}' not visible within {:.1}s",
            record.row,
            record.case_id,
            record.expected_locator,
            wait.timeout.as_secs_f32()
        );
    }

    let passed = check.passed();
    CaseReport {
        row: record.row,
        case_id: record.case_id.clone(),
        steps,
        check,
        passed,
    }
}

fn apply_step(page: &mut dyn PageDriver, step: &ActionStep) -> PageResult<()> {
    match &step.input {
        Some(value) => page.set_value(&step.locator, value),
        None => page.click(&step.locator),
    }
}

/// Poll for the expected-result element to become visible, then compare its
/// trimmed text against the expected substring
///
/// Not-present and present-but-hidden are treated alike: both keep polling
/// until the deadline. The text is compared once, on the first poll that sees
/// the element; a mismatch is not retried.
pub fn wait_for_match(
    page: &mut dyn PageDriver,
    locator: &str,
    expected: &str,
    wait: WaitPolicy,
) -> CheckOutcome {
    let deadline = Instant::now() + wait.timeout;
    loop {
        if let Ok(true) = page.is_visible(locator) {
            if let Ok(text) = page.text(locator) {
                let actual = text.trim().to_string();
                return if actual.contains(expected) {
                    CheckOutcome::Matched { actual }
                } else {
                    CheckOutcome::Mismatched { actual }
                };
            }
        }
        if Instant::now() >= deadline {
            return CheckOutcome::TimedOut;
        }
        std::thread::sleep(wait.poll);
    }
}

/// Process every data row of the case book, record verdicts, commit them
///
/// Rows with an empty case ID are skipped without touching the page or the
/// sheet. Each processed record ends with a page reset so residual UI state
/// cannot leak into the next one. Only storage errors escape; everything
/// recoverable is absorbed into the per-case reports.
pub fn run_book(
    page: &mut dyn PageDriver,
    book: &mut CaseBook,
    wait: WaitPolicy,
) -> SourceResult<RunReport> {
    let records: Vec<TestCaseRecord> = book.rows().collect();

    let mut cases = Vec::new();
    let mut skipped = 0;

    for record in &records {
        if record.case_id.is_empty() {
            eprintln!("Test case ID is empty in row {}. Skipping this row.", record.row);
            skipped += 1;
            continue;
        }

        let case = run_case(page, record, wait);
        book.record_verdict(record.row, case.passed);
        cases.push(case);

        if let Err(e) = page.reset() {
            eprintln!("Warning: page reset failed after row {}: {}", record.row, e);
        }
    }

    book.commit()?;

    let passed = cases.iter().filter(|c| c.passed).count();
    Ok(RunReport {
        processed: cases.len(),
        passed,
        failed: cases.len() - passed,
        skipped,
        cases,
        finished_at: Utc::now(),
    })
}
