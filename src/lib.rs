//! Sheet Pilot - data-driven UI test execution from spreadsheet test cases.
//!
//! This crate provides:
//! - A case source over `.xlsx` workbooks with verdict write-back
//! - A row-to-action interpreter with per-step fault isolation
//! - A bounded verification wait with substring matching
//! - A page-driver seam with an in-memory mock for tests and offline runs
//!
//! # Example
//!
//! ```rust,no_run
//! use sheet_pilot::{CaseBook, MockPage, WaitPolicy, run_book};
//!
//! let mut book = CaseBook::open("cases.xlsx")?;
//! let mut page = MockPage::from_fixture("page.json")?;
//! let report = run_book(&mut page, &mut book, WaitPolicy::default())?;
//! println!("{} passed, {} failed", report.passed, report.failed);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod engine;
pub mod page;
pub mod source;

// Re-export engine types
pub use engine::{
    ActionStep, CaseReport, CheckOutcome, DEFAULT_POLL_INTERVAL, RunReport, StepOutcome,
    VERIFY_TIMEOUT, WaitPolicy, run_book, run_case, wait_for_match,
};

// Re-export page seam
pub use page::{AppliedAction, MockElement, MockPage, PageDriver, PageError, PageResult};

// Re-export case source
pub use source::{CaseBook, SourceError, SourceResult, TestCaseRecord, verdict_label};
