pub mod exec;
pub mod types;

pub use exec::{DEFAULT_POLL_INTERVAL, VERIFY_TIMEOUT, WaitPolicy, run_book, run_case, wait_for_match};
pub use types::{ActionStep, CaseReport, CheckOutcome, RunReport, StepOutcome};
