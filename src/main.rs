use clap::{Parser, Subcommand};
use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use sheet_pilot::config;
use sheet_pilot::engine::{ActionStep, CheckOutcome, WaitPolicy, run_book};
use sheet_pilot::page::MockPage;
use sheet_pilot::source::CaseBook;

/// Sheet Pilot - data-driven UI test execution from spreadsheet test cases
#[derive(Parser, Debug)]
#[command(
    name = "sheet-pilot",
    about = "Run spreadsheet-described UI test cases and write verdicts back into the sheet",
    after_help = "ENVIRONMENT VARIABLES:\n\
        SHEET_PILOT_POLL_MS        Verification poll interval (ms)\n\
        SHEET_PILOT_PAGE_FIXTURE   Page fixture for offline runs"
)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run every test case in a sheet against a scripted page fixture
    Run {
        /// Path to the .xlsx case sheet (verdicts are written back in place)
        #[arg(short, long)]
        sheet: PathBuf,

        /// JSON page fixture describing the scripted page
        /// (default: SHEET_PILOT_PAGE_FIXTURE or ./page.json)
        #[arg(short, long)]
        page: Option<PathBuf>,

        /// Poll interval for the verification wait, in milliseconds
        /// (default: SHEET_PILOT_POLL_MS or 250)
        #[arg(long)]
        poll_ms: Option<u64>,

        /// Output the run report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Decode the action plan for every row without executing anything
    Plan {
        /// Path to the .xlsx case sheet
        #[arg(short, long)]
        sheet: PathBuf,

        /// Output the decoded plans as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    match args.command {
        Some(Commands::Run { sheet, page, poll_ms, json }) => {
            let page = page.unwrap_or_else(|| PathBuf::from(&config::get().page_fixture));
            let poll = poll_ms.map_or_else(config::poll_interval, Duration::from_millis);

            let mut book = CaseBook::open(&sheet)?;
            let mut driver = MockPage::from_fixture(&page)?;
            let wait = WaitPolicy::with_poll(poll);

            let report = run_book(&mut driver, &mut book, wait)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for case in &report.cases {
                    println!(
                        "Test {} executed (row {}). Check: {}. Passed: {}",
                        case.case_id,
                        case.row,
                        describe_check(&case.check),
                        case.passed
                    );
                }
                println!(
                    "Run completed: {} processed, {} passed, {} failed, {} skipped",
                    report.processed, report.passed, report.failed, report.skipped
                );
                println!("Verdicts written to {}", sheet.display());
            }
        }

        Some(Commands::Plan { sheet, json }) => {
            let book = CaseBook::open(&sheet)?;

            if json {
                let plans: Vec<serde_json::Value> = book
                    .rows()
                    .map(|record| {
                        serde_json::json!({
                            "row": record.row,
                            "case_id": record.case_id,
                            "steps": ActionStep::plan(&record.locators, &record.inputs),
                            "expected_locator": record.expected_locator,
                            "expected_value": record.expected_value,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&plans)?);
            } else {
                for record in book.rows() {
                    if record.case_id.is_empty() {
                        println!("Row {}: skipped (empty test case ID)", record.row);
                        continue;
                    }
                    let plan = ActionStep::plan(&record.locators, &record.inputs);
                    println!("Row {} [{}]: {} action(s)", record.row, record.case_id, plan.len());
                    for step in &plan {
                        match &step.input {
                            Some(value) => println!("  set   {} = {:?}", step.locator, value),
                            None => println!("  click {}", step.locator),
                        }
                    }
                    if !record.expected_locator.is_empty() {
                        println!(
                            "  verify {} contains {:?}",
                            record.expected_locator, record.expected_value
                        );
                    }
                }
            }
        }

        None => {
            println!("Sheet Pilot - data-driven UI test execution from spreadsheet test cases");
            println!();
            println!("Usage: sheet-pilot <COMMAND>");
            println!();
            println!("Commands:");
            println!("  run   Run a case sheet against a scripted page and write verdicts back");
            println!("  plan  Decode each row's action plan without executing anything");
            println!();
            println!("Run with --help for more information.");
        }
    }

    Ok(())
}

fn describe_check(check: &CheckOutcome) -> String {
    match check {
        CheckOutcome::Matched { actual } => format!("matched (actual: {:?})", actual),
        CheckOutcome::Mismatched { actual } => format!("no match (actual: {:?})", actual),
        CheckOutcome::TimedOut => "timed out".to_string(),
        CheckOutcome::Skipped => "not verified".to_string(),
    }
}
