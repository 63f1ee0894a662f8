//! Case Source: test cases stored as rows of an `.xlsx` workbook.
//!
//! The first worksheet holds one test case per row, six fixed columns, with
//! row 1 reserved for headers. Verdicts are staged in memory and written back
//! into the result column by [`CaseBook::commit`], which replaces the file
//! atomically so a failed write never corrupts the original.

use std::collections::BTreeMap;
use std::path::PathBuf;

use umya_spreadsheet::{Spreadsheet, Worksheet, reader, writer};

/// Column layout of the case sheet (1-based, fixed order)
pub const COL_CASE_ID: u32 = 1;
pub const COL_LOCATORS: u32 = 2;
pub const COL_INPUTS: u32 = 3;
pub const COL_EXPECTED_LOCATOR: u32 = 4;
pub const COL_EXPECTED_VALUE: u32 = 5;
pub const COL_RESULT: u32 = 6;

/// First data row; row 1 holds the column headers
pub const FIRST_DATA_ROW: u32 = 2;

/// Result type for case source operations
pub type SourceResult<T> = Result<T, SourceError>;

/// Error types for case source operations
///
/// Both variants are fatal for a run: a sheet that cannot be read or written
/// leaves nothing meaningful to execute or persist.
#[derive(Debug)]
pub enum SourceError {
    /// The workbook could not be opened or has no first worksheet
    Open { path: PathBuf, message: String },

    /// Staged verdicts could not be persisted; the original file is untouched
    Persist { path: PathBuf, message: String },
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceError::Open { path, message } => {
                write!(f, "failed to open case sheet '{}': {}", path.display(), message)
            }
            SourceError::Persist { path, message } => {
                write!(f, "failed to persist case sheet '{}': {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for SourceError {}

/// One spreadsheet row, read as trimmed strings
///
/// `row` is the record's identity for verdict write-back; records themselves
/// live only for one pass over the sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCaseRecord {
    /// 1-based sheet row (>= 2; row 1 is the header)
    pub row: u32,

    /// Test case ID; empty means the row is skipped entirely
    pub case_id: String,

    /// Locator expressions, in action order
    pub locators: Vec<String>,

    /// Input values, positional with `locators`; may be shorter
    pub inputs: Vec<String>,

    /// Locator of the element carrying the verification result; empty means
    /// no verification
    pub expected_locator: String,

    /// Substring expected in the verification element's text
    pub expected_value: String,
}

/// Split a `;`-delimited cell into trimmed entries
///
/// A blank cell yields no entries. Interior empty entries are preserved so
/// positions stay aligned between the locator and input lists.
fn split_list(cell: &str) -> Vec<String> {
    if cell.trim().is_empty() {
        return Vec::new();
    }
    cell.split(';').map(|s| s.trim().to_string()).collect()
}

/// An open case sheet with staged verdicts
#[derive(Debug)]
pub struct CaseBook {
    path: PathBuf,
    book: Spreadsheet,
    staged: BTreeMap<u32, bool>,
}

impl CaseBook {
    /// Open the workbook at `path`
    pub fn open(path: impl Into<PathBuf>) -> SourceResult<Self> {
        let path = path.into();
        let book = reader::xlsx::read(&path).map_err(|e| SourceError::Open {
            path: path.clone(),
            message: e.to_string(),
        })?;
        if book.get_sheet(&0).is_none() {
            return Err(SourceError::Open {
                path,
                message: "workbook has no worksheets".to_string(),
            });
        }
        Ok(Self {
            path,
            book,
            staged: BTreeMap::new(),
        })
    }

    fn sheet(&self) -> &Worksheet {
        self.book.get_sheet(&0).expect("first worksheet checked at open")
    }

    /// Highest populated row of the first worksheet
    pub fn row_count(&self) -> u32 {
        self.sheet().get_highest_row()
    }

    /// One pass over the data rows, in sheet order
    pub fn rows(&self) -> impl Iterator<Item = TestCaseRecord> + '_ {
        (FIRST_DATA_ROW..=self.row_count()).map(|row| self.record(row))
    }

    fn cell(&self, col: u32, row: u32) -> String {
        self.sheet().get_value((col, row)).trim().to_string()
    }

    fn record(&self, row: u32) -> TestCaseRecord {
        TestCaseRecord {
            row,
            case_id: self.cell(COL_CASE_ID, row),
            locators: split_list(&self.sheet().get_value((COL_LOCATORS, row))),
            inputs: split_list(&self.sheet().get_value((COL_INPUTS, row))),
            expected_locator: self.cell(COL_EXPECTED_LOCATOR, row),
            expected_value: self.cell(COL_EXPECTED_VALUE, row),
        }
    }

    /// Stage a verdict for `row`; storage is not touched until [`commit`](Self::commit)
    pub fn record_verdict(&mut self, row: u32, passed: bool) {
        self.staged.insert(row, passed);
    }

    /// Write all staged verdicts into the result column and persist the file
    ///
    /// The workbook is serialized to a sibling temp file and renamed over the
    /// original, so a failure leaves the original untouched. The staged set
    /// is kept; committing again rewrites the same content.
    pub fn commit(&mut self) -> SourceResult<()> {
        let sheet = self
            .book
            .get_sheet_mut(&0)
            .expect("first worksheet checked at open");
        for (&row, &passed) in &self.staged {
            sheet.get_cell_mut((COL_RESULT, row)).set_value_string(verdict_label(passed));
        }

        let tmp = self.path.with_extension("xlsx.tmp");
        writer::xlsx::write(&self.book, &tmp).map_err(|e| SourceError::Persist {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|e| {
            let _ = std::fs::remove_file(&tmp);
            SourceError::Persist {
                path: self.path.clone(),
                message: e.to_string(),
            }
        })
    }
}

/// Literal written to the result column
pub fn verdict_label(passed: bool) -> &'static str {
    if passed { "True" } else { "False" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    fn write_sheet(path: &Path, rows: &[[&str; 5]]) {
        let mut book = umya_spreadsheet::new_file();
        let sheet = book.get_sheet_mut(&0).unwrap();
        for (col, header) in ["ID", "Locators", "Inputs", "Expected", "Value", "Result"]
            .iter()
            .enumerate()
        {
            sheet.get_cell_mut((col as u32 + 1, 1)).set_value(*header);
        }
        for (i, row) in rows.iter().enumerate() {
            for (col, value) in row.iter().enumerate() {
                sheet
                    .get_cell_mut((col as u32 + 1, i as u32 + FIRST_DATA_ROW))
                    .set_value(*value);
            }
        }
        writer::xlsx::write(&book, path).unwrap();
    }

    #[test]
    fn test_open_missing_file_fails() {
        let err = CaseBook::open("/nonexistent/cases.xlsx").unwrap_err();
        assert!(matches!(err, SourceError::Open { .. }));
        assert!(err.to_string().contains("/nonexistent/cases.xlsx"));
    }

    #[test]
    fn test_rows_skip_header_and_trim_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cases.xlsx");
        write_sheet(
            &path,
            &[[" TC1 ", " //a ; //b ", " hello ", " //r ", " OK "]],
        );

        let book = CaseBook::open(&path).unwrap();
        let records: Vec<_> = book.rows().collect();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.row, 2);
        assert_eq!(record.case_id, "TC1");
        assert_eq!(record.locators, vec!["//a".to_string(), "//b".to_string()]);
        assert_eq!(record.inputs, vec!["hello".to_string()]);
        assert_eq!(record.expected_locator, "//r");
        assert_eq!(record.expected_value, "OK");
    }

    #[test]
    fn test_blank_cells_read_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cases.xlsx");
        write_sheet(&path, &[["TC1", "", "", "", ""]]);

        let book = CaseBook::open(&path).unwrap();
        let record = book.rows().next().unwrap();
        assert!(record.locators.is_empty());
        assert!(record.inputs.is_empty());
        assert_eq!(record.expected_locator, "");
    }

    #[test]
    fn test_interior_empty_entries_keep_positions() {
        assert_eq!(
            split_list("a;;c"),
            vec!["a".to_string(), "".to_string(), "c".to_string()]
        );
        assert_eq!(split_list("  "), Vec::<String>::new());
        assert_eq!(split_list("one"), vec!["one".to_string()]);
    }

    #[test]
    fn test_commit_writes_verdicts_and_leaves_others_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cases.xlsx");
        write_sheet(
            &path,
            &[
                ["TC1", "//a", "x", "//r", "OK"],
                ["", "//b", "", "", ""],
                ["TC2", "//c", "", "//r", "OK"],
            ],
        );

        let mut book = CaseBook::open(&path).unwrap();
        book.record_verdict(2, true);
        book.record_verdict(4, false);
        book.commit().unwrap();

        let reread = reader::xlsx::read(&path).unwrap();
        let sheet = reread.get_sheet(&0).unwrap();
        assert_eq!(sheet.get_value((COL_RESULT, 2)), "True");
        assert_eq!(sheet.get_value((COL_RESULT, 3)), "");
        assert_eq!(sheet.get_value((COL_RESULT, 4)), "False");
    }

    #[test]
    fn test_commit_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cases.xlsx");
        write_sheet(&path, &[["TC1", "//a", "", "//r", "OK"]]);

        let mut book = CaseBook::open(&path).unwrap();
        book.record_verdict(2, true);
        book.commit().unwrap();
        book.commit().unwrap();

        let reread = reader::xlsx::read(&path).unwrap();
        assert_eq!(reread.get_sheet(&0).unwrap().get_value((COL_RESULT, 2)), "True");
    }

    #[test]
    fn test_verdict_label() {
        assert_eq!(verdict_label(true), "True");
        assert_eq!(verdict_label(false), "False");
    }
}
