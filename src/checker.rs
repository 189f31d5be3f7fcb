//! The checker: pairs golden records with output lines and reports mismatches.
//!
//! Records and output lines are zipped positionally, stopping at the shorter
//! sequence. Each record is evaluated on its own; the only state carried
//! between records is whether anything mismatched so far.

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::cli::output::{ReportKind, ReportSink};
use crate::compare::compare;
use crate::errors::{HarnessError, Result};
use crate::expectation::{split_lines, ExpectationRecord};
use crate::layout::TestCase;

/// A record whose comparator returned false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub test: TestCase,
    /// 1-based line in the golden file (and in the output file).
    pub line: usize,
    pub label: String,
    pub description: String,
    pub actual: String,
    pub expected: String,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Mismatch in output for test {} in label {}: {} (got {:?}, expected {:?})",
            self.test, self.label, self.description, self.actual, self.expected
        )
    }
}

/// Outcome of checking one test case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub test: TestCase,
    /// Records that were paired with an output line and compared.
    pub checked: usize,
    pub mismatches: Vec<Mismatch>,
    /// Set when fail-fast returned before all paired records were compared.
    pub stopped_early: bool,
}

impl CheckReport {
    fn new(test: TestCase) -> Self {
        Self {
            test,
            checked: 0,
            mismatches: Vec::new(),
            stopped_early: false,
        }
    }

    pub fn passed(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Line printed when a test case had no mismatches.
pub fn success_line(test: &TestCase) -> String {
    format!("Test Rom {} completed successfully.", test)
}

/// Checks the golden file at `golden_path` against the output file at
/// `output_path`.
pub fn check_files(
    test: &TestCase,
    golden_path: &Path,
    output_path: &Path,
    fail_fast: bool,
    sink: &mut dyn ReportSink,
) -> Result<CheckReport> {
    let golden = read_input(golden_path)?;
    let output = String::from_utf8_lossy(&read_bytes(output_path)?).into_owned();
    check_text(test, golden_path, &golden, &output, fail_fast, sink)
}

/// Checks already-loaded golden and output text. `golden_path` is only used
/// for error messages.
pub fn check_text(
    test: &TestCase,
    golden_path: &Path,
    golden: &str,
    output: &str,
    fail_fast: bool,
    sink: &mut dyn ReportSink,
) -> Result<CheckReport> {
    let mut report = CheckReport::new(test.clone());
    let pairs = split_lines(golden).into_iter().zip(split_lines(output));

    for (index, (golden_line, actual)) in pairs.enumerate() {
        let line = index + 1;
        let record =
            ExpectationRecord::parse(golden_line).map_err(|reason| HarnessError::MalformedRecord {
                file: golden_path.to_path_buf(),
                line,
                reason,
            })?;
        report.checked += 1;
        if compare(actual, &record.expected, &record.width)? {
            continue;
        }

        let mismatch = Mismatch {
            test: test.clone(),
            line,
            label: record.label,
            description: record.description,
            actual: actual.to_string(),
            expected: record.expected,
        };
        emit(sink, ReportKind::Mismatch, &mismatch.to_string())?;
        report.mismatches.push(mismatch);
        if fail_fast {
            report.stopped_early = true;
            return Ok(report);
        }
    }

    if report.passed() {
        emit(sink, ReportKind::Success, &success_line(test))?;
    }
    Ok(report)
}

/// Path reported when a report line cannot be written.
const REPORT_STREAM: &str = "<stdout>";

fn emit(sink: &mut dyn ReportSink, kind: ReportKind, text: &str) -> Result<()> {
    sink.emit(kind, text).map_err(|e| HarnessError::io(REPORT_STREAM, e))
}

fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => HarnessError::MissingInput {
            path: path.to_path_buf(),
        },
        _ => HarnessError::io(path, e),
    })
}

fn read_input(path: &Path) -> Result<String> {
    let bytes = read_bytes(path)?;
    String::from_utf8(bytes).map_err(|e| {
        HarnessError::io(path, std::io::Error::new(ErrorKind::InvalidData, e))
    })
}
