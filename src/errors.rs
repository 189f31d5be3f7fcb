//! Error types for the romcheck harness.
//!
//! Every fatal condition the harness can hit is a variant of [`HarnessError`].
//! Assertion mismatches are *not* errors: they are reported through a
//! [`ReportSink`](crate::cli::output::ReportSink) and collected in a
//! [`CheckReport`](crate::checker::CheckReport).

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::expectation::Width;

/// Fatal harness errors. Any of these aborts the current invocation.
#[derive(Error, Diagnostic, Debug)]
pub enum HarnessError {
    #[error("{} is not a file.", .path.display())]
    #[diagnostic(
        code(romcheck::input::missing),
        help("check the test name and the --root directory")
    )]
    MissingInput { path: PathBuf },

    #[error("Assembler failed to create binary {}.", .path.display())]
    #[diagnostic(
        code(romcheck::tool::no_binary),
        help("the assembler exited successfully but left no output file")
    )]
    MissingBinary { path: PathBuf },

    #[error("failed to launch {tool} `{program}`: {source}")]
    #[diagnostic(code(romcheck::tool::spawn))]
    Spawn {
        tool: &'static str,
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} `{program}` exited with {status}")]
    #[diagnostic(code(romcheck::tool::failed))]
    ToolFailed {
        tool: &'static str,
        program: String,
        status: String,
    },

    #[error("malformed expectation record at {}:{line}: {reason}", .file.display())]
    #[diagnostic(
        code(romcheck::golden::malformed),
        help("records have the form `expected|width|label|description`")
    )]
    MalformedRecord {
        file: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("width code `{0}` is not implemented")]
    #[diagnostic(
        code(romcheck::golden::unimplemented),
        help("only the `h` and `x` widths are supported")
    )]
    NotImplemented(Width),

    #[error("I/O error on {}: {source}", .path.display())]
    #[diagnostic(code(romcheck::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to walk {}: {source}", .root.display())]
    #[diagnostic(code(romcheck::discovery))]
    Discovery {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

impl HarnessError {
    /// Wraps an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HarnessError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = HarnessError> = std::result::Result<T, E>;
