//! Handles all user-facing report lines.
//!
//! The checker never prints directly; it emits lines into a [`ReportSink`].
//! The CLI uses [`StdoutSink`], tests use [`OutputBuffer`].

use std::io::{self, Write};

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// What a report line says about a test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Mismatch,
    Success,
}

/// Destination for report lines.
///
/// Report lines are the only record of a mismatch, so a sink that cannot
/// write must say so.
pub trait ReportSink {
    fn emit(&mut self, kind: ReportKind, text: &str) -> io::Result<()>;
}

/// OutputBuffer: collects report lines for testing or programmatic capture.
#[derive(Debug, Default)]
pub struct OutputBuffer {
    pub lines: Vec<(ReportKind, String)>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.lines.iter().map(|(_, text)| text.as_str()).collect()
    }
}

impl ReportSink for OutputBuffer {
    fn emit(&mut self, kind: ReportKind, text: &str) -> io::Result<()> {
        self.lines.push((kind, text.to_string()));
        Ok(())
    }
}

/// StdoutSink: writes report lines to stdout, colored when enabled.
pub struct StdoutSink {
    stream: StandardStream,
}

impl StdoutSink {
    pub fn new(use_colors: bool) -> Self {
        let choice = if use_colors {
            ColorChoice::Always
        } else {
            ColorChoice::Never
        };
        Self {
            stream: StandardStream::stdout(choice),
        }
    }
}

impl ReportSink for StdoutSink {
    fn emit(&mut self, kind: ReportKind, text: &str) -> io::Result<()> {
        let color = match kind {
            ReportKind::Mismatch => Color::Red,
            ReportKind::Success => Color::Green,
        };
        self.stream.set_color(ColorSpec::new().set_fg(Some(color)))?;
        write!(self.stream, "{}", text)?;
        self.stream.reset()?;
        writeln!(self.stream)?;
        self.stream.flush()
    }
}
