//! Golden expectation records.
//!
//! A golden file holds one record per line:
//!
//! ```text
//! expected|width|label|description
//! ```
//!
//! Record *i* is compared against output line *i*. Records are parsed lazily
//! by the checker, so a malformed record past the end of the output is never
//! looked at.

use std::fmt;

/// Separator between the four fields of a record.
pub const FIELD_SEPARATOR: char = '|';

/// How a raw output line is decoded before comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Width {
    /// `h`: the line is compared verbatim.
    Half,
    /// `x`: a 16-bit bus, value bytes interleaved with zero bytes.
    Word,
    /// `d`: reserved for a 32-bit bus.
    Double,
    /// `q`: reserved for a 64-bit bus.
    Quad,
    /// Any other code. Parsed so the checker can reject it as unimplemented.
    Other(String),
}

impl Width {
    /// Parses a width code. Only the exact single-letter codes are known.
    pub fn from_code(code: &str) -> Self {
        match code {
            "h" => Width::Half,
            "x" => Width::Word,
            "d" => Width::Double,
            "q" => Width::Quad,
            other => Width::Other(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Width::Half => "h",
            Width::Word => "x",
            Width::Double => "d",
            Width::Quad => "q",
            Width::Other(code) => code,
        }
    }
}

impl fmt::Display for Width {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// One line of a golden file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectationRecord {
    pub expected: String,
    pub width: Width,
    pub label: String,
    pub description: String,
}

impl ExpectationRecord {
    /// Parses a single golden line. The error is a human-readable reason,
    /// the caller attaches file and line information.
    pub fn parse(line: &str) -> Result<Self, String> {
        let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
        let [expected, width, label, description] = fields[..] else {
            return Err(format!("expected 4 fields, found {}", fields.len()));
        };
        Ok(ExpectationRecord {
            expected: expected.to_string(),
            width: Width::from_code(width),
            label: label.to_string(),
            description: description.to_string(),
        })
    }
}

fn is_line_boundary(ch: char) -> bool {
    matches!(
        ch,
        '\n' | '\r'
            | '\x0b'
            | '\x0c'
            | '\x1c'
            | '\x1d'
            | '\x1e'
            | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}

/// Splits text into lines on every universal line boundary.
///
/// `\r\n` counts as one boundary and a trailing boundary does not yield an
/// empty last line. NUL is an ordinary character here, which matters for
/// interleaved `x` output.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((idx, ch)) = chars.next() {
        if !is_line_boundary(ch) {
            continue;
        }
        lines.push(&text[start..idx]);
        let mut end = idx + ch.len_utf8();
        if ch == '\r' {
            if let Some(&(next, '\n')) = chars.peek() {
                chars.next();
                end = next + 1;
            }
        }
        start = end;
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}
