//! Width comparators.
//!
//! Each known [`Width`] has exactly one comparator. Reserved and unknown
//! widths are a fatal [`HarnessError::NotImplemented`], never a pass or a
//! silent skip.

use crate::errors::{HarnessError, Result};
use crate::expectation::Width;

const ZERO: char = '\0';

/// Compares one output line against an expected value under `width`.
pub fn compare(actual: &str, expected: &str, width: &Width) -> Result<bool> {
    match width {
        Width::Half => Ok(actual == expected),
        Width::Word => Ok(compare_interleaved(actual, expected)),
        Width::Double | Width::Quad | Width::Other(_) => {
            Err(HarnessError::NotImplemented(width.clone()))
        }
    }
}

/// The `x` comparator.
///
/// The line is a run of byte pairs: one lane carries the value, the other must
/// read as zero. A leading NUL means the value sits in the odd lane.
fn compare_interleaved(actual: &str, expected: &str) -> bool {
    let chars: Vec<char> = actual.chars().collect();
    let Some(&first) = chars.first() else {
        return false;
    };
    let (value_offset, zero_offset) = if first == ZERO { (1, 0) } else { (0, 1) };
    let value: String = lane(&chars, value_offset).collect();
    value == expected && is_zero_lane(lane(&chars, zero_offset))
}

fn lane(chars: &[char], offset: usize) -> impl Iterator<Item = char> + '_ {
    chars.iter().skip(offset).step_by(2).copied()
}

/// A zero lane must hold at least one character, and only NULs.
fn is_zero_lane(mut lane: impl Iterator<Item = char>) -> bool {
    match lane.next() {
        Some(ZERO) => lane.all(|c| c == ZERO),
        _ => false,
    }
}
