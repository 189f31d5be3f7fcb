//! romcheck: a conformance harness for emulator test ROMs.
//!
//! Each test case is assembled, run on the emulator under test, and its output
//! is compared line by line against a golden expectation file.

pub use crate::errors::{HarnessError, Result};

pub mod checker;
pub mod cli;
pub mod compare;
pub mod config;
pub mod descriptor;
pub mod discovery;
pub mod errors;
pub mod expectation;
pub mod layout;
pub mod pipeline;
pub mod toolchain;
