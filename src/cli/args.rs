//! Arguments for `romcheck prepare|run|check|test`.
//!
//! `--root` and `--color` are global, so they may follow the subcommand.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use termcolor::ColorChoice;

use crate::config::DEFAULT_ASSEMBLER;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "romcheck",
    version,
    about = "Assemble, run and verify emulator test ROMs against golden files."
)]
pub struct RomcheckArgs {
    /// Directory containing test_roms/, temp/ and output/.
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// When to color mismatch and success lines.
    #[arg(long, global = true, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

impl From<ColorMode> for ColorChoice {
    fn from(mode: ColorMode) -> Self {
        match mode {
            ColorMode::Auto => ColorChoice::Auto,
            ColorMode::Always => ColorChoice::Always,
            ColorMode::Never => ColorChoice::Never,
        }
    }
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Prepares the test roms for execution.
    Prepare {
        /// The assembler executable. Needs to have the same interface as etc-as.
        #[arg(short, long, default_value = DEFAULT_ASSEMBLER)]
        assembler: String,
        /// The test roms to prepare. If not given, prepares all.
        names: Vec<PathBuf>,
    },
    /// Runs prepared test roms on the emulator.
    Run {
        /// The emulator executable.
        #[arg(short = 'e', long, required = true)]
        executable: PathBuf,
        /// Names of the test roms to execute. If not given, runs all.
        names: Vec<PathBuf>,
    },
    /// Verifies emulator output against the golden files.
    Check {
        /// Stop at the first mismatch for each test rom.
        #[arg(short, long)]
        fail_fast: bool,
        /// Exit with status 2 if any mismatch was reported.
        #[arg(short, long)]
        strict: bool,
        /// The test roms to verify. If not given, checks all.
        names: Vec<PathBuf>,
    },
    /// Prepare, run and check.
    Test {
        /// The emulator executable.
        #[arg(short = 'e', long, required = true)]
        executable: PathBuf,
        /// The assembler executable. Needs to have the same interface as etc-as.
        #[arg(short, long, default_value = DEFAULT_ASSEMBLER)]
        assembler: String,
        /// Stop at the first mismatch for each test rom.
        #[arg(short, long)]
        fail_fast: bool,
        /// Exit with status 2 if any mismatch was reported.
        #[arg(short, long)]
        strict: bool,
        /// The test roms to test. If not given, tests all.
        names: Vec<PathBuf>,
    },
}
