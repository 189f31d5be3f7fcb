//! The romcheck command line.
//!
//! Turns parsed arguments into an [`Invocation`]: a config, the test names and
//! the stages to run on each. Fatal errors become a miette report on stderr.

use std::path::PathBuf;
use std::process;

use clap::Parser;

use crate::cli::args::{Command, RomcheckArgs};
use crate::cli::output::StdoutSink;
use crate::config::HarnessConfig;
use crate::discovery::TestDiscoverer;
use crate::errors::Result;
use crate::layout::TestCase;
use crate::pipeline::{Harness, Stage, SuiteSummary};

pub mod args;
pub mod output;

/// Exit status used by `--strict` when any mismatch was reported.
pub const STRICT_FAILURE_EXIT: i32 = 2;

/// A parsed command, ready to execute.
#[derive(Debug)]
pub struct Invocation {
    pub config: HarnessConfig,
    pub names: Vec<PathBuf>,
    pub stages: Vec<Stage>,
    pub strict: bool,
}

impl Invocation {
    pub fn from_args(args: RomcheckArgs) -> Self {
        let config = HarnessConfig::default()
            .with_root(args.root)
            .with_color(args.color.into());

        match args.command {
            Command::Prepare { assembler, names } => Self {
                config: config.with_assembler(assembler),
                names,
                stages: vec![Stage::Prepare],
                strict: false,
            },
            Command::Run { executable, names } => Self {
                config,
                names,
                stages: vec![Stage::Run {
                    emulator: executable.into_os_string(),
                }],
                strict: false,
            },
            Command::Check {
                fail_fast,
                strict,
                names,
            } => Self {
                config,
                names,
                stages: vec![Stage::Check { fail_fast }],
                strict,
            },
            Command::Test {
                executable,
                assembler,
                fail_fast,
                strict,
                names,
            } => Self {
                config: config.with_assembler(assembler),
                names,
                stages: vec![
                    Stage::Prepare,
                    Stage::Run {
                        emulator: executable.into_os_string(),
                    },
                    Stage::Check { fail_fast },
                ],
                strict,
            },
        }
    }

    /// Explicit names, or every test case discovered under the roms root.
    pub fn test_cases(&self) -> Result<Vec<TestCase>> {
        if self.names.is_empty() {
            return TestDiscoverer::discover_test_cases(self.config.test_roms());
        }
        Ok(self.names.iter().cloned().map(TestCase::new).collect())
    }

    pub fn execute(&self) -> Result<SuiteSummary> {
        let cases = self.test_cases()?;
        let harness = Harness::new(self.config.clone());
        let mut sink = StdoutSink::new(self.config.use_colors());
        harness.run_stages(&cases, &self.stages, &mut sink)
    }
}

/// The main entry point for the CLI.
pub fn run() {
    let args = RomcheckArgs::parse();
    let invocation = Invocation::from_args(args);

    match invocation.execute() {
        Ok(summary) => {
            if invocation.strict && summary.any_mismatch() {
                process::exit(STRICT_FAILURE_EXIT);
            }
        }
        Err(e) => {
            let report = miette::Report::new(e);
            eprintln!("{report:?}");
            process::exit(1);
        }
    }
}
