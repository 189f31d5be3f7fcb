//! External collaborators: the assembler and the emulator.
//!
//! Both are opaque executables. The harness blocks until they exit and turns a
//! nonzero status into a fatal error. Their stdout and stderr are inherited.

use std::ffi::OsStr;
use std::path::Path;
use std::process::Command;

use crate::config::{HarnessConfig, DEFAULT_ASSEMBLER, DEFAULT_ASSEMBLER_MODULE};
use crate::errors::{HarnessError, Result};

/// Builds the assembler command line:
/// `<assembler> -o <binary> -mformat=binary <source>`.
///
/// The default assembler is a Python module and is launched through the
/// configured interpreter.
pub fn assembler_command(config: &HarnessConfig, source: &Path, binary: &Path) -> Command {
    let mut cmd = if config.assembler == DEFAULT_ASSEMBLER {
        let mut cmd = Command::new(&config.python);
        cmd.arg("-m").arg(DEFAULT_ASSEMBLER_MODULE);
        cmd
    } else {
        Command::new(&config.assembler)
    };
    cmd.arg("-o")
        .arg(binary)
        .arg("-mformat=binary")
        .arg(source);
    cmd
}

/// Builds the emulator command line: `<emulator> <descriptor>`.
pub fn emulator_command(emulator: &OsStr, descriptor: &Path) -> Command {
    let mut cmd = Command::new(emulator);
    cmd.arg(descriptor);
    cmd
}

/// Runs `cmd` to completion. Nonzero exit or failure to spawn is fatal.
pub fn run_checked(tool: &'static str, mut cmd: Command) -> Result<()> {
    let program = describe(&cmd);
    log::debug!("running {}: {}", tool, program);
    let status = cmd.status().map_err(|source| HarnessError::Spawn {
        tool,
        program: program.clone(),
        source,
    })?;
    if !status.success() {
        return Err(HarnessError::ToolFailed {
            tool,
            program,
            status: status.to_string(),
        });
    }
    Ok(())
}

fn describe(cmd: &Command) -> String {
    std::iter::once(cmd.get_program())
        .chain(cmd.get_args())
        .map(|part| part.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}
