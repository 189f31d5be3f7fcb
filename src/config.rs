//! Harness configuration.

use std::path::PathBuf;

use termcolor::ColorChoice;

/// The assembler used when none is given on the command line.
pub const DEFAULT_ASSEMBLER: &str = "etc-as";

/// Python module that implements [`DEFAULT_ASSEMBLER`].
pub const DEFAULT_ASSEMBLER_MODULE: &str = "etc_as";

/// Environment variable selecting the interpreter for [`DEFAULT_ASSEMBLER`].
pub const PYTHON_ENV: &str = "ROMCHECK_PYTHON";

const DEFAULT_PYTHON: &str = "python3";

/// Configuration shared by all stages.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Directory the layout below is resolved against.
    pub root: PathBuf,
    /// Sources, descriptor templates and golden files.
    pub test_roms_dir: String,
    /// Assembled binaries and instantiated descriptors.
    pub temp_dir: String,
    /// Emulator output streams.
    pub output_dir: String,
    pub assembler: String,
    /// Interpreter used to launch [`DEFAULT_ASSEMBLER`] as a module.
    pub python: String,
    pub color: ColorChoice,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            test_roms_dir: "test_roms".to_string(),
            temp_dir: "temp".to_string(),
            output_dir: "output".to_string(),
            assembler: DEFAULT_ASSEMBLER.to_string(),
            python: std::env::var(PYTHON_ENV).unwrap_or_else(|_| DEFAULT_PYTHON.to_string()),
            color: ColorChoice::Auto,
        }
    }
}

impl HarnessConfig {
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    pub fn with_assembler(mut self, assembler: impl Into<String>) -> Self {
        self.assembler = assembler.into();
        self
    }

    pub fn with_color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }

    pub fn test_roms(&self) -> PathBuf {
        self.root.join(&self.test_roms_dir)
    }

    pub fn temp(&self) -> PathBuf {
        self.root.join(&self.temp_dir)
    }

    pub fn output(&self) -> PathBuf {
        self.root.join(&self.output_dir)
    }

    /// Resolves `Auto` against whether stdout is a terminal.
    pub fn use_colors(&self) -> bool {
        match self.color {
            ColorChoice::Never => false,
            ColorChoice::Always | ColorChoice::AlwaysAnsi => true,
            ColorChoice::Auto => atty::is(atty::Stream::Stdout),
        }
    }
}
