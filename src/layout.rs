//! Maps a test case name to the files that belong to it.

use std::fmt;
use std::path::PathBuf;

use crate::config::HarnessConfig;

/// A test case, named by its suffix-free path relative to the roms root.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TestCase {
    name: PathBuf,
}

impl TestCase {
    pub fn new(name: impl Into<PathBuf>) -> Self {
        Self { name: name.into() }
    }

    /// The name with its last extension replaced by `suffix`.
    fn with_suffix(&self, suffix: &str) -> PathBuf {
        self.name.with_extension(suffix)
    }

    pub fn paths(&self, config: &HarnessConfig) -> CasePaths {
        let roms = config.test_roms();
        let temp = config.temp();
        CasePaths {
            source: roms.join(self.with_suffix("s")),
            descriptor_template: roms.join(self.with_suffix("mem.json")),
            expectation: roms.join(self.with_suffix("expected")),
            binary: temp.join(self.with_suffix("bin")),
            descriptor: temp.join(self.with_suffix("mem.json")),
            output: config.output().join(self.with_suffix("out")),
        }
    }
}

impl fmt::Display for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name.display())
    }
}

/// Every file associated with one test case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CasePaths {
    pub source: PathBuf,
    pub descriptor_template: PathBuf,
    pub expectation: PathBuf,
    pub binary: PathBuf,
    pub descriptor: PathBuf,
    pub output: PathBuf,
}
