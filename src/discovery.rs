use std::path::Path;

use walkdir::WalkDir;

use crate::errors::{HarnessError, Result};
use crate::layout::TestCase;

/// Extension of the assembly source that defines a test case.
pub const SOURCE_EXTENSION: &str = "s";

/// Discovers test cases under the roms root.
#[derive(Debug)]
pub struct TestDiscoverer;

impl TestDiscoverer {
    fn is_source_file(path: &Path) -> bool {
        path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION)
    }

    /// Recursively scans `root` for assembly sources and returns their
    /// suffix-free names relative to `root`.
    ///
    /// The returned list is sorted to ensure deterministic execution order.
    /// A missing root holds no test cases.
    pub fn discover_test_cases<P: AsRef<Path>>(root: P) -> Result<Vec<TestCase>> {
        let root = root.as_ref();
        if !root.exists() {
            log::warn!("{} does not exist, no test cases found", root.display());
            return Ok(Vec::new());
        }
        let mut cases = Vec::new();
        for entry in WalkDir::new(root) {
            let entry = entry.map_err(|source| HarnessError::Discovery {
                root: root.to_path_buf(),
                source,
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if !Self::is_source_file(path) {
                continue;
            }
            let Ok(relative) = path.strip_prefix(root) else {
                continue;
            };
            cases.push(TestCase::new(relative.with_extension("")));
        }
        cases.sort();
        log::debug!("discovered {} test case(s) under {}", cases.len(), root.display());
        Ok(cases)
    }
}
