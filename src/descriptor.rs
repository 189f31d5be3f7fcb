//! Descriptor template instantiation.
//!
//! Templates are plain text with two placeholder tokens. Substitution is a
//! literal replace: the only escaping applied is doubling backslashes so that
//! Windows paths survive inside JSON strings.

use std::path::Path;

use crate::errors::{HarnessError, Result};

/// Replaced with the absolute path of the emulator output file.
pub const OUTPUT_FILE_PLACEHOLDER: &str = "%outputfile";
/// Replaced with the absolute path of the assembled binary.
pub const ROM_BINARY_PLACEHOLDER: &str = "%rombin";

/// Renders `path` for embedding into a descriptor.
pub fn escape_path(path: &Path) -> String {
    path.display().to_string().replace('\\', "\\\\")
}

/// Makes `path` absolute against the current directory without touching the
/// filesystem.
pub fn absolute(path: &Path) -> Result<std::path::PathBuf> {
    std::path::absolute(path).map_err(|e| HarnessError::io(path, e))
}

/// Substitutes both placeholders in `template`.
pub fn instantiate(template: &str, output_file: &Path, rom_binary: &Path) -> String {
    template
        .replace(OUTPUT_FILE_PLACEHOLDER, &escape_path(output_file))
        .replace(ROM_BINARY_PLACEHOLDER, &escape_path(rom_binary))
}

/// Logs a warning when an instantiated descriptor is not valid JSON.
///
/// Paths are not JSON-escaped beyond backslashes, so a quote in a path breaks
/// the descriptor. The emulator still gets the file as written.
pub fn warn_if_not_json(text: &str, path: &Path) -> bool {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(_) => true,
        Err(e) => {
            log::warn!("descriptor {} is not valid JSON: {}", path.display(), e);
            false
        }
    }
}
