//! Header generation module

use std::fs;
use std::path::Path;

use tracing::debug;

pub mod header;
pub mod mangle;

pub use header::{header_file_name, HeaderGenerator, FILE_BANNER};
pub use mangle::{function_symbol, guard_name, mangle};

use crate::error::JavahResult;

/// Write a file only when its content actually changed, creating parent
/// directories as needed. Returns whether a write happened, so re-runs
/// leave untouched headers with their old timestamps.
pub fn write_if_changed(path: &Path, content: &str) -> JavahResult<bool> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    if let Ok(existing) = fs::read(path) {
        if existing == content.as_bytes() {
            debug!("unchanged: {}", path.display());
            return Ok(false);
        }
    }
    fs::write(path, content)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_if_changed() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("sub/out.h");

        assert!(write_if_changed(&target, "one").unwrap());
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "one");

        assert!(!write_if_changed(&target, "one").unwrap());
        assert!(write_if_changed(&target, "two").unwrap());
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "two");
    }
}
