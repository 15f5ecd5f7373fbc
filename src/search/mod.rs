//! Class search paths
//!
//! Search locations mirror the historical javah tool: directories and
//! jar/zip/jmod archives from `--classpath`, directories full of archives
//! from `--module-path`, and the JDK runtime image found through
//! `$JAVA_HOME`.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

pub mod class_path;
pub mod module_path;
pub mod runtime_path;

pub use class_path::ClassPath;
pub use module_path::ModulePath;
pub use runtime_path::RuntimeSearchPath;

use crate::domain::model::ClassName;

/// A location that can resolve a class name to class file bytes.
pub trait SearchPath {
    /// Look up a class, returning its raw bytes. Lookup failures inside the
    /// location (unreadable archive, missing entry) count as not-found.
    fn search_class(&self, name: &ClassName) -> Option<Vec<u8>>;

    /// Human-readable description for error messages.
    fn describe(&self) -> String;
}

/// Split a `--classpath` value on the platform path separator and expand
/// trailing `/*` components into every jar in that directory, as the JDK
/// launcher does. Empty segments and missing paths are skipped with a note.
pub fn split_class_path(spec: &str) -> Vec<PathBuf> {
    let separator = if cfg!(windows) { ';' } else { ':' };
    let mut paths = Vec::new();
    for entry in spec.split(separator).filter(|s| !s.is_empty()) {
        if let Some(dir) = entry
            .strip_suffix("/*")
            .or_else(|| entry.strip_suffix("\\*"))
        {
            paths.extend(jars_in(Path::new(dir)));
        } else {
            paths.push(PathBuf::from(entry));
        }
    }
    paths
}

/// Non-recursive listing of the jar files in a directory.
fn jars_in(dir: &Path) -> Vec<PathBuf> {
    let mut jars: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("skipping unreadable entry under {}: {}", dir.display(), e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| has_extension(path, "jar"))
        .collect();
    jars.sort();
    jars
}

pub(crate) fn has_extension(path: &Path, wanted: &str) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(wanted))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_split_class_path_skips_empty_segments() {
        let sep = if cfg!(windows) { ';' } else { ':' };
        let paths = split_class_path(&format!("a{sep}{sep}b"));
        assert_eq!(paths, vec![PathBuf::from("a"), PathBuf::from("b")]);
    }

    #[test]
    fn test_split_class_path_wildcard() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.jar"), b"x").unwrap();
        fs::write(dir.path().join("a.JAR"), b"x").unwrap();
        fs::write(dir.path().join("c.txt"), b"x").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();

        let spec = format!("{}/*", dir.path().display());
        let paths = split_class_path(&spec);
        assert_eq!(paths.len(), 2);
        assert!(paths[0].ends_with("a.JAR"));
        assert!(paths[1].ends_with("b.jar"));
    }

    #[test]
    fn test_has_extension() {
        assert!(has_extension(Path::new("x/y.Jar"), "jar"));
        assert!(!has_extension(Path::new("x/jar"), "jar"));
    }
}
