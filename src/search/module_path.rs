//! Module path entry: a directory of jars and jmods

use std::path::PathBuf;

use tracing::debug;
use walkdir::WalkDir;

use crate::domain::model::ClassName;
use crate::error::{JavahError, JavahResult};
use crate::search::{has_extension, ClassPath, SearchPath};

/// One `--module-path` entry. Every archive directly inside the directory
/// becomes a [`ClassPath`]; other files are ignored.
pub struct ModulePath {
    origin: PathBuf,
    entries: Vec<ClassPath>,
}

impl ModulePath {
    pub fn new(path: impl Into<PathBuf>) -> JavahResult<Self> {
        let origin = path.into();
        if !origin.is_dir() {
            return Err(JavahError::NotADirectory {
                path: origin.display().to_string(),
            });
        }
        let mut files: Vec<PathBuf> = WalkDir::new(&origin)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    debug!("skipping unreadable module path entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| {
                has_extension(path, "jar")
                    || has_extension(path, "jmod")
                    || has_extension(path, "zip")
            })
            .collect();
        files.sort();
        let entries = files.into_iter().map(ClassPath::new).collect();
        Ok(Self { origin, entries })
    }
}

impl SearchPath for ModulePath {
    fn search_class(&self, name: &ClassName) -> Option<Vec<u8>> {
        self.entries
            .iter()
            .find_map(|entry| entry.search_class(name))
    }

    fn describe(&self) -> String {
        format!("ModulePath[{}]", self.origin.display())
    }
}
