//! Runtime search path resolved through `$JAVA_HOME`
//!
//! The Rust stand-in for loading platform classes off the running JVM:
//! modular JDKs expose the platform classes as `jmods/*.jmod`, JDK 8 and
//! older ship `rt.jar`.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::domain::model::ClassName;
use crate::search::{ClassPath, SearchPath};

/// Platform classes of the JDK installation named by `JAVA_HOME`.
pub struct RuntimeSearchPath {
    java_home: PathBuf,
    entries: Vec<ClassPath>,
}

impl RuntimeSearchPath {
    /// Build from `$JAVA_HOME`; `None` when the variable is unset.
    pub fn from_env() -> Option<Self> {
        let java_home = std::env::var_os("JAVA_HOME")?;
        Some(Self::new(PathBuf::from(java_home)))
    }

    /// Build from an explicit JDK installation directory. An unusable
    /// directory yields a path that never finds anything.
    pub fn new(java_home: PathBuf) -> Self {
        let entries = Self::locate_entries(&java_home);
        if entries.is_empty() {
            debug!(
                "no platform classes found under {}",
                java_home.display()
            );
        } else {
            info!(
                "using runtime classes from {} ({} entr{})",
                java_home.display(),
                entries.len(),
                if entries.len() == 1 { "y" } else { "ies" }
            );
        }
        Self { java_home, entries }
    }

    fn locate_entries(java_home: &Path) -> Vec<ClassPath> {
        let jmods = java_home.join("jmods");
        if jmods.is_dir() {
            let mut files: Vec<PathBuf> = std::fs::read_dir(&jmods)
                .map(|entries| {
                    entries
                        .filter_map(|e| e.ok())
                        .map(|e| e.path())
                        .filter(|p| p.is_file())
                        .filter(|p| crate::search::has_extension(p, "jmod"))
                        .collect()
                })
                .unwrap_or_default();
            files.sort();
            // java.base first, it answers nearly every lookup
            files.sort_by_key(|p| {
                p.file_name()
                    .map(|n| n.to_string_lossy() != "java.base.jmod")
                    .unwrap_or(true)
            });
            return files.into_iter().map(ClassPath::new).collect();
        }

        for rt in ["jre/lib/rt.jar", "lib/rt.jar"] {
            let candidate = java_home.join(rt);
            if candidate.is_file() {
                return vec![ClassPath::new(candidate)];
            }
        }
        Vec::new()
    }
}

impl SearchPath for RuntimeSearchPath {
    fn search_class(&self, name: &ClassName) -> Option<Vec<u8>> {
        self.entries
            .iter()
            .find_map(|entry| entry.search_class(name))
    }

    fn describe(&self) -> String {
        format!("RuntimeSearchPath[{}]", self.java_home.display())
    }
}
