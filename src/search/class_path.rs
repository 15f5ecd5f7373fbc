//! Single class path entry: a directory or a jar/zip/jmod archive

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use zip::ZipArchive;

use crate::domain::model::ClassName;
use crate::search::{has_extension, SearchPath};

const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";
const VERSIONS_PREFIX: &str = "META-INF/versions/";

/// Where classes actually live once the entry has been categorized.
enum Location {
    /// Lookup roots in priority order: multi-release version directories
    /// first, then the base directory.
    Directory { roots: Vec<PathBuf> },
    /// Entry-name prefixes in priority order, e.g.
    /// `META-INF/versions/11/` before `` for a multi-release jar, or
    /// `classes/` for a jmod.
    Archive { path: PathBuf, prefixes: Vec<String> },
}

/// One `--classpath` entry.
pub struct ClassPath {
    origin: PathBuf,
    location: Option<Location>,
}

impl ClassPath {
    /// Categorize a class path entry. Unusable entries (missing files,
    /// unreadable archives, unsupported extensions) stay on the path but
    /// never resolve anything.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let origin = path.into();
        let location = Self::open(&origin);
        if location.is_none() {
            warn!("Class path entry is not usable: {}", origin.display());
        }
        Self { origin, location }
    }

    fn open(path: &Path) -> Option<Location> {
        if path.is_dir() {
            return Some(Location::Directory {
                roots: directory_roots(path),
            });
        }
        if !path.is_file() {
            return None;
        }
        if has_extension(path, "jar") || has_extension(path, "zip") {
            let prefixes = match archive_prefixes(path) {
                Ok(prefixes) => prefixes,
                Err(e) => {
                    debug!("cannot read archive {}: {}", path.display(), e);
                    return None;
                }
            };
            return Some(Location::Archive {
                path: path.to_path_buf(),
                prefixes,
            });
        }
        if has_extension(path, "jmod") {
            return Some(Location::Archive {
                path: path.to_path_buf(),
                prefixes: vec!["classes/".to_string()],
            });
        }
        None
    }
}

impl SearchPath for ClassPath {
    fn search_class(&self, name: &ClassName) -> Option<Vec<u8>> {
        let relative = name.relative_file();
        match self.location.as_ref()? {
            Location::Directory { roots } => roots.iter().find_map(|root| {
                let candidate = root.join(&relative);
                candidate.is_file().then(|| fs::read(&candidate).ok())?
            }),
            Location::Archive { path, prefixes } => {
                read_archive_entry(path, prefixes, &relative)
            }
        }
    }

    fn describe(&self) -> String {
        format!("ClassPath[{}]", self.origin.display())
    }
}

/// Lookup roots for a directory entry, honoring the Multi-Release manifest
/// flag the way multi-release jars do.
fn directory_roots(base: &Path) -> Vec<PathBuf> {
    let manifest = base.join(MANIFEST_PATH);
    let multi_release = fs::read_to_string(&manifest)
        .map(|text| is_multi_release(&text))
        .unwrap_or(false);

    let mut roots = Vec::new();
    if multi_release {
        let versions_dir = base.join(VERSIONS_PREFIX);
        let mut versions: Vec<u32> = fs::read_dir(&versions_dir)
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .filter(|e| e.path().is_dir())
                    .filter_map(|e| e.file_name().to_string_lossy().parse::<u32>().ok())
                    .filter(|&v| v >= 9)
                    .collect()
            })
            .unwrap_or_default();
        versions.sort_unstable_by(|a, b| b.cmp(a));
        roots.extend(versions.into_iter().map(|v| versions_dir.join(v.to_string())));
    }
    roots.push(base.to_path_buf());
    roots
}

/// Entry-name prefixes for a jar, newest multi-release version first.
fn archive_prefixes(path: &Path) -> crate::error::JavahResult<Vec<String>> {
    let mut archive = ZipArchive::new(File::open(path)?)?;

    let multi_release = match archive.by_name(MANIFEST_PATH) {
        Ok(mut manifest) => {
            let mut text = String::new();
            manifest.read_to_string(&mut text)?;
            is_multi_release(&text)
        }
        Err(_) => false,
    };

    let mut prefixes = Vec::new();
    if multi_release {
        let mut versions: Vec<u32> = archive
            .file_names()
            .filter_map(|name| name.strip_prefix(VERSIONS_PREFIX))
            .filter_map(|rest| rest.split('/').next())
            .filter_map(|segment| segment.parse::<u32>().ok())
            .filter(|&v| v >= 9)
            .collect();
        versions.sort_unstable_by(|a, b| b.cmp(a));
        versions.dedup();
        prefixes.extend(
            versions
                .into_iter()
                .map(|v| format!("{}{}/", VERSIONS_PREFIX, v)),
        );
    }
    prefixes.push(String::new());
    Ok(prefixes)
}

/// Open the archive and try each prefix in order.
fn read_archive_entry(path: &Path, prefixes: &[String], relative: &str) -> Option<Vec<u8>> {
    let file = File::open(path).ok()?;
    let mut archive = match ZipArchive::new(file) {
        Ok(archive) => archive,
        Err(e) => {
            debug!("cannot open archive {}: {}", path.display(), e);
            return None;
        }
    };
    for prefix in prefixes {
        let entry_name = format!("{}{}", prefix, relative);
        if let Ok(mut entry) = archive.by_name(&entry_name) {
            let mut data = Vec::with_capacity(entry.size() as usize);
            if entry.read_to_end(&mut data).is_ok() {
                return Some(data);
            }
        }
    }
    None
}

/// Scan manifest main attributes for `Multi-Release: true`.
fn is_multi_release(manifest: &str) -> bool {
    manifest.lines().any(|line| {
        line.split_once(':')
            .map(|(key, value)| {
                key.trim().eq_ignore_ascii_case("Multi-Release")
                    && value.trim().eq_ignore_ascii_case("true")
            })
            .unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classfile::testutil::ClassBuilder;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn class_name(name: &str) -> ClassName {
        ClassName::of_internal_name(name).unwrap()
    }

    #[test]
    fn test_directory_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let bytes = ClassBuilder::new("pkg/Demo").build();
        fs::create_dir_all(dir.path().join("pkg")).unwrap();
        fs::write(dir.path().join("pkg/Demo.class"), &bytes).unwrap();

        let cp = ClassPath::new(dir.path());
        assert_eq!(cp.search_class(&class_name("pkg/Demo")), Some(bytes));
        assert_eq!(cp.search_class(&class_name("pkg/Missing")), None);
    }

    #[test]
    fn test_missing_entry_is_inert() {
        let cp = ClassPath::new("/does/not/exist");
        assert_eq!(cp.search_class(&class_name("pkg/Demo")), None);
    }

    #[test]
    fn test_jar_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let jar_path = dir.path().join("demo.jar");
        let bytes = ClassBuilder::new("pkg/Demo").build();

        let mut writer = ZipWriter::new(File::create(&jar_path).unwrap());
        writer
            .start_file("pkg/Demo.class", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(&bytes).unwrap();
        writer.finish().unwrap();

        let cp = ClassPath::new(&jar_path);
        assert_eq!(cp.search_class(&class_name("pkg/Demo")), Some(bytes));
        assert_eq!(cp.search_class(&class_name("pkg/Missing")), None);
    }

    #[test]
    fn test_multi_release_jar_prefers_newest_version() {
        let dir = tempfile::tempdir().unwrap();
        let jar_path = dir.path().join("mr.jar");
        let base = ClassBuilder::new("pkg/Demo").int_constant("V", 8).build();
        let v11 = ClassBuilder::new("pkg/Demo").int_constant("V", 11).build();

        let mut writer = ZipWriter::new(File::create(&jar_path).unwrap());
        let options = SimpleFileOptions::default();
        writer.start_file("META-INF/MANIFEST.MF", options).unwrap();
        writer
            .write_all(b"Manifest-Version: 1.0\r\nMulti-Release: true\r\n")
            .unwrap();
        writer.start_file("pkg/Demo.class", options).unwrap();
        writer.write_all(&base).unwrap();
        writer
            .start_file("META-INF/versions/11/pkg/Demo.class", options)
            .unwrap();
        writer.write_all(&v11).unwrap();
        writer.finish().unwrap();

        let cp = ClassPath::new(&jar_path);
        assert_eq!(cp.search_class(&class_name("pkg/Demo")), Some(v11));
    }

    #[test]
    fn test_is_multi_release() {
        assert!(is_multi_release("Manifest-Version: 1.0\nMulti-Release: true\n"));
        assert!(is_multi_release("multi-release: TRUE"));
        assert!(!is_multi_release("Multi-Release: false"));
        assert!(!is_multi_release("Manifest-Version: 1.0"));
    }
}
