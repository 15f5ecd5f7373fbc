//! Application layer - one javah run from options to output files

use std::path::PathBuf;

use tracing::{debug, info};

use crate::domain::model::ClassMetaInfo;
use crate::error::JavahResult;
use crate::generate::{header_file_name, write_if_changed, HeaderGenerator};
use crate::search::{split_class_path, ClassPath, ModulePath, RuntimeSearchPath, SearchPath};

/// Where generated headers go.
pub enum OutputTarget {
    /// One `<Class>.h` per class.
    Directory(PathBuf),
    /// All classes concatenated into one file.
    SingleFile(PathBuf),
}

/// A configured javah run: search paths, class list and output target.
pub struct JavahTask {
    search_paths: Vec<Box<dyn SearchPath>>,
    classes: Vec<String>,
    output: OutputTarget,
    json: bool,
}

impl JavahTask {
    pub fn new() -> Self {
        Self {
            search_paths: Vec::new(),
            classes: Vec::new(),
            output: OutputTarget::Directory(PathBuf::from(".")),
            json: false,
        }
    }

    pub fn add_search_path(&mut self, path: Box<dyn SearchPath>) {
        self.search_paths.push(path);
    }

    pub fn add_class_path(&mut self, path: impl Into<PathBuf>) {
        self.search_paths.push(Box::new(ClassPath::new(path.into())));
    }

    /// Add a `--classpath` value, splitting on the platform separator and
    /// expanding `/*` wildcards.
    pub fn add_class_paths(&mut self, spec: &str) {
        for path in split_class_path(spec) {
            self.add_class_path(path);
        }
    }

    pub fn add_module_path(&mut self, dir: impl Into<PathBuf>) -> JavahResult<()> {
        self.search_paths.push(Box::new(ModulePath::new(dir)?));
        Ok(())
    }

    /// Add the `$JAVA_HOME` runtime classes, when the variable is set.
    pub fn add_runtime_search_path(&mut self) {
        match RuntimeSearchPath::from_env() {
            Some(path) => self.search_paths.push(Box::new(path)),
            None => debug!("JAVA_HOME not set, runtime classes unavailable"),
        }
    }

    pub fn has_search_paths(&self) -> bool {
        !self.search_paths.is_empty()
    }

    pub fn add_class(&mut self, name: impl Into<String>) {
        self.classes.push(name.into());
    }

    pub fn set_output(&mut self, output: OutputTarget) {
        self.output = output;
    }

    pub fn set_json(&mut self, json: bool) {
        self.json = json;
    }

    /// Resolve, parse and emit. Fails fast on the first unresolvable class.
    pub fn run(self) -> JavahResult<()> {
        let Self {
            search_paths,
            classes,
            output,
            json,
        } = self;
        let mut generator = HeaderGenerator::new(search_paths);

        let metas = classes
            .iter()
            .map(|class| generator.load_class(class))
            .collect::<JavahResult<Vec<ClassMetaInfo>>>()?;

        if json {
            println!("{}", serde_json::to_string_pretty(&metas)?);
            return Ok(());
        }

        match output {
            OutputTarget::SingleFile(path) => {
                let mut content = String::new();
                let mut first = true;
                for meta in &metas {
                    if meta.is_empty() {
                        info!("{}: no native members", meta.name);
                        continue;
                    }
                    content.push_str(&generator.header_for_class(meta, first));
                    first = false;
                }
                if write_if_changed(&path, &content)? {
                    info!("wrote {}", path.display());
                }
            }
            OutputTarget::Directory(dir) => {
                for meta in &metas {
                    if meta.is_empty() {
                        info!("{}: no native members", meta.name);
                        continue;
                    }
                    let path = dir.join(header_file_name(&meta.name));
                    let content = generator.header_for_class(meta, true);
                    if write_if_changed(&path, &content)? {
                        info!("wrote {}", path.display());
                    }
                }
            }
        }
        Ok(())
    }
}

impl Default for JavahTask {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classfile::testutil::ClassBuilder;
    use std::fs;

    fn class_dir(dir: &std::path::Path) {
        fs::create_dir_all(dir.join("demo")).unwrap();
        fs::write(
            dir.join("demo/Nat.class"),
            ClassBuilder::new("demo/Nat")
                .native_method("poke", "()V", false)
                .build(),
        )
        .unwrap();
        fs::write(
            dir.join("demo/Plain.class"),
            ClassBuilder::new("demo/Plain").build(),
        )
        .unwrap();
    }

    #[test]
    fn test_directory_output() {
        let classes = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        class_dir(classes.path());

        let mut task = JavahTask::new();
        task.add_class_path(classes.path());
        task.add_class("demo.Nat");
        task.add_class("demo.Plain");
        task.set_output(OutputTarget::Directory(out.path().to_path_buf()));
        task.run().unwrap();

        let header = fs::read_to_string(out.path().join("demo_Nat.h")).unwrap();
        assert!(header.contains("Java_demo_Nat_poke"));
        // a class without native members produces no header
        assert!(!out.path().join("demo_Plain.h").exists());
    }

    #[test]
    fn test_single_file_output() {
        let classes = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        class_dir(classes.path());
        fs::write(
            classes.path().join("demo/Other.class"),
            ClassBuilder::new("demo/Other")
                .native_method("peek", "()I", true)
                .build(),
        )
        .unwrap();

        let target = out.path().join("all.h");
        let mut task = JavahTask::new();
        task.add_class_path(classes.path());
        task.add_class("demo.Nat");
        task.add_class("demo.Other");
        task.set_output(OutputTarget::SingleFile(target.clone()));
        task.run().unwrap();

        let content = fs::read_to_string(&target).unwrap();
        assert_eq!(content.matches("#include <jni.h>").count(), 1);
        assert!(content.contains("Java_demo_Nat_poke"));
        assert!(content.contains("Java_demo_Other_peek"));
    }

    #[test]
    fn test_missing_class_is_an_error() {
        let mut task = JavahTask::new();
        task.add_class("no.such.Class");
        let err = task.run().unwrap_err();
        assert!(err.to_string().contains("no.such.Class"));
    }

    #[test]
    fn test_class_argument_as_file_path() {
        let dir = tempfile::tempdir().unwrap();
        let class_file = dir.path().join("Direct.class");
        fs::write(
            &class_file,
            ClassBuilder::new("direct/Direct")
                .native_method("run", "()V", false)
                .build(),
        )
        .unwrap();

        let mut task = JavahTask::new();
        task.add_class(class_file.display().to_string());
        task.set_output(OutputTarget::Directory(dir.path().to_path_buf()));
        task.run().unwrap();

        assert!(dir.path().join("direct_Direct.h").exists());
    }
}
