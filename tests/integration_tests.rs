use std::fs;
use std::io::Write;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use javah::classfile::testutil::ClassBuilder;

/// Test utilities for building class file fixtures
mod test_utils {
    use super::*;

    /// Lay out a small compiled tree: one class with natives and constants,
    /// one with nothing to export.
    pub fn write_class_tree(root: &Path) {
        fs::create_dir_all(root.join("org/example")).unwrap();
        fs::write(
            root.join("org/example/Native.class"),
            ClassBuilder::new("org/example/Native")
                .int_constant("LIMIT", 8)
                .native_method("open", "(Ljava/lang/String;)J", true)
                .native_method("close", "(J)V", true)
                .plain_method("helper", "()V")
                .build(),
        )
        .unwrap();
        fs::write(
            root.join("org/example/Plain.class"),
            ClassBuilder::new("org/example/Plain").build(),
        )
        .unwrap();
    }

    /// Pack a single class into a jar.
    pub fn write_jar(path: &Path, entry: &str, bytes: &[u8]) {
        let mut writer = zip::ZipWriter::new(fs::File::create(path).unwrap());
        writer
            .start_file(entry, zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(bytes).unwrap();
        writer.finish().unwrap();
    }

    pub fn javah() -> Command {
        let mut cmd = Command::cargo_bin("javah").unwrap();
        // keep the test environment hermetic
        cmd.env_remove("JAVA_HOME").env_remove("CLASSPATH");
        cmd
    }
}

use test_utils::{javah, write_class_tree, write_jar};

#[test]
fn prints_help_without_arguments() {
    javah()
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("--classpath"));
}

#[test]
fn prints_version() {
    javah()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn rejects_mixed_output_options() {
    javah()
        .args(["-o", "all.h", "-d", "out", "a.B"])
        .assert()
        .failure();
}

#[test]
fn generates_per_class_headers() {
    let classes = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_class_tree(classes.path());

    javah()
        .args(["-d"])
        .arg(out.path())
        .arg("--classpath")
        .arg(classes.path())
        .args(["org.example.Native", "org.example.Plain"])
        .assert()
        .success();

    let header = fs::read_to_string(out.path().join("org_example_Native.h")).unwrap();
    assert!(header.starts_with("/* DO NOT EDIT THIS FILE - it is machine generated */"));
    assert!(header.contains("#define org_example_Native_LIMIT 8L"));
    assert!(header.contains(
        "JNIEXPORT jlong JNICALL Java_org_example_Native_open\n  (JNIEnv *, jclass, jstring);"
    ));
    assert!(header.contains("Java_org_example_Native_close"));
    // class without natives or constants gets no header
    assert!(!out.path().join("org_example_Plain.h").exists());
}

#[test]
fn generates_single_file_output() {
    let classes = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_class_tree(classes.path());
    fs::write(
        classes.path().join("org/example/Second.class"),
        ClassBuilder::new("org/example/Second")
            .native_method("tick", "()I", false)
            .build(),
    )
    .unwrap();

    let target = out.path().join("all.h");
    javah()
        .arg("-o")
        .arg(&target)
        .arg("--classpath")
        .arg(classes.path())
        .args(["org.example.Native", "org.example.Second"])
        .assert()
        .success();

    let content = fs::read_to_string(&target).unwrap();
    assert_eq!(content.matches("#include <jni.h>").count(), 1);
    assert!(content.contains("Java_org_example_Native_open"));
    assert!(content.contains("Java_org_example_Second_tick"));
    assert!(content.contains("#ifndef _Included_org_example_Native"));
    assert!(content.contains("#ifndef _Included_org_example_Second"));
}

#[test]
fn resolves_classes_from_a_jar() {
    let dir = TempDir::new().unwrap();
    let jar = dir.path().join("app.jar");
    write_jar(
        &jar,
        "com/acme/Probe.class",
        &ClassBuilder::new("com/acme/Probe")
            .native_method("probe", "()Z", false)
            .build(),
    );

    let out = TempDir::new().unwrap();
    javah()
        .args(["-d"])
        .arg(out.path())
        .arg("--classpath")
        .arg(&jar)
        .arg("com.acme.Probe")
        .assert()
        .success();

    let header = fs::read_to_string(out.path().join("com_acme_Probe.h")).unwrap();
    assert!(header.contains("JNIEXPORT jboolean JNICALL Java_com_acme_Probe_probe"));
}

#[test]
fn reports_missing_class() {
    let dir = TempDir::new().unwrap();
    javah()
        .current_dir(dir.path())
        .args(["--no-runtime", "no.such.Class"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no.such.Class"));
}

#[test]
fn overload_symbols_are_suffixed() {
    let classes = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    fs::create_dir_all(classes.path().join("p")).unwrap();
    fs::write(
        classes.path().join("p/Over.class"),
        ClassBuilder::new("p/Over")
            .native_method("f", "()V", false)
            .native_method("f", "(I)V", false)
            .build(),
    )
    .unwrap();

    javah()
        .args(["-d"])
        .arg(out.path())
        .arg("--classpath")
        .arg(classes.path())
        .arg("p.Over")
        .assert()
        .success();

    let header = fs::read_to_string(out.path().join("p_Over.h")).unwrap();
    assert!(header.contains("Java_p_Over_f__\n"));
    assert!(header.contains("Java_p_Over_f__I\n"));
}

#[test]
fn json_mode_prints_metadata() {
    let classes = TempDir::new().unwrap();
    write_class_tree(classes.path());

    let output = javah()
        .arg("--json")
        .arg("--classpath")
        .arg(classes.path())
        .arg("org.example.Native")
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let classes = parsed.as_array().unwrap();
    assert_eq!(classes.len(), 1);
    assert_eq!(classes[0]["name"], "org.example.Native");
    assert_eq!(classes[0]["super"], "java.lang.Object");
    assert_eq!(classes[0]["constants"][0]["name"], "LIMIT");
    assert_eq!(classes[0]["constants"][0]["value"], 8);
    assert_eq!(classes[0]["methods"][0]["name"], "open");
    assert_eq!(classes[0]["methods"][0]["static"], true);
    assert_eq!(
        classes[0]["methods"][0]["descriptor"],
        "(Ljava/lang/String;)J"
    );
}

#[test]
fn rerun_leaves_identical_output() {
    let classes = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_class_tree(classes.path());

    for _ in 0..2 {
        javah()
            .args(["-d"])
            .arg(out.path())
            .arg("--classpath")
            .arg(classes.path())
            .arg("org.example.Native")
            .assert()
            .success();
    }
    let first = fs::read_to_string(out.path().join("org_example_Native.h")).unwrap();
    assert!(first.contains("Java_org_example_Native_open"));
}
