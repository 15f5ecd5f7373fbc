//! C header generation for native methods and constants

use std::collections::{HashMap, HashSet};
use std::fmt::Write;
use std::path::Path;

use tracing::{debug, info};

use crate::classfile;
use crate::domain::model::{ClassMetaInfo, ClassName, JavaType, NativeMethod};
use crate::error::{JavahError, JavahResult};
use crate::generate::mangle::{function_symbol, guard_name, mangle, native_type};
use crate::search::SearchPath;

/// Banner emitted once per header file.
pub const FILE_BANNER: &str =
    "/* DO NOT EDIT THIS FILE - it is machine generated */\n#include <jni.h>\n";

/// Classes treated as throwable when the superclass chain cannot be
/// resolved against the search paths.
const FALLBACK_THROWABLES: [&str; 3] = [
    "java/lang/Throwable",
    "java/lang/Error",
    "java/lang/Exception",
];

/// Superclass lookup outcome, cached per internal name.
#[derive(Clone)]
enum SuperClass {
    Parent(String),
    Root,
    Unresolved,
}

/// Generates JNI headers, resolving classes through a list of search paths.
pub struct HeaderGenerator {
    search_paths: Vec<Box<dyn SearchPath>>,
    super_cache: HashMap<String, SuperClass>,
}

impl HeaderGenerator {
    pub fn new(search_paths: Vec<Box<dyn SearchPath>>) -> Self {
        Self {
            search_paths,
            super_cache: HashMap::new(),
        }
    }

    /// Resolve a class argument: an existing file is read directly, anything
    /// else is validated as a class name and looked up on the search paths.
    pub fn load_class(&mut self, spec: &str) -> JavahResult<ClassMetaInfo> {
        let direct = Path::new(spec);
        if direct.is_file() {
            debug!("reading class file {}", direct.display());
            return classfile::parse_class(&std::fs::read(direct)?);
        }

        let name = ClassName::parse(spec)?;
        match self.find_class_bytes(&name) {
            Some(bytes) => classfile::parse_class(&bytes),
            None => Err(JavahError::ClassNotFound {
                name: name.to_string(),
                searched: self.describe_search_paths(),
            }),
        }
    }

    fn find_class_bytes(&self, name: &ClassName) -> Option<Vec<u8>> {
        self.search_paths
            .iter()
            .find_map(|path| path.search_class(name))
    }

    fn describe_search_paths(&self) -> String {
        if self.search_paths.is_empty() {
            return " - (empty)".to_string();
        }
        self.search_paths
            .iter()
            .map(|path| format!(" - {}", path.describe()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Render the header for one class. `include_banner` controls the
    /// machine-generated banner and `#include <jni.h>`; in single-file mode
    /// only the first class carries them.
    pub fn header_for_class(&mut self, meta: &ClassMetaInfo, include_banner: bool) -> String {
        let mut out = String::new();
        if include_banner {
            out.push_str(FILE_BANNER);
        }

        let guard = guard_name(&meta.name.internal_name());
        let _ = writeln!(out, "/* Header for class {} */", guard);
        out.push('\n');
        let _ = writeln!(out, "#ifndef _Included_{}", guard);
        let _ = writeln!(out, "#define _Included_{}", guard);
        out.push_str("#ifdef __cplusplus\nextern \"C\" {\n#endif\n");

        self.write_declarations(&mut out, meta);

        out.push_str("#ifdef __cplusplus\n}\n#endif\n#endif\n");
        out
    }

    fn write_declarations(&mut self, out: &mut String, meta: &ClassMetaInfo) {
        let internal = meta.name.internal_name();
        let class_symbol = mangle(&internal);
        let flat = meta.name.flat_name();

        for constant in &meta.constants {
            let symbol = format!("{}_{}", class_symbol, constant.name);
            let _ = writeln!(out, "#undef {}", symbol);
            let _ = writeln!(out, "#define {} {}", symbol, constant.value.c_literal());
        }

        for (name, group) in meta.method_groups() {
            let overloaded = group.len() > 1;
            for method in group {
                self.write_method(out, &internal, &flat, name, method, overloaded);
            }
        }
    }

    fn write_method(
        &mut self,
        out: &mut String,
        internal: &str,
        flat: &str,
        name: &str,
        method: &NativeMethod,
        overloaded: bool,
    ) {
        let _ = writeln!(out, "/*");
        let _ = writeln!(out, " * Class:     {}", flat);
        let _ = writeln!(out, " * Method:    {}", name);
        let _ = writeln!(
            out,
            " * Signature: {}",
            method.descriptor.descriptor().replace('$', "/")
        );
        let _ = writeln!(out, " */");

        let ret = self.resolved_native_type(&method.descriptor.ret);
        let symbol = function_symbol(
            internal,
            name,
            overloaded.then_some(&method.descriptor),
        );
        let _ = writeln!(out, "JNIEXPORT {} JNICALL {}", ret, symbol);

        let receiver = if method.is_static { "jclass" } else { "jobject" };
        let mut params = format!("JNIEnv *, {}", receiver);
        for param in &method.descriptor.params {
            let tpe = self.resolved_native_type(param);
            params.push_str(", ");
            params.push_str(&tpe);
        }
        let _ = writeln!(out, "  ({});", params);
        out.push('\n');
    }

    fn resolved_native_type(&mut self, tpe: &JavaType) -> String {
        // borrow split: native_type only needs the throwable resolver
        let search_paths = &self.search_paths;
        let super_cache = &mut self.super_cache;
        native_type(tpe, &mut |name| {
            is_throwable(search_paths, super_cache, name)
        })
    }
}

/// Walk the superclass chain towards `java/lang/Throwable`. Classes the
/// search paths cannot resolve fall back to the well-known throwable names.
fn is_throwable(
    search_paths: &[Box<dyn SearchPath>],
    super_cache: &mut HashMap<String, SuperClass>,
    internal_name: &str,
) -> bool {
    if search_paths.is_empty() {
        return FALLBACK_THROWABLES.contains(&internal_name);
    }

    let mut visited = HashSet::new();
    let mut current = internal_name.to_string();
    loop {
        if current == "java/lang/Throwable" {
            return true;
        }
        if !visited.insert(current.clone()) {
            // corrupt superclass cycle
            return false;
        }
        match super_of(search_paths, super_cache, &current) {
            SuperClass::Parent(parent) => current = parent,
            SuperClass::Root => return false,
            SuperClass::Unresolved => {
                return FALLBACK_THROWABLES.contains(&current.as_str())
            }
        }
    }
}

fn super_of(
    search_paths: &[Box<dyn SearchPath>],
    super_cache: &mut HashMap<String, SuperClass>,
    internal_name: &str,
) -> SuperClass {
    if let Some(cached) = super_cache.get(internal_name) {
        return cached.clone();
    }
    let result = lookup_super(search_paths, internal_name);
    super_cache.insert(internal_name.to_string(), result.clone());
    result
}

fn lookup_super(search_paths: &[Box<dyn SearchPath>], internal_name: &str) -> SuperClass {
    let Ok(name) = ClassName::of_internal_name(internal_name) else {
        return SuperClass::Unresolved;
    };
    let Some(bytes) = search_paths.iter().find_map(|p| p.search_class(&name)) else {
        return SuperClass::Unresolved;
    };
    match classfile::parse_class(&bytes) {
        Ok(meta) => match meta.super_name {
            Some(parent) => SuperClass::Parent(parent.internal_name()),
            None => SuperClass::Root,
        },
        Err(e) => {
            info!("cannot parse superclass candidate {}: {}", internal_name, e);
            SuperClass::Unresolved
        }
    }
}

/// The header file name for a class in per-class output mode.
pub fn header_file_name(name: &ClassName) -> String {
    format!("{}.h", name.flat_name())
}
