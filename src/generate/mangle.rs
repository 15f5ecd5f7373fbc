//! JNI name mangling
//!
//! Symbol names follow the JNI specification: `_` becomes `_1`, `;` becomes
//! `_2`, `[` becomes `_3`, package separators become `_`, ASCII
//! alphanumerics pass through and every other UTF-16 code unit is spelled
//! `_0xxxx` with four lowercase hex digits.

use std::fmt::Write;

use crate::domain::model::{JavaType, MethodDescriptor};

/// Mangle an internal class name, a method name or a descriptor fragment.
pub fn mangle(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    for unit in source.encode_utf16() {
        match unit {
            0x5F => out.push_str("_1"),                   // '_'
            0x3B => out.push_str("_2"),                   // ';'
            0x5B => out.push_str("_3"),                   // '['
            0x2F => out.push('_'),                        // '/'
            0x30..=0x39 | 0x41..=0x5A | 0x61..=0x7A => {
                out.push(unit as u8 as char)
            }
            _ => {
                let _ = write!(out, "_0{:04x}", unit);
            }
        }
    }
    out
}

/// The exported symbol for a native method:
/// `Java_<class>_<method>` plus, for overloaded names, `__` and the mangled
/// argument descriptors.
pub fn function_symbol(class_internal_name: &str, method_name: &str, overloaded: Option<&MethodDescriptor>) -> String {
    let mut symbol = format!(
        "Java_{}_{}",
        mangle(class_internal_name),
        mangle(method_name)
    );
    if let Some(descriptor) = overloaded {
        symbol.push_str("__");
        for param in &descriptor.params {
            symbol.push_str(&mangle(&param.descriptor()));
        }
    }
    symbol
}

/// The include-guard spelling of a class name: mangled, with the inner-class
/// marker `_00024` collapsed to `_`.
pub fn guard_name(class_internal_name: &str) -> String {
    mangle(class_internal_name).replace("_00024", "_")
}

/// Map a JVM type onto the JNI C type used in generated declarations.
/// `resolve_throwable` decides whether an object type descends from
/// `java/lang/Throwable`.
pub fn native_type(tpe: &JavaType, resolve_throwable: &mut dyn FnMut(&str) -> bool) -> String {
    match tpe {
        JavaType::Boolean => "jboolean".to_string(),
        JavaType::Byte => "jbyte".to_string(),
        JavaType::Char => "jchar".to_string(),
        JavaType::Short => "jshort".to_string(),
        JavaType::Int => "jint".to_string(),
        JavaType::Long => "jlong".to_string(),
        JavaType::Float => "jfloat".to_string(),
        JavaType::Double => "jdouble".to_string(),
        JavaType::Void => "void".to_string(),
        JavaType::Array(elem) => match elem.as_ref() {
            JavaType::Object(_) | JavaType::Array(_) => "jobjectArray".to_string(),
            elem => format!("{}Array", native_type(elem, resolve_throwable)),
        },
        JavaType::Object(name) => match name.as_str() {
            "java/lang/String" => "jstring".to_string(),
            "java/lang/Class" => "jclass".to_string(),
            name if resolve_throwable(name) => "jthrowable".to_string(),
            _ => "jobject".to_string(),
        },
    }
}
