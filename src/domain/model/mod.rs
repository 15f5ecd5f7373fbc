// Domain models - class names, JVM type descriptors and parsed class metadata

use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::domain::rules;
use crate::error::{JavahError, JavahResult};

/// A validated, fully qualified Java class name, optionally qualified by the
/// module it lives in (`java.base/java.lang.Object`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassName {
    module: Option<String>,
    full_name: String,
}

impl ClassName {
    /// Create a class name from its dot-separated form, with an optional
    /// `module/` prefix (`java.base/java.lang.Object`).
    pub fn of_full_name(name: &str) -> JavahResult<Self> {
        let (module, full_name) = match name.split_once('/') {
            Some((module, rest)) => {
                if module.is_empty() || rest.is_empty() || rest.contains('/') {
                    return Err(JavahError::InvalidClassName {
                        name: name.to_string(),
                    });
                }
                (Some(module.to_string()), rest.to_string())
            }
            None => (None, name.to_string()),
        };
        if !rules::is_full_name(&full_name) {
            return Err(JavahError::InvalidClassName {
                name: name.to_string(),
            });
        }
        Ok(Self { module, full_name })
    }

    /// Create a class name from its internal (slash-separated) form
    /// (`java/lang/Object`).
    pub fn of_internal_name(name: &str) -> JavahResult<Self> {
        let full_name = name.replace('/', ".");
        if !rules::is_full_name(&full_name) {
            return Err(JavahError::InvalidClassName {
                name: name.to_string(),
            });
        }
        Ok(Self {
            module: None,
            full_name,
        })
    }

    /// Parse a command-line class argument. Dotted names may carry a module
    /// prefix; names without dots but with slashes are taken as internal form.
    pub fn parse(arg: &str) -> JavahResult<Self> {
        if arg.contains('.') || !arg.contains('/') {
            Self::of_full_name(arg)
        } else {
            Self::of_internal_name(arg)
        }
    }

    /// The module this class was qualified with, if any.
    pub fn module(&self) -> Option<&str> {
        self.module.as_deref()
    }

    /// The dot-separated class name without the module prefix.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// The last segment of the class name.
    pub fn simple_name(&self) -> &str {
        match self.full_name.rfind('.') {
            Some(idx) => &self.full_name[idx + 1..],
            None => &self.full_name,
        }
    }

    /// The internal (slash-separated) form used inside class files.
    pub fn internal_name(&self) -> String {
        self.full_name.replace('.', "/")
    }

    /// Relative path of the class file inside a search location.
    pub fn relative_file(&self) -> String {
        format!("{}.class", self.internal_name())
    }

    /// Name with `.`, `/` and `$` flattened to `_`, as used for header file
    /// names and the `Class:` comment lines.
    pub fn flat_name(&self) -> String {
        self.full_name
            .replace(['.', '/', '$'], "_")
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.module {
            Some(module) => write!(f, "{}/{}", module, self.full_name),
            None => write!(f, "{}", self.full_name),
        }
    }
}

impl Serialize for ClassName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

/// A JVM field type, as encoded in a type descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JavaType {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Void,
    /// Class type, holding the internal class name (`java/lang/String`)
    Object(String),
    /// Single-dimension array of the element type
    Array(Box<JavaType>),
}

impl JavaType {
    /// Parse a complete field descriptor. The whole input must be consumed.
    pub fn parse(descriptor: &str) -> JavahResult<Self> {
        let bytes = descriptor.as_bytes();
        let (tpe, used) = Self::parse_at(bytes, 0).ok_or_else(|| JavahError::InvalidDescriptor {
            descriptor: descriptor.to_string(),
        })?;
        if used != bytes.len() {
            return Err(JavahError::InvalidDescriptor {
                descriptor: descriptor.to_string(),
            });
        }
        Ok(tpe)
    }

    /// Parse one type starting at `pos`, returning the type and the position
    /// just past it. Returns `None` on malformed input.
    pub(crate) fn parse_at(bytes: &[u8], pos: usize) -> Option<(Self, usize)> {
        match bytes.get(pos)? {
            b'Z' => Some((JavaType::Boolean, pos + 1)),
            b'B' => Some((JavaType::Byte, pos + 1)),
            b'C' => Some((JavaType::Char, pos + 1)),
            b'S' => Some((JavaType::Short, pos + 1)),
            b'I' => Some((JavaType::Int, pos + 1)),
            b'J' => Some((JavaType::Long, pos + 1)),
            b'F' => Some((JavaType::Float, pos + 1)),
            b'D' => Some((JavaType::Double, pos + 1)),
            b'V' => Some((JavaType::Void, pos + 1)),
            b'[' => {
                let (elem, end) = Self::parse_at(bytes, pos + 1)?;
                if elem == JavaType::Void {
                    return None;
                }
                Some((JavaType::Array(Box::new(elem)), end))
            }
            b'L' => {
                let end = pos + 1 + bytes[pos + 1..].iter().position(|&b| b == b';')?;
                if end == pos + 1 {
                    // "L;" has no class name
                    return None;
                }
                let name = std::str::from_utf8(&bytes[pos + 1..end]).ok()?;
                Some((JavaType::Object(name.to_string()), end + 1))
            }
            _ => None,
        }
    }

    /// Render back to descriptor form.
    pub fn descriptor(&self) -> String {
        match self {
            JavaType::Boolean => "Z".to_string(),
            JavaType::Byte => "B".to_string(),
            JavaType::Char => "C".to_string(),
            JavaType::Short => "S".to_string(),
            JavaType::Int => "I".to_string(),
            JavaType::Long => "J".to_string(),
            JavaType::Float => "F".to_string(),
            JavaType::Double => "D".to_string(),
            JavaType::Void => "V".to_string(),
            JavaType::Object(name) => format!("L{};", name),
            JavaType::Array(elem) => format!("[{}", elem.descriptor()),
        }
    }
}

/// A JVM method descriptor: `(` parameter types `)` return type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub params: Vec<JavaType>,
    pub ret: JavaType,
}

impl MethodDescriptor {
    /// Parse a complete method descriptor such as `(Ljava/lang/String;I)V`.
    pub fn parse(descriptor: &str) -> JavahResult<Self> {
        let invalid = || JavahError::InvalidDescriptor {
            descriptor: descriptor.to_string(),
        };
        let bytes = descriptor.as_bytes();
        if bytes.first() != Some(&b'(') {
            return Err(invalid());
        }
        let mut pos = 1;
        let mut params = Vec::new();
        while bytes.get(pos) != Some(&b')') {
            let (tpe, next) = JavaType::parse_at(bytes, pos).ok_or_else(invalid)?;
            if tpe == JavaType::Void {
                return Err(invalid());
            }
            params.push(tpe);
            pos = next;
        }
        let (ret, end) = JavaType::parse_at(bytes, pos + 1).ok_or_else(invalid)?;
        if end != bytes.len() {
            return Err(invalid());
        }
        Ok(Self { params, ret })
    }

    /// Render back to descriptor form.
    pub fn descriptor(&self) -> String {
        let mut out = String::from("(");
        for param in &self.params {
            out.push_str(&param.descriptor());
        }
        out.push(')');
        out.push_str(&self.ret.descriptor());
        out
    }
}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.descriptor())
    }
}

impl Serialize for MethodDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.descriptor())
    }
}

/// A `native` method declaration extracted from a class file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeMethod {
    pub name: String,
    pub descriptor: MethodDescriptor,
    pub is_static: bool,
}

impl NativeMethod {
    /// Validate the name and descriptor and build a method entry.
    pub fn of(name: &str, descriptor: &str, is_static: bool) -> JavahResult<Self> {
        if !rules::is_method_name(name) {
            return Err(JavahError::InvalidMethodName {
                name: name.to_string(),
            });
        }
        Ok(Self {
            name: name.to_string(),
            descriptor: MethodDescriptor::parse(descriptor)?,
            is_static,
        })
    }
}

impl Serialize for NativeMethod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("NativeMethod", 3)?;
        s.serialize_field("name", &self.name)?;
        s.serialize_field("descriptor", &self.descriptor)?;
        s.serialize_field("static", &self.is_static)?;
        s.end()
    }
}

/// A numeric compile-time constant (a static field with a `ConstantValue`
/// attribute).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConstantValue {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
}

impl ConstantValue {
    /// Render as the C literal used in generated `#define` lines.
    ///
    /// Float and double formatting follows Java's `toString`: a decimal
    /// point is always present, non-finite values print as Infinity/NaN.
    pub fn c_literal(&self) -> String {
        match self {
            ConstantValue::Int(v) => format!("{}L", v),
            ConstantValue::Long(v) => format!("{}LL", v),
            ConstantValue::Float(v) if v.is_nan() => "NaNf".to_string(),
            ConstantValue::Float(v) if v.is_infinite() => {
                format!("{}Infinityf", if *v > 0.0 { "" } else { "-" })
            }
            ConstantValue::Float(v) => format!("{:?}f", v),
            ConstantValue::Double(v) if v.is_nan() => "NaN".to_string(),
            ConstantValue::Double(v) if v.is_infinite() => {
                format!("{}Infinity", if *v > 0.0 { "" } else { "-" })
            }
            ConstantValue::Double(v) => format!("{:?}", v),
        }
    }
}

/// A named constant in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedConstant {
    pub name: String,
    pub value: ConstantValue,
}

/// Everything header generation needs to know about one parsed class.
#[derive(Debug, Clone, Serialize)]
pub struct ClassMetaInfo {
    pub name: ClassName,
    #[serde(rename = "super")]
    pub super_name: Option<ClassName>,
    pub constants: Vec<NamedConstant>,
    pub methods: Vec<NativeMethod>,
}

impl ClassMetaInfo {
    /// Whether the class contributes anything to a header.
    pub fn is_empty(&self) -> bool {
        self.constants.is_empty() && self.methods.is_empty()
    }

    /// Native methods grouped by name, groups ordered by first occurrence.
    /// A group with more than one entry means the name is overloaded and the
    /// generated symbols need argument-signature suffixes.
    pub fn method_groups(&self) -> Vec<(&str, Vec<&NativeMethod>)> {
        let mut groups: Vec<(&str, Vec<&NativeMethod>)> = Vec::new();
        for method in &self.methods {
            match groups.iter_mut().find(|(name, _)| *name == method.name) {
                Some((_, group)) => group.push(method),
                None => groups.push((method.name.as_str(), vec![method])),
            }
        }
        groups
    }
}

#[cfg(test)]
mod tests;
