//! Constant pool model and typed accessors

use crate::error::{JavahError, JavahResult};

/// One constant pool entry. Reference entries keep raw indices; resolution
/// happens through [`ConstantPool`] accessors.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Utf8(String),
    Integer(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    Class(u16),
    String(u16),
    FieldRef { class: u16, name_and_type: u16 },
    MethodRef { class: u16, name_and_type: u16 },
    InterfaceMethodRef { class: u16, name_and_type: u16 },
    NameAndType { name: u16, descriptor: u16 },
    MethodHandle { kind: u8, reference: u16 },
    MethodType(u16),
    Dynamic { bootstrap: u16, name_and_type: u16 },
    InvokeDynamic { bootstrap: u16, name_and_type: u16 },
    Module(u16),
    Package(u16),
    /// Index 0 and the phantom slot after a Long or Double entry.
    Unusable,
}

/// The parsed constant pool of a class file, indexed 1-based as in the
/// class-file format.
#[derive(Debug)]
pub struct ConstantPool {
    entries: Vec<Constant>,
}

impl ConstantPool {
    pub(crate) fn new(entries: Vec<Constant>) -> Self {
        Self { entries }
    }

    /// Number of slots, counting index 0 and Long/Double phantom slots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.len() <= 1
    }

    /// Fetch an entry, rejecting out-of-range and phantom indices.
    pub fn get(&self, index: u16) -> JavahResult<&Constant> {
        match self.entries.get(index as usize) {
            Some(Constant::Unusable) | None => Err(JavahError::BadConstantRef {
                index,
                expected: "usable",
            }),
            Some(entry) => Ok(entry),
        }
    }

    /// Resolve an index that must be a Utf8 entry.
    pub fn utf8(&self, index: u16) -> JavahResult<&str> {
        match self.get(index)? {
            Constant::Utf8(s) => Ok(s),
            _ => Err(JavahError::BadConstantRef {
                index,
                expected: "Utf8",
            }),
        }
    }

    /// Resolve an index that must be a Class entry, returning the internal
    /// class name it points at.
    pub fn class_name(&self, index: u16) -> JavahResult<&str> {
        match self.get(index)? {
            Constant::Class(name_index) => self.utf8(*name_index),
            _ => Err(JavahError::BadConstantRef {
                index,
                expected: "Class",
            }),
        }
    }
}
