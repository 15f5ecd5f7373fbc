//! Tiny class-file writer used by the test suite
//!
//! Emits structurally valid class files with just the pieces the reader
//! cares about: a constant pool, fields with `ConstantValue` attributes and
//! method declarations.

use std::collections::HashMap;

use crate::classfile::{ACC_NATIVE, ACC_STATIC};

const ACC_PUBLIC: u16 = 0x0001;
const ACC_FINAL: u16 = 0x0010;

#[derive(Clone, Copy)]
enum FieldConstant {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
}

impl FieldConstant {
    fn descriptor(self) -> &'static str {
        match self {
            FieldConstant::Int(_) => "I",
            FieldConstant::Long(_) => "J",
            FieldConstant::Float(_) => "F",
            FieldConstant::Double(_) => "D",
        }
    }
}

struct FieldSpec {
    access: u16,
    name: String,
    constant: FieldConstant,
}

struct MethodSpec {
    access: u16,
    name: String,
    descriptor: String,
}

/// Builder for synthetic class files.
pub struct ClassBuilder {
    this_name: String,
    super_name: Option<String>,
    fields: Vec<FieldSpec>,
    methods: Vec<MethodSpec>,
}

impl ClassBuilder {
    pub fn new(internal_name: &str) -> Self {
        Self {
            this_name: internal_name.to_string(),
            super_name: Some("java/lang/Object".to_string()),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Override the superclass; `None` models `java/lang/Object` itself.
    pub fn super_name(mut self, name: Option<&str>) -> Self {
        self.super_name = name.map(str::to_string);
        self
    }

    pub fn int_constant(mut self, name: &str, value: i32) -> Self {
        self.fields.push(FieldSpec {
            access: ACC_PUBLIC | ACC_STATIC | ACC_FINAL,
            name: name.to_string(),
            constant: FieldConstant::Int(value),
        });
        self
    }

    pub fn long_constant(mut self, name: &str, value: i64) -> Self {
        self.fields.push(FieldSpec {
            access: ACC_PUBLIC | ACC_STATIC | ACC_FINAL,
            name: name.to_string(),
            constant: FieldConstant::Long(value),
        });
        self
    }

    pub fn float_constant(mut self, name: &str, value: f32) -> Self {
        self.fields.push(FieldSpec {
            access: ACC_PUBLIC | ACC_STATIC | ACC_FINAL,
            name: name.to_string(),
            constant: FieldConstant::Float(value),
        });
        self
    }

    pub fn double_constant(mut self, name: &str, value: f64) -> Self {
        self.fields.push(FieldSpec {
            access: ACC_PUBLIC | ACC_STATIC | ACC_FINAL,
            name: name.to_string(),
            constant: FieldConstant::Double(value),
        });
        self
    }

    /// A non-static field with a ConstantValue attribute, which the reader
    /// must ignore.
    pub fn instance_int_constant(mut self, name: &str, value: i32) -> Self {
        self.fields.push(FieldSpec {
            access: ACC_PUBLIC | ACC_FINAL,
            name: name.to_string(),
            constant: FieldConstant::Int(value),
        });
        self
    }

    pub fn native_method(mut self, name: &str, descriptor: &str, is_static: bool) -> Self {
        let access = ACC_PUBLIC | ACC_NATIVE | if is_static { ACC_STATIC } else { 0 };
        self.methods.push(MethodSpec {
            access,
            name: name.to_string(),
            descriptor: descriptor.to_string(),
        });
        self
    }

    pub fn plain_method(mut self, name: &str, descriptor: &str) -> Self {
        self.methods.push(MethodSpec {
            access: ACC_PUBLIC,
            name: name.to_string(),
            descriptor: descriptor.to_string(),
        });
        self
    }

    /// Assemble the class file bytes.
    pub fn build(self) -> Vec<u8> {
        let mut pool = PoolWriter::default();

        let this_index = pool.class(&self.this_name);
        let super_index = self.super_name.as_deref().map(|n| pool.class(n)).unwrap_or(0);
        let constant_value_attr = if self.fields.is_empty() {
            0
        } else {
            pool.utf8("ConstantValue")
        };

        struct FieldIndices {
            access: u16,
            name: u16,
            descriptor: u16,
            value: u16,
        }
        let fields: Vec<FieldIndices> = self
            .fields
            .iter()
            .map(|f| FieldIndices {
                access: f.access,
                name: pool.utf8(&f.name),
                descriptor: pool.utf8(f.constant.descriptor()),
                value: pool.constant(f.constant),
            })
            .collect();

        let methods: Vec<(u16, u16, u16)> = self
            .methods
            .iter()
            .map(|m| (m.access, pool.utf8(&m.name), pool.utf8(&m.descriptor)))
            .collect();

        let mut out = Vec::new();
        out.extend_from_slice(&0xCAFE_BABEu32.to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes()); // minor
        out.extend_from_slice(&52u16.to_be_bytes()); // major (Java 8)
        out.extend_from_slice(&pool.count.to_be_bytes());
        out.extend_from_slice(&pool.bytes);
        out.extend_from_slice(&(ACC_PUBLIC | 0x0020).to_be_bytes()); // ACC_SUPER
        out.extend_from_slice(&this_index.to_be_bytes());
        out.extend_from_slice(&super_index.to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes()); // interfaces

        out.extend_from_slice(&(fields.len() as u16).to_be_bytes());
        for f in &fields {
            out.extend_from_slice(&f.access.to_be_bytes());
            out.extend_from_slice(&f.name.to_be_bytes());
            out.extend_from_slice(&f.descriptor.to_be_bytes());
            out.extend_from_slice(&1u16.to_be_bytes()); // attribute count
            out.extend_from_slice(&constant_value_attr.to_be_bytes());
            out.extend_from_slice(&2u32.to_be_bytes()); // attribute length
            out.extend_from_slice(&f.value.to_be_bytes());
        }

        out.extend_from_slice(&(methods.len() as u16).to_be_bytes());
        for (access, name, descriptor) in &methods {
            out.extend_from_slice(&access.to_be_bytes());
            out.extend_from_slice(&name.to_be_bytes());
            out.extend_from_slice(&descriptor.to_be_bytes());
            out.extend_from_slice(&0u16.to_be_bytes()); // attribute count
        }

        out.extend_from_slice(&0u16.to_be_bytes()); // class attributes
        out
    }
}

/// Incremental constant pool writer with Utf8 deduplication.
#[derive(Default)]
struct PoolWriter {
    bytes: Vec<u8>,
    count: u16,
    utf8_cache: HashMap<String, u16>,
}

impl PoolWriter {
    fn next_index(&mut self, slots: u16) -> u16 {
        if self.count == 0 {
            self.count = 1; // slot 0 is reserved
        }
        let index = self.count;
        self.count += slots;
        index
    }

    fn utf8(&mut self, value: &str) -> u16 {
        if let Some(&index) = self.utf8_cache.get(value) {
            return index;
        }
        let index = self.next_index(1);
        self.bytes.push(1);
        let encoded = encode_modified_utf8(value);
        self.bytes
            .extend_from_slice(&(encoded.len() as u16).to_be_bytes());
        self.bytes.extend_from_slice(&encoded);
        self.utf8_cache.insert(value.to_string(), index);
        index
    }

    fn class(&mut self, internal_name: &str) -> u16 {
        let name_index = self.utf8(internal_name);
        let index = self.next_index(1);
        self.bytes.push(7);
        self.bytes.extend_from_slice(&name_index.to_be_bytes());
        index
    }

    fn constant(&mut self, value: FieldConstant) -> u16 {
        match value {
            FieldConstant::Int(v) => {
                let index = self.next_index(1);
                self.bytes.push(3);
                self.bytes.extend_from_slice(&v.to_be_bytes());
                index
            }
            FieldConstant::Float(v) => {
                let index = self.next_index(1);
                self.bytes.push(4);
                self.bytes.extend_from_slice(&v.to_bits().to_be_bytes());
                index
            }
            FieldConstant::Long(v) => {
                let index = self.next_index(2);
                self.bytes.push(5);
                self.bytes.extend_from_slice(&v.to_be_bytes());
                index
            }
            FieldConstant::Double(v) => {
                let index = self.next_index(2);
                self.bytes.push(6);
                self.bytes.extend_from_slice(&v.to_bits().to_be_bytes());
                index
            }
        }
    }
}

/// Encode to the modified UTF-8 used by class files.
fn encode_modified_utf8(value: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(value.len());
    for unit in value.encode_utf16() {
        match unit {
            0x0001..=0x007F => out.push(unit as u8),
            0x0000..=0x07FF => {
                out.push(0xC0 | (unit >> 6) as u8);
                out.push(0x80 | (unit & 0x3F) as u8);
            }
            _ => {
                out.push(0xE0 | (unit >> 12) as u8);
                out.push(0x80 | ((unit >> 6) & 0x3F) as u8);
                out.push(0x80 | (unit & 0x3F) as u8);
            }
        }
    }
    out
}
